//! Configuration resolution: turns a list of fill arguments into the
//! `FillSpec` stored on a target.

use crate::domain::{
    Configurable, FillError, FillOptions, FillResult, FillSpec, Generator, NamedOperation,
    ValueSource,
};
use serde_json::Value;
use tracing::debug;

/// One argument of a `configure` call.
#[derive(Debug, Clone)]
pub enum FillArg {
    /// Remove the stored configuration
    Clear,
    /// Option overlay
    Options(FillOptions),
    /// Literal candidates to pick from
    Candidates(Vec<Value>),
    /// Explicit generator
    Generator(Generator),
    /// Name of a value source operation
    Named(String),
    /// Any other value; only valid as a trailing argument
    Value(Value),
}

impl FillArg {
    fn shape(&self) -> &'static str {
        match self {
            FillArg::Clear => "null",
            FillArg::Options(_) => "object",
            FillArg::Candidates(_) => "array",
            FillArg::Generator(_) => "generator",
            FillArg::Named(_) => "string",
            FillArg::Value(Value::Bool(_)) => "boolean",
            FillArg::Value(Value::Number(_)) => "number",
            FillArg::Value(_) => "value",
        }
    }

    /// Trailing arguments are forwarded to the generator as plain values.
    fn into_value(self) -> FillResult<Value> {
        match self {
            FillArg::Clear => Ok(Value::Null),
            FillArg::Options(options) => Ok(options.into()),
            FillArg::Candidates(items) => Ok(Value::Array(items)),
            FillArg::Named(name) => Ok(Value::String(name)),
            FillArg::Value(value) => Ok(value),
            FillArg::Generator(_) => Err(FillError::InvalidHead(
                "generators cannot be passed as generator arguments".to_string(),
            )),
        }
    }
}

impl From<Value> for FillArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FillArg::Clear,
            Value::Object(map) => FillArg::Options(map.into()),
            Value::Array(items) => FillArg::Candidates(items),
            Value::String(name) => FillArg::Named(name),
            other => FillArg::Value(other),
        }
    }
}

impl From<FillOptions> for FillArg {
    fn from(options: FillOptions) -> Self {
        FillArg::Options(options)
    }
}

impl From<Generator> for FillArg {
    fn from(generator: Generator) -> Self {
        FillArg::Generator(generator)
    }
}

impl From<&str> for FillArg {
    fn from(name: &str) -> Self {
        FillArg::Named(name.to_string())
    }
}

/// Resolve `args` against the target's stored configuration and store the
/// result. No arguments, or a leading [`FillArg::Clear`], removes it.
pub fn configure<'t, T, I>(
    target: &'t mut T,
    source: &dyn ValueSource,
    args: I,
) -> FillResult<&'t mut T>
where
    T: Configurable + ?Sized,
    I: IntoIterator<Item = FillArg>,
{
    let mut args = args.into_iter().peekable();

    match args.peek() {
        None | Some(FillArg::Clear) => {
            debug!("Clearing fill configuration");
            target.store_fill_spec(None);
            return Ok(target);
        }
        _ => {}
    }

    let mut spec = target.fill_spec().cloned().unwrap_or_default();

    while let Some(FillArg::Options(overlay)) = args.peek() {
        spec.options.extend(overlay);
        args.next();
    }

    if let Some(head) = args.next() {
        resolve_head(&mut spec, source, head, args)?;
    }

    debug!(
        "Stored fill configuration (generator: {}, options: {:?})",
        spec.generator.is_some(),
        spec.options.keys().collect::<Vec<_>>()
    );
    target.store_fill_spec(Some(spec));
    Ok(target)
}

/// Arguments after an array head are ignored.
fn resolve_head(
    spec: &mut FillSpec,
    source: &dyn ValueSource,
    head: FillArg,
    trailing: impl Iterator<Item = FillArg>,
) -> FillResult<()> {
    match head {
        FillArg::Candidates(candidates) => {
            spec.options.set_count(candidates.len());
            spec.generator = Some(Generator::pick(candidates));
        }
        FillArg::Generator(generator) => {
            let trailing = trailing_values(trailing)?;
            // Only `weighted` keeps a count when passed as a generator.
            let op = generator
                .named_operation()
                .filter(|op| *op == NamedOperation::Weighted);
            apply_count(&mut spec.options, op, &trailing)?;
            spec.generator = Some(generator.bind(trailing));
        }
        FillArg::Named(name) => {
            let trailing = trailing_values(trailing)?;
            let op = source
                .resolve(&name)
                .ok_or_else(|| FillError::UnknownOperation(name.clone()))?;
            apply_count(&mut spec.options, Some(op), &trailing)?;
            spec.generator = Some(Generator::operation(op).bind(trailing));
        }
        other @ (FillArg::Clear | FillArg::Value(_) | FillArg::Options(_)) => {
            return Err(FillError::InvalidHead(other.shape().to_string()));
        }
    }
    Ok(())
}

fn trailing_values(trailing: impl Iterator<Item = FillArg>) -> FillResult<Vec<Value>> {
    trailing.map(FillArg::into_value).collect()
}

/// Generators drop any forced count, except `pick`/`weighted`, whose count is
/// the length of their candidate list.
fn apply_count(
    options: &mut FillOptions,
    op: Option<NamedOperation>,
    trailing: &[Value],
) -> FillResult<()> {
    options.clear_count();
    if let Some(op) = op.filter(NamedOperation::counts_first_argument) {
        let first = trailing
            .first()
            .and_then(Value::as_array)
            .ok_or_else(|| FillError::InvalidArgument {
                operation: op.to_string(),
                reason: "first argument must be an array".to_string(),
            })?;
        options.set_count(first.len());
    }
    Ok(())
}
