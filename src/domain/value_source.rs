use crate::domain::error::{FillError, FillResult};
use chrono::NaiveDateTime;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Operations a value source exposes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedOperation {
    Pick,
    Weighted,
    Integer,
    Natural,
    Bool,
    Color,
    Email,
    Birthday,
    String,
    Phone,
    Sentence,
    Word,
    Paragraph,
    Url,
    Name,
    First,
    Last,
    Username,
    Street,
    City,
    State,
    Country,
    Zip,
    Guid,
}

impl NamedOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedOperation::Pick => "pick",
            NamedOperation::Weighted => "weighted",
            NamedOperation::Integer => "integer",
            NamedOperation::Natural => "natural",
            NamedOperation::Bool => "bool",
            NamedOperation::Color => "color",
            NamedOperation::Email => "email",
            NamedOperation::Birthday => "birthday",
            NamedOperation::String => "string",
            NamedOperation::Phone => "phone",
            NamedOperation::Sentence => "sentence",
            NamedOperation::Word => "word",
            NamedOperation::Paragraph => "paragraph",
            NamedOperation::Url => "url",
            NamedOperation::Name => "name",
            NamedOperation::First => "first",
            NamedOperation::Last => "last",
            NamedOperation::Username => "username",
            NamedOperation::Street => "street",
            NamedOperation::City => "city",
            NamedOperation::State => "state",
            NamedOperation::Country => "country",
            NamedOperation::Zip => "zip",
            NamedOperation::Guid => "guid",
        }
    }

    /// Operations whose first argument is the candidate list, so its length
    /// becomes the forced candidate count.
    pub fn counts_first_argument(&self) -> bool {
        matches!(self, NamedOperation::Pick | NamedOperation::Weighted)
    }
}

impl FromStr for NamedOperation {
    type Err = FillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "pick" => NamedOperation::Pick,
            "weighted" => NamedOperation::Weighted,
            "integer" => NamedOperation::Integer,
            "natural" => NamedOperation::Natural,
            "bool" => NamedOperation::Bool,
            "color" => NamedOperation::Color,
            "email" => NamedOperation::Email,
            "birthday" => NamedOperation::Birthday,
            "string" => NamedOperation::String,
            "phone" => NamedOperation::Phone,
            "sentence" => NamedOperation::Sentence,
            "word" => NamedOperation::Word,
            "paragraph" => NamedOperation::Paragraph,
            "url" => NamedOperation::Url,
            "name" => NamedOperation::Name,
            "first" => NamedOperation::First,
            "last" => NamedOperation::Last,
            "username" => NamedOperation::Username,
            "street" => NamedOperation::Street,
            "city" => NamedOperation::City,
            "state" => NamedOperation::State,
            "country" => NamedOperation::Country,
            "zip" => NamedOperation::Zip,
            "guid" => NamedOperation::Guid,
            other => return Err(FillError::UnknownOperation(other.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for NamedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability that produces random values.
///
/// The primitives (`pick`, `weighted`, `integer`, `birthday`) are typed; the
/// remaining domain generators go through [`ValueSource::domain`]. Named
/// lookups from configuration are routed by [`ValueSource::call`].
pub trait ValueSource: Send + Sync {
    /// Uniform choice. `Value::Null` for an empty slice.
    fn pick(&self, candidates: &[Value]) -> Value;

    /// `count` distinct candidates in random order (at most `candidates.len()`).
    fn pick_many(&self, candidates: &[Value], count: usize) -> Vec<Value>;

    /// Weighted choice; `values` and `weights` must have equal length and a
    /// positive total weight.
    fn weighted(&self, values: &[Value], weights: &[f64]) -> FillResult<Value>;

    /// Uniform integer in `[min, max]`.
    fn integer(&self, min: i64, max: i64) -> i64;

    /// A plausible adult birth date and time.
    fn birthday(&self) -> NaiveDateTime;

    /// Domain generators (`email`, `sentence`, ...).
    fn domain(&self, op: NamedOperation, args: &[Value]) -> FillResult<Value>;

    /// Resolve a configuration string to an operation this source provides.
    fn resolve(&self, name: &str) -> Option<NamedOperation> {
        name.parse().ok()
    }

    /// Invoke a named operation with loosely typed arguments.
    fn call(&self, op: NamedOperation, args: &[Value]) -> FillResult<Value> {
        match op {
            NamedOperation::Pick => {
                let candidates = array_arg(op, args, 0)?;
                match args.get(1).and_then(Value::as_u64) {
                    Some(count) => Ok(Value::Array(self.pick_many(candidates, count as usize))),
                    None => Ok(self.pick(candidates)),
                }
            }
            NamedOperation::Weighted => {
                let values = array_arg(op, args, 0)?;
                let weights = array_arg(op, args, 1)?
                    .iter()
                    .map(|w| {
                        w.as_f64().ok_or_else(|| FillError::InvalidArgument {
                            operation: op.to_string(),
                            reason: format!("weight {} is not a number", w),
                        })
                    })
                    .collect::<FillResult<Vec<f64>>>()?;
                self.weighted(values, &weights)
            }
            NamedOperation::Integer => {
                let (min, max) = integer_bounds(args);
                if min > max {
                    return Err(FillError::InvalidArgument {
                        operation: op.to_string(),
                        reason: format!("min {} is greater than max {}", min, max),
                    });
                }
                Ok(json!(self.integer(min, max)))
            }
            NamedOperation::Birthday => {
                Ok(json!(self.birthday().format("%Y-%m-%dT%H:%M:%S").to_string()))
            }
            _ => self.domain(op, args),
        }
    }
}

fn array_arg<'a>(op: NamedOperation, args: &'a [Value], index: usize) -> FillResult<&'a [Value]> {
    args.get(index)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| FillError::InvalidArgument {
            operation: op.to_string(),
            reason: format!("argument {} must be an array", index + 1),
        })
}

/// Reads `{min, max}` from the first argument, defaulting to the full
/// non-negative 32-bit span like the usual integer generators.
pub(crate) fn integer_bounds(args: &[Value]) -> (i64, i64) {
    let bounds = args.first();
    let min = bounds
        .and_then(|b| b.get("min"))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let max = bounds
        .and_then(|b| b.get("max"))
        .and_then(Value::as_i64)
        .unwrap_or(i32::MAX as i64);
    (min, max)
}
