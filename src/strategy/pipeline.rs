//! Stage composition.
//!
//! A strategy is a left-to-right chain of stages. Each stage sees the target,
//! the resolved options and the current generator, and either replaces the
//! generator, keeps it, or halts the chain with "no value".

use crate::domain::{FillOptions, FillResult, Generator, Target, TargetKind, ValueSource};
use serde_json::Value;
use tracing::trace;

/// Everything a stage may look at while building the generator.
pub struct StageContext<'a> {
    pub target: &'a dyn Target,
    pub options: &'a FillOptions,
    pub source: &'a dyn ValueSource,
    pub kind: TargetKind,
}

/// Outcome of one stage.
#[derive(Debug, Clone)]
pub enum StageResult {
    /// Continue with this generator
    Value(Generator),
    /// Halt: the strategy produces no value
    NoValue,
    /// Continue with the current generator unchanged
    PassThrough,
}

pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &StageContext<'_>, current: Option<&Generator>) -> FillResult<StageResult>;
}

/// A composed chain of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

/// Chain `stages` left to right.
pub fn compose(stages: Vec<Box<dyn Stage>>) -> Pipeline {
    Pipeline { stages }
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage, starting from the stored generator. `None` means a
    /// stage halted the chain (or nothing ever produced a generator).
    pub fn run(
        &self,
        ctx: &StageContext<'_>,
        stored: Option<&Generator>,
    ) -> FillResult<Option<Generator>> {
        let mut current = stored.cloned();
        for stage in &self.stages {
            match stage.apply(ctx, current.as_ref())? {
                StageResult::Value(next) => {
                    trace!(stage = stage.name(), kind = %ctx.kind, "stage produced a generator");
                    current = Some(next);
                }
                StageResult::PassThrough => {
                    trace!(stage = stage.name(), kind = %ctx.kind, "stage passed through");
                }
                StageResult::NoValue => {
                    trace!(stage = stage.name(), kind = %ctx.kind, "stage halted the pipeline");
                    return Ok(None);
                }
            }
        }
        Ok(current)
    }

    /// Run the chain and invoke the resulting generator. `Value::Null` is the
    /// "no value" outcome.
    pub fn execute(&self, ctx: &StageContext<'_>, stored: Option<&Generator>) -> FillResult<Value> {
        match self.run(ctx, stored)? {
            Some(generator) => generator.generate(ctx.source),
            None => Ok(Value::Null),
        }
    }
}

type DefaultFn = dyn Fn(&StageContext<'_>) -> FillResult<StageResult> + Send + Sync;
type TransformFn = dyn Fn(&StageContext<'_>, &Generator) -> FillResult<StageResult> + Send + Sync;

struct WithDefault {
    make: Box<DefaultFn>,
}

impl Stage for WithDefault {
    fn name(&self) -> &'static str {
        "with_default"
    }

    fn apply(&self, ctx: &StageContext<'_>, current: Option<&Generator>) -> FillResult<StageResult> {
        match current {
            Some(_) => Ok(StageResult::PassThrough),
            None => (self.make)(ctx),
        }
    }
}

/// Supply the kind's default generator unless one was configured.
pub fn with_default<F>(make: F) -> Box<dyn Stage>
where
    F: Fn(&StageContext<'_>) -> FillResult<StageResult> + Send + Sync + 'static,
{
    Box::new(WithDefault { make: Box::new(make) })
}

struct WithOption {
    option: &'static str,
    expected: bool,
    transform: Box<TransformFn>,
}

impl Stage for WithOption {
    fn name(&self) -> &'static str {
        self.option
    }

    fn apply(&self, ctx: &StageContext<'_>, current: Option<&Generator>) -> FillResult<StageResult> {
        if !ctx.options.is(self.option, self.expected) {
            return Ok(StageResult::PassThrough);
        }
        match current {
            Some(generator) => (self.transform)(ctx, generator),
            None => Ok(StageResult::NoValue),
        }
    }
}

/// Run `transform` only when `options[option]` is exactly `expected`.
pub fn with_option<F>(option: &'static str, expected: bool, transform: F) -> Box<dyn Stage>
where
    F: Fn(&StageContext<'_>, &Generator) -> FillResult<StageResult> + Send + Sync + 'static,
{
    Box::new(WithOption {
        option,
        expected,
        transform: Box::new(transform),
    })
}

/// `with_option(option, true, transform)`.
pub fn with_option_set<F>(option: &'static str, transform: F) -> Box<dyn Stage>
where
    F: Fn(&StageContext<'_>, &Generator) -> FillResult<StageResult> + Send + Sync + 'static,
{
    with_option(option, true, transform)
}

struct AsArray;

impl Stage for AsArray {
    fn name(&self) -> &'static str {
        "as_array"
    }

    fn apply(&self, _ctx: &StageContext<'_>, current: Option<&Generator>) -> FillResult<StageResult> {
        let Some(inner) = current.cloned() else {
            return Ok(StageResult::NoValue);
        };
        Ok(StageResult::Value(Generator::new(move |source, args| {
            let value = inner.call(source, args)?;
            Ok(Value::Array(flatten(value)))
        })))
    }
}

/// Coerce the generator's output into a flat array; blanks become an empty array.
pub fn as_array() -> Box<dyn Stage> {
    Box::new(AsArray)
}

fn flatten(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().flat_map(flatten).collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::{Element, FormDocument};
    use crate::adapters::faker::FakerSource;
    use crate::domain::options::OVERWRITE;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn run_on_text(
        pipeline: &Pipeline,
        options: &FillOptions,
        stored: Option<&Generator>,
    ) -> FillResult<Value> {
        let mut doc = FormDocument::new(vec![Element::input("text", "field")]);
        let target = doc.target_at(0).unwrap();
        let source = FakerSource::seeded(11);
        let ctx = StageContext {
            target: &target,
            options,
            source: &source,
            kind: TargetKind::Text,
        };
        pipeline.execute(&ctx, stored)
    }

    #[test]
    fn test_with_default_supplies_generator() {
        let pipeline = compose(vec![with_default(|_| {
            Ok(StageResult::Value(Generator::constant(json!("default"))))
        })]);
        let value = run_on_text(&pipeline, &FillOptions::defaults(), None).unwrap();
        assert_eq!(value, json!("default"));
    }

    #[test]
    fn test_with_default_keeps_configured_generator() {
        let pipeline = compose(vec![with_default(|_| {
            Ok(StageResult::Value(Generator::constant(json!("default"))))
        })]);
        let configured = Generator::constant(json!("configured"));
        let value = run_on_text(&pipeline, &FillOptions::defaults(), Some(&configured)).unwrap();
        assert_eq!(value, json!("configured"));
    }

    #[test]
    fn test_with_option_gate_closed_never_calls_transform() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let pipeline = compose(vec![
            with_default(|_| Ok(StageResult::Value(Generator::constant(json!("a"))))),
            with_option(OVERWRITE, false, move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(StageResult::NoValue)
            }),
        ]);
        let opts = FillOptions::defaults().with(OVERWRITE, true);
        let value = run_on_text(&pipeline, &opts, None).unwrap();
        assert_eq!(value, json!("a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_value_halts_remaining_stages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let pipeline = compose(vec![
            with_default(|_| Ok(StageResult::Value(Generator::constant(json!("a"))))),
            with_option(OVERWRITE, false, |_, _| Ok(StageResult::NoValue)),
            with_option(OVERWRITE, false, move |_, g| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(StageResult::Value(g.clone()))
            }),
        ]);
        let value = run_on_text(&pipeline, &FillOptions::defaults(), None).unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_as_array_coerces_and_flattens() {
        let scalar = compose(vec![
            with_default(|_| Ok(StageResult::Value(Generator::constant(json!("a"))))),
            as_array(),
        ]);
        assert_eq!(run_on_text(&scalar, &FillOptions::defaults(), None).unwrap(), json!(["a"]));

        let nested = compose(vec![
            with_default(|_| Ok(StageResult::Value(Generator::constant(json!([["a"], "b", null]))))),
            as_array(),
        ]);
        assert_eq!(run_on_text(&nested, &FillOptions::defaults(), None).unwrap(), json!(["a", "b"]));

        let blank = compose(vec![
            with_default(|_| Ok(StageResult::Value(Generator::constant(Value::Null)))),
            as_array(),
        ]);
        assert_eq!(run_on_text(&blank, &FillOptions::defaults(), None).unwrap(), json!([]));
    }

    #[test]
    fn test_stage_names() {
        let pipeline = compose(vec![
            with_default(|_| Ok(StageResult::NoValue)),
            with_option(OVERWRITE, false, |_, _| Ok(StageResult::PassThrough)),
            as_array(),
        ]);
        assert_eq!(pipeline.stage_names(), vec!["with_default", "overwrite", "as_array"]);
        assert_eq!(pipeline.len(), 3);
    }
}
