//! Stage bodies shared by the selectable strategies.

use super::pipeline::{StageContext, StageResult};
use super::weighting;
use crate::domain::{FillResult, Generator, NamedOperation};
use serde_json::json;

/// Default for selectable kinds: pick among the target's candidate values.
pub fn pick_from_values(ctx: &StageContext<'_>) -> FillResult<StageResult> {
    let candidates = ctx.target.candidate_values();
    if candidates.is_empty() {
        return Ok(StageResult::NoValue);
    }
    Ok(StageResult::Value(Generator::pick(candidates)))
}

/// Halts the chain when the target already holds a value.
pub fn skip_if_has_value(ctx: &StageContext<'_>, _generator: &Generator) -> FillResult<StageResult> {
    if ctx.target.has_value() {
        Ok(StageResult::NoValue)
    } else {
        Ok(StageResult::PassThrough)
    }
}

/// Binds a selection count in `[1, candidate count]` as the trailing
/// argument of a `pick` generator. Other generators pass through unchanged.
pub fn add_multiple(ctx: &StageContext<'_>, generator: &Generator) -> FillResult<StageResult> {
    if generator.named_operation() != Some(NamedOperation::Pick) {
        return Ok(StageResult::PassThrough);
    }
    match weighting::pick_multiple_count(ctx.target, ctx.options, ctx.source) {
        Some(count) => Ok(StageResult::Value(generator.bind(vec![json!(count)]))),
        None => Ok(StageResult::NoValue),
    }
}

/// Wraps the generator in a weighted choice against the blank outcome.
pub fn add_blank(ctx: &StageContext<'_>, generator: &Generator) -> FillResult<StageResult> {
    let weight = weighting::weight(ctx.target, ctx.options);
    let inner = generator.clone();
    Ok(StageResult::Value(Generator::new(move |source, args| {
        let value = inner.call(source, args)?;
        weighting::blank_or_not(weight, value, source)
    })))
}
