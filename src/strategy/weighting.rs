//! Weights for blank and multiple-selection outcomes.

use crate::domain::{FillOptions, FillResult, Target, ValueSource};
use serde_json::Value;

/// Relative likelihood used in weighted choices
pub type Weight = u128;

/// Weight of the blank outcome
pub const BLANK_WEIGHT: Weight = 1;

/// `n!`, saturating at `u128::MAX`.
pub fn factorial(n: usize) -> Weight {
    (1..=n as u128).fold(1, |acc: Weight, k| acc.saturating_mul(k))
}

/// Forced `count` option if set, otherwise the live candidate count.
pub fn candidate_count(target: &dyn Target, options: &FillOptions) -> usize {
    options
        .count()
        .unwrap_or_else(|| target.candidate_values().len())
}

/// Weight of the non-blank outcome: `count!` when multiple selections are
/// allowed, `count` otherwise.
pub fn weight(target: &dyn Target, options: &FillOptions) -> Weight {
    let count = candidate_count(target, options);
    if options.allow_multiple() {
        factorial(count)
    } else {
        count as Weight
    }
}

/// How many candidates to select, uniformly in `[1, count]`. `None` when
/// there is nothing to select.
pub fn pick_multiple_count(
    target: &dyn Target,
    options: &FillOptions,
    source: &dyn ValueSource,
) -> Option<usize> {
    match candidate_count(target, options) {
        0 => None,
        count => Some(source.integer(1, count as i64) as usize),
    }
}

/// Weighted choice between `value` (weight `weight`) and blank (weight 1).
pub fn blank_or_not(weight: Weight, value: Value, source: &dyn ValueSource) -> FillResult<Value> {
    source.weighted(&[value, Value::Null], &[weight as f64, BLANK_WEIGHT as f64])
}
