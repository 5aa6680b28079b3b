//! Fill strategies: composed stage pipelines, one per target kind.

pub mod defaults;
pub mod pipeline;
pub mod registry;
pub mod transforms;
pub mod weighting;

pub use pipeline::{
    as_array, compose, with_default, with_option, with_option_set, Pipeline, Stage, StageContext,
    StageResult,
};
pub use registry::{StrategyEntry, StrategyRegistry};

#[cfg(test)]
mod transforms_test;
