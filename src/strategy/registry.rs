//! Ordered strategy table and dispatch.

use super::defaults;
use super::pipeline::{as_array, compose, with_default, with_option, with_option_set, Pipeline};
use super::transforms;
use crate::domain::options::{ALLOW_BLANK, ALLOW_MULTIPLE, OVERWRITE};
use crate::domain::{Target, TargetKind};
use tracing::debug;

/// A target kind and the strategy that fills it.
pub struct StrategyEntry {
    kind: TargetKind,
    pipeline: Pipeline,
}

impl StrategyEntry {
    pub fn new(kind: TargetKind, pipeline: Pipeline) -> Self {
        Self { kind, pipeline }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Strategies ordered most specific first.
///
/// Dispatch is first-match-wins: a target is handled by the first entry whose
/// kind it satisfies, so broader kinds (`select`) must stay after narrower ones
/// (`select[multiple]`).
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl StrategyRegistry {
    pub fn new(entries: Vec<StrategyEntry>) -> Self {
        Self { entries }
    }

    /// The built-in table covering every [`TargetKind`].
    pub fn standard() -> Self {
        Self::new(
            TargetKind::ALL
                .iter()
                .map(|&kind| StrategyEntry::new(kind, standard_pipeline(kind)))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[StrategyEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<TargetKind> {
        self.entries.iter().map(StrategyEntry::kind).collect()
    }

    /// First entry whose kind the target satisfies.
    pub fn dispatch(&self, target: &dyn Target) -> Option<&StrategyEntry> {
        let kinds = target.kinds();
        let entry = self.entries.iter().find(|entry| kinds.contains(&entry.kind));
        match entry {
            Some(entry) => debug!("Dispatching {} target", entry.kind),
            None => debug!("No strategy for target kinds {:?}", kinds),
        }
        entry
    }

    pub fn recognizes(&self, target: &dyn Target) -> bool {
        let kinds = target.kinds();
        self.entries.iter().any(|entry| kinds.contains(&entry.kind))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_pipeline(kind: TargetKind) -> Pipeline {
    match kind {
        TargetKind::Checkbox | TargetKind::MultiSelect => multiple_choice(kind),
        TargetKind::Radio | TargetKind::Select => single_choice(kind),
        _ => scalar(kind),
    }
}

fn scalar(kind: TargetKind) -> Pipeline {
    compose(vec![
        with_default(defaults::for_kind(kind)),
        with_option(OVERWRITE, false, transforms::skip_if_has_value),
    ])
}

fn single_choice(kind: TargetKind) -> Pipeline {
    compose(vec![
        with_default(defaults::for_kind(kind)),
        with_option(OVERWRITE, false, transforms::skip_if_has_value),
        with_option_set(ALLOW_BLANK, transforms::add_blank),
        as_array(),
    ])
}

fn multiple_choice(kind: TargetKind) -> Pipeline {
    compose(vec![
        with_default(defaults::for_kind(kind)),
        with_option(OVERWRITE, false, transforms::skip_if_has_value),
        with_option_set(ALLOW_MULTIPLE, transforms::add_multiple),
        with_option_set(ALLOW_BLANK, transforms::add_blank),
        as_array(),
    ])
}
