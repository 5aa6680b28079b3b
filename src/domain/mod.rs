use serde_json::Value;

pub mod error;
pub mod generator;
pub mod kind;
pub mod options;
pub mod value_source;

pub use error::{FillError, FillResult};
pub use generator::Generator;
pub use kind::TargetKind;
pub use options::FillOptions;
pub use value_source::{NamedOperation, ValueSource};

/// Stored fill configuration of one target
#[derive(Debug, Clone, Default)]
pub struct FillSpec {
    /// Explicit generator; `None` falls back to the kind's default
    pub generator: Option<Generator>,
    /// Options set through configuration (defaults are layered in at fill time)
    pub options: FillOptions,
}

impl FillSpec {
    /// Options as a fill sees them: defaults, then stored, then temporary.
    pub fn resolved_options(
        spec: Option<&FillSpec>,
        defaults: &FillOptions,
        temp: Option<&FillOptions>,
    ) -> FillOptions {
        let empty = FillOptions::new();
        let stored = spec.map(|s| &s.options).unwrap_or(&empty);
        FillOptions::layered([defaults, stored, temp.unwrap_or(&empty)])
    }
}

/// Anything a fill configuration can be attached to.
pub trait Configurable {
    fn fill_spec(&self) -> Option<&FillSpec>;
    /// Replace the stored configuration; `None` clears it.
    fn store_fill_spec(&mut self, spec: Option<FillSpec>);
}

/// One logical selectable: a single field, or a group of co-named options.
pub trait Target: Configurable {
    /// Every kind this target satisfies. Dispatch picks the first registry
    /// entry whose kind is in this list.
    fn kinds(&self) -> Vec<TargetKind>;

    /// Currently selected value(s): `Null`, a scalar, or an array for
    /// multi-valued targets.
    fn current_value(&self) -> Value;

    /// Non-empty candidate values, in document order.
    fn candidate_values(&self) -> Vec<Value>;

    /// Raw attribute value (`min`, `max`, `step`, ...).
    fn attribute(&self, name: &str) -> Option<String>;

    /// Write a value. An empty array or `Null` clears the selection.
    fn commit(&mut self, value: Value);

    fn has_value(&self) -> bool {
        is_present(&self.current_value())
    }
}

/// A composite (form-like) grouping of independent targets.
pub trait Container: Configurable {
    /// Visit every logical target once; co-named checkbox and radio
    /// siblings are visited as a single grouped target.
    fn visit_targets(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Target) -> FillResult<()>,
    ) -> FillResult<()>;
}

/// Whether a value counts as "already filled".
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => items.iter().any(is_present),
        _ => true,
    }
}
