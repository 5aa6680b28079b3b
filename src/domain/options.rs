use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ALLOW_BLANK: &str = "allowBlank";
pub const ALLOW_MULTIPLE: &str = "allowMultiple";
pub const OVERWRITE: &str = "overwrite";
pub const COUNT: &str = "count";

/// Open map of fill options.
///
/// Recognized keys are `allowBlank`, `allowMultiple`, `overwrite` and the
/// internal `count` override; any other key is carried along untouched so
/// custom generators can read it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FillOptions(Map<String, Value>);

impl FillOptions {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Built-in defaults: blank selections off, multiple selections on,
    /// existing values kept.
    pub fn defaults() -> Self {
        Self::new()
            .with(ALLOW_BLANK, false)
            .with(ALLOW_MULTIPLE, true)
            .with(OVERWRITE, false)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of this map. Keys in `other` win.
    pub fn extend(&mut self, other: &FillOptions) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Layer maps left to right, later maps winning.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a FillOptions>) -> Self {
        let mut merged = FillOptions::new();
        for layer in layers {
            merged.extend(layer);
        }
        merged
    }

    /// Strict boolean comparison: a missing or non-boolean value never matches.
    pub fn is(&self, key: &str, expected: bool) -> bool {
        self.0.get(key) == Some(&Value::Bool(expected))
    }

    /// Truthiness of an option value (missing, null, false, 0 and "" are falsy).
    pub fn truthy(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    pub fn allow_blank(&self) -> bool {
        self.truthy(ALLOW_BLANK)
    }

    pub fn allow_multiple(&self) -> bool {
        self.truthy(ALLOW_MULTIPLE)
    }

    pub fn overwrite(&self) -> bool {
        self.truthy(OVERWRITE)
    }

    /// Forced candidate count, when one was set numerically.
    pub fn count(&self) -> Option<usize> {
        self.0.get(COUNT).and_then(|v| v.as_f64()).map(|n| if n > 0.0 { n as usize } else { 0 })
    }

    pub fn set_count(&mut self, count: usize) {
        self.set(COUNT, count);
    }

    pub fn clear_count(&mut self) {
        self.0.remove(COUNT);
    }
}

impl From<Map<String, Value>> for FillOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<FillOptions> for Value {
    fn from(options: FillOptions) -> Self {
        Value::Object(options.0)
    }
}
