use crate::domain::error::FillResult;
use crate::domain::value_source::{NamedOperation, ValueSource};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type GeneratorFn = dyn Fn(&dyn ValueSource, &[Value]) -> FillResult<Value> + Send + Sync;

/// A value-producing function with optional pre-bound arguments.
///
/// Calling a generator appends the call-site arguments after the bound ones,
/// the same way a partially applied function would. Generators built from a
/// named operation remember it, so configuration can recognize `weighted`.
#[derive(Clone)]
pub struct Generator {
    func: Arc<GeneratorFn>,
    bound: Vec<Value>,
    operation: Option<NamedOperation>,
}

impl Generator {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&dyn ValueSource, &[Value]) -> FillResult<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            bound: Vec::new(),
            operation: None,
        }
    }

    /// Generator delegating to the value source's named operation.
    pub fn operation(op: NamedOperation) -> Self {
        Self {
            func: Arc::new(move |source: &dyn ValueSource, args: &[Value]| source.call(op, args)),
            bound: Vec::new(),
            operation: Some(op),
        }
    }

    /// Uniform pick from a fixed candidate list. A trailing count argument
    /// switches to picking that many distinct candidates.
    pub fn pick(candidates: Vec<Value>) -> Self {
        Self::operation(NamedOperation::Pick).bind(vec![Value::Array(candidates)])
    }

    /// Always yields `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Partially apply `args` after any already bound arguments.
    pub fn bind(&self, args: Vec<Value>) -> Self {
        let mut bound = self.bound.clone();
        bound.extend(args);
        Self {
            func: Arc::clone(&self.func),
            bound,
            operation: self.operation,
        }
    }

    pub fn named_operation(&self) -> Option<NamedOperation> {
        self.operation
    }

    pub fn call(&self, source: &dyn ValueSource, args: &[Value]) -> FillResult<Value> {
        if self.bound.is_empty() {
            return (self.func)(source, args);
        }
        let mut all = self.bound.clone();
        all.extend_from_slice(args);
        (self.func)(source, &all)
    }

    pub fn generate(&self, source: &dyn ValueSource) -> FillResult<Value> {
        self.call(source, &[])
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("operation", &self.operation)
            .field("bound", &self.bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::faker::FakerSource;
    use serde_json::json;

    #[test]
    fn test_bind_prepends_arguments() {
        let echo = Generator::new(|_, args| Ok(Value::Array(args.to_vec())));
        let bound = echo.bind(vec![json!(1)]).bind(vec![json!(2)]);
        let source = FakerSource::seeded(1);
        assert_eq!(bound.call(&source, &[json!(3)]).unwrap(), json!([1, 2, 3]));
        assert_eq!(echo.generate(&source).unwrap(), json!([]));
    }

    #[test]
    fn test_pick_keeps_operation_tag() {
        let gen = Generator::pick(vec![json!("x"), json!("y")]);
        assert_eq!(gen.named_operation(), Some(NamedOperation::Pick));
        let source = FakerSource::seeded(7);
        for _ in 0..20 {
            let v = gen.generate(&source).unwrap();
            assert!(v == json!("x") || v == json!("y"));
        }
    }

    #[test]
    fn test_pick_with_count_returns_distinct_values() {
        let gen = Generator::pick(vec![json!("a"), json!("b"), json!("c")]);
        let source = FakerSource::seeded(3);
        let picked = gen.call(&source, &[json!(2)]).unwrap();
        let picked = picked.as_array().unwrap();
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
    }

    #[test]
    fn test_constant() {
        let source = FakerSource::seeded(0);
        assert_eq!(Generator::constant(json!("a")).generate(&source).unwrap(), json!("a"));
    }
}
