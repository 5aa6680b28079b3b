use crate::adapters::faker::FakerSource;
use crate::domain::{Configurable, Container, FillOptions, FillResult, FillSpec, Target, ValueSource};
use crate::resolver::{self, FillArg};
use crate::strategy::{StageContext, StrategyRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The fill engine: a value source, the strategy table and the default
/// options every fill starts from.
pub struct Chancy<S: ValueSource = FakerSource> {
    source: Arc<S>,
    registry: StrategyRegistry,
    defaults: FillOptions,
}

impl<S: ValueSource> Chancy<S> {
    pub fn new(source: S) -> Self {
        Self::shared(Arc::new(source))
    }

    pub fn shared(source: Arc<S>) -> Self {
        Self {
            source,
            registry: StrategyRegistry::standard(),
            defaults: FillOptions::defaults(),
        }
    }

    /// Overlay `overrides` on the built-in defaults.
    pub fn with_defaults(mut self, overrides: &FillOptions) -> Self {
        self.defaults = FillOptions::layered([&FillOptions::defaults(), overrides]);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> &FillOptions {
        &self.defaults
    }

    /// Attach a fill configuration to `target`. See [`resolver::configure`].
    pub fn configure<'t, T, I>(&self, target: &'t mut T, args: I) -> FillResult<&'t mut T>
    where
        T: Configurable + ?Sized,
        I: IntoIterator,
        I::Item: Into<FillArg>,
    {
        resolver::configure(target, self.source.as_ref(), args.into_iter().map(Into::into))
    }

    /// Fill one target. Unrecognized targets and "no value" outcomes leave it
    /// untouched.
    pub fn fill<'t, T>(&self, target: &'t mut T, temp: Option<&FillOptions>) -> FillResult<&'t mut T>
    where
        T: Target,
    {
        self.fill_target(target, temp)?;
        Ok(target)
    }

    /// Fill every recognized target of a container once, with the
    /// container's stored options (overlaid by `temp`) as temporary options.
    pub fn fill_form<'c, C>(&self, container: &'c mut C, temp: Option<&FillOptions>) -> FillResult<&'c mut C>
    where
        C: Container + ?Sized,
    {
        let empty = FillOptions::new();
        let stored = container.fill_spec().map(|s| &s.options).unwrap_or(&empty);
        let options = FillOptions::layered([stored, temp.unwrap_or(&empty)]);

        let mut filled = 0usize;
        container.visit_targets(&mut |target: &mut dyn Target| {
            if !self.registry.recognizes(target) {
                return Ok(());
            }
            filled += 1;
            self.fill_target(target, Some(&options))
        })?;
        debug!("Filled {} form targets", filled);
        Ok(container)
    }

    /// Produce the value a fill would commit, without committing it.
    pub fn generate(&self, target: &dyn Target, temp: Option<&FillOptions>) -> FillResult<Value> {
        let Some(entry) = self.registry.dispatch(target) else {
            return Ok(Value::Null);
        };
        let options = FillSpec::resolved_options(target.fill_spec(), &self.defaults, temp);
        let stored = target.fill_spec().and_then(|s| s.generator.as_ref());
        let ctx = StageContext {
            target,
            options: &options,
            source: self.source.as_ref(),
            kind: entry.kind(),
        };
        entry.pipeline().execute(&ctx, stored)
    }

    fn fill_target(&self, target: &mut dyn Target, temp: Option<&FillOptions>) -> FillResult<()> {
        let value = self.generate(target, temp)?;
        if value.is_null() {
            debug!("No value produced, target left unchanged");
            return Ok(());
        }
        target.commit(value);
        Ok(())
    }
}

impl Default for Chancy<FakerSource> {
    fn default() -> Self {
        Self::new(FakerSource::new())
    }
}
