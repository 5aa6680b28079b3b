//! # Chancy - randomized form filling
//!
//! Chancy fills form controls with random but plausible values. Each kind of
//! control (text, email, range, checkbox group, select, ...) has a strategy:
//! a short pipeline of stages that picks a default generator, honours the
//! `overwrite` option, mixes in blank outcomes and multiple selections, and
//! finally commits the value.
//!
//! ## Features
//!
//! - **19 target kinds**, dispatched most specific first
//! - **Configurable targets**: candidate lists, named generators
//!   (`email`, `integer`, `weighted`, ...) or custom closures, plus options
//! - **Weighted blanks**: blank outcomes weighted against the number of
//!   possible selections
//! - **Form documents**: JSON, YAML or TOML forms with per-element configuration
//! - **Reproducible**: seedable value source
//!
//! ## Quick Start
//!
//! ```rust
//! use chancy::adapters::document::{Element, FormDocument};
//! use chancy::Chancy;
//! use serde_json::json;
//!
//! let chancy: Chancy = Chancy::default();
//! let mut form = FormDocument::new(vec![
//!     Element::input("email", "email"),
//!     Element::checkbox("topics", "rust"),
//!     Element::checkbox("topics", "go"),
//! ]);
//!
//! if let Some(mut email) = form.target("email") {
//!     chancy.configure(&mut email, [json!(["ada@example.com"])])?;
//! }
//! chancy.fill_form(&mut form, None)?;
//!
//! assert_eq!(form.values()["email"], json!("ada@example.com"));
//! # Ok::<(), chancy::domain::FillError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: values, options, generators and the target/value-source traits
//! - **Strategy**: stage combinators, per-kind defaults and the dispatch table
//! - **Resolver**: turns `configure` arguments into a stored fill configuration
//! - **Adapters**: the in-memory form document and the `fake`-backed value source
//! - **Config**: settings file, CLI overrides and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod resolver;
pub mod strategy;


pub use engine::Chancy;

use crate::adapters::document::FormDocument;
use crate::adapters::faker::FakerSource;
use crate::config::validator::ConfigValidator;
use crate::config::Settings;
use crate::domain::{FillResult, ValueSource};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Fill every form document named by the settings.
///
/// Returns an object keyed by form name; each entry holds one exported
/// value map per round. Documents that fail to load or bind are skipped.
pub fn run(settings: &Settings) -> anyhow::Result<Value> {
    let engine = Chancy::new(FakerSource::from_seed(settings.source.seed))
        .with_defaults(&settings.fill_defaults());

    let mut output = Map::new();
    for path in settings.form_paths()? {
        let template = match load_form(&engine, &path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping form document {}: {:#}", path.display(), e);
                continue;
            }
        };

        let mut name = template
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        if output.contains_key(&name) {
            name = path.display().to_string();
        }

        let rounds = fill_rounds(&engine, &template, settings.run.rounds)?;
        info!("Filled form '{}' {} time(s)", name, rounds.len());
        output.insert(name, Value::Array(rounds));
    }
    Ok(Value::Object(output))
}

/// Load, validate and bind a form document.
pub fn load_form<S: ValueSource>(engine: &Chancy<S>, path: &Path) -> anyhow::Result<FormDocument> {
    let mut document = FormDocument::from_path(path)?;
    ConfigValidator::validate_document(&document).map_err(|errors| {
        let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Form validation failed:\n{}", error_messages.join("\n"))
    })?;
    document.bind(engine)?;
    Ok(document)
}

/// Fill fresh copies of `template`, one per round.
pub fn fill_rounds<S: ValueSource>(
    engine: &Chancy<S>,
    template: &FormDocument,
    rounds: u32,
) -> FillResult<Vec<Value>> {
    (0..rounds)
        .map(|round| {
            let mut document = template.clone();
            engine.fill_form(&mut document, None)?;
            debug!(round, "Filled form round");
            Ok(document.values())
        })
        .collect()
}
