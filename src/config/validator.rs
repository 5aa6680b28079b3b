use std::collections::HashSet;
use thiserror::Error;

use crate::adapters::document::{Element, ElementTag, FormDocument};
use crate::config::Settings;
use crate::domain::TargetKind;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if settings.run.rounds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "run.rounds".to_string(),
                reason: "Rounds must be greater than 0".to_string(),
            });
        }

        if let Err(e) = Self::validate_log_level(&settings.log_level) {
            errors.push(e);
        }

        let mut seen = HashSet::new();
        for (i, pattern) in settings.run.forms.iter().enumerate() {
            if pattern.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("run.forms[{}]", i)));
            } else if !seen.insert(pattern.as_str()) {
                errors.push(ValidationError::Duplicate(format!("form pattern '{}'", pattern)));
            } else if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("run.forms[{}]", i),
                    reason: e.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Plain levels, or `target=level` directives as `RUST_LOG` accepts them.
    fn validate_log_level(level: &str) -> Result<(), ValidationError> {
        let valid = !level.is_empty()
            && level.split(',').all(|directive| {
                let level = directive.rsplit('=').next().unwrap_or(directive);
                LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str())
            });
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: "log_level".to_string(),
                reason: format!("'{}' is not one of {}", level, LOG_LEVELS.join(", ")),
            })
        }
    }

    /// Structural checks on a loaded form document.
    pub fn validate_document(document: &FormDocument) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (i, element) in document.elements.iter().enumerate() {
            let field = format!("elements[{}]", i);
            Self::validate_element(&field, element, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_element(field: &str, element: &Element, errors: &mut Vec<ValidationError>) {
        let grouped = element.kinds().first().map(TargetKind::is_grouped).unwrap_or(false);
        if grouped {
            if element.name.as_deref().map(str::is_empty).unwrap_or(true) {
                errors.push(ValidationError::MissingField(format!("{}.name", field)));
            }
            if element.value.as_deref().map(str::is_empty).unwrap_or(true) {
                errors.push(ValidationError::MissingField(format!("{}.value", field)));
            }
        }

        if element.tag == ElementTag::Select {
            let mut values = HashSet::new();
            for option in &element.options {
                if !option.value.is_empty() && !values.insert(option.value.as_str()) {
                    errors.push(ValidationError::Duplicate(format!(
                        "{}.options value '{}'",
                        field, option.value
                    )));
                }
            }
            if !element.multiple && element.options.iter().filter(|o| o.selected).count() > 1 {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.options", field),
                    reason: "A single select can have at most one selected option".to_string(),
                });
            }
        } else if !element.options.is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: format!("{}.options", field),
                reason: "Only select elements carry options".to_string(),
            });
        }

        if let Some(chance) = &element.chance {
            if chance.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.chance", field),
                    reason: "Use null to clear, or give at least one argument".to_string(),
                });
            }
        }
    }
}
