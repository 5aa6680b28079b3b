use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;
use crate::domain::options::{ALLOW_BLANK, ALLOW_MULTIPLE, OVERWRITE};
use crate::domain::FillOptions;

pub const DEFAULT_CONFIG_FILE: &str = "chancy.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub fill: FillSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Default fill options applied to every target
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FillSettings {
    #[serde(default)]
    pub allow_blank: bool,
    #[serde(default = "default_true")]
    pub allow_multiple: bool,
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            allow_blank: false,
            allow_multiple: true,
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourceSettings {
    /// Fixed RNG seed for reproducible fills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunSettings {
    /// Fills per form document
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Form document paths or glob patterns
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub pretty: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            forms: Vec::new(),
            pretty: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rounds() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fill: FillSettings::default(),
            source: SourceSettings::default(),
            run: RunSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (config file, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validated()
    }

    /// Load settings from a file; a missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        Self::load(path)?.validated()
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_default("log_level", default_log_level())?
            .set_default("run.rounds", default_rounds() as i64)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }

    /// Apply CLI argument overrides to settings
    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(allow_blank) = cli.allow_blank {
            self.fill.allow_blank = allow_blank;
        }
        if let Some(no_multiple) = cli.no_multiple {
            self.fill.allow_multiple = !no_multiple;
        }
        if let Some(overwrite) = cli.overwrite {
            self.fill.overwrite = overwrite;
        }
        if let Some(seed) = cli.seed {
            self.source.seed = Some(seed);
        }
        if let Some(rounds) = cli.rounds {
            self.run.rounds = rounds;
        }
        if let Some(pretty) = cli.pretty {
            self.run.pretty = pretty;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        if !cli.forms.is_empty() {
            self.run.forms = cli.forms.clone();
        }
    }

    /// Expand `run.forms` into document paths, keeping only known extensions.
    pub fn form_paths(&self) -> Result<Vec<PathBuf>, anyhow::Error> {
        let mut paths = Vec::new();
        for pattern in &self.run.forms {
            let mut matched = false;
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(path) => {
                        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                            if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                                matched = true;
                                if !paths.contains(&path) {
                                    paths.push(path);
                                }
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
                }
            }
            if !matched {
                tracing::warn!("No form documents match '{}'", pattern);
            }
        }
        Ok(paths)
    }

    /// Engine-wide default options derived from `[fill]`.
    pub fn fill_defaults(&self) -> FillOptions {
        FillOptions::new()
            .with(ALLOW_BLANK, self.fill.allow_blank)
            .with(ALLOW_MULTIPLE, self.fill.allow_multiple)
            .with(OVERWRITE, self.fill.overwrite)
    }
}
