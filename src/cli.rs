use crate::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Chancy - fill form documents with random, plausible values
#[derive(Parser, Debug, Clone)]
#[command(name = "chancy", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "CHANCY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// RNG seed for reproducible output
    #[arg(long, env = "CHANCY_SEED")]
    pub seed: Option<u64>,

    /// Number of fills per form document
    #[arg(long, env = "CHANCY_ROUNDS")]
    pub rounds: Option<u32>,

    /// Let selectable targets come out blank
    #[arg(long, env = "CHANCY_ALLOW_BLANK", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub allow_blank: Option<bool>,

    /// Select at most one option in multi-valued targets
    #[arg(long, env = "CHANCY_NO_MULTIPLE", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub no_multiple: Option<bool>,

    /// Replace values already present in the document
    #[arg(long, env = "CHANCY_OVERWRITE", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub overwrite: Option<bool>,

    /// Pretty-print the JSON output
    #[arg(long, env = "CHANCY_PRETTY", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub pretty: Option<bool>,

    /// Log level or RUST_LOG-style directives
    #[arg(long, env = "CHANCY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Form documents (JSON, YAML or TOML), as paths or glob patterns
    pub forms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["chancy"]);
        assert_eq!(cli.config, PathBuf::from("chancy.toml"));
        assert!(cli.seed.is_none());
        assert!(cli.rounds.is_none());
        assert!(cli.allow_blank.is_none());
        assert!(cli.overwrite.is_none());
        assert!(cli.forms.is_empty());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "chancy",
            "--config",
            "custom.toml",
            "--seed",
            "42",
            "--rounds",
            "3",
            "--allow-blank",
            "--overwrite=false",
            "--pretty",
            "forms/*.json",
            "signup.yaml",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.rounds, Some(3));
        assert_eq!(cli.allow_blank, Some(true));
        assert_eq!(cli.overwrite, Some(false));
        assert_eq!(cli.pretty, Some(true));
        assert!(cli.no_multiple.is_none());
        assert_eq!(cli.forms, vec!["forms/*.json".to_string(), "signup.yaml".to_string()]);
    }

    #[test]
    fn test_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["chancy", "--seed", "-1"]).is_err());
    }
}
