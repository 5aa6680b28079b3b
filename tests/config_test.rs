use chancy::cli::Cli;
use chancy::config::Settings;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_settings_from_file_and_cli() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let chancy_toml = r#"
log_level = "warn"

[fill]
allow_blank = true

[source]
seed = 11

[run]
rounds = 2
forms = ["forms/*.yaml"]
"#;
    let config_path = root.join("chancy.toml");
    fs::write(&config_path, chancy_toml)?;

    let cli = Cli::parse_from([
        "chancy",
        "--config",
        config_path.to_str().unwrap(),
        "--rounds",
        "5",
        "--no-multiple",
    ]);
    let settings = Settings::new_with_cli(&cli)?;

    assert!(settings.fill.allow_blank);
    assert!(!settings.fill.allow_multiple);
    assert_eq!(settings.source.seed, Some(11));
    assert_eq!(settings.run.rounds, 5);
    assert_eq!(settings.run.forms, vec!["forms/*.yaml".to_string()]);
    assert_eq!(settings.log_level, "warn");

    let defaults = settings.fill_defaults();
    assert!(defaults.allow_blank());
    assert!(!defaults.allow_multiple());
    Ok(())
}

#[test]
fn test_missing_config_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cli = Cli::parse_from([
        "chancy",
        "--config",
        temp_dir.path().join("absent.toml").to_str().unwrap(),
    ]);
    let settings = Settings::new_with_cli(&cli)?;
    assert_eq!(settings.run.rounds, 1);
    assert!(settings.run.forms.is_empty());
    assert!(settings.fill.allow_multiple);
    Ok(())
}

#[test]
fn test_cli_override_is_validated() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let cli = Cli::parse_from([
        "chancy",
        "--config",
        temp_dir.path().join("absent.toml").to_str().unwrap(),
        "--rounds",
        "0",
    ]);
    let err = Settings::new_with_cli(&cli).unwrap_err();
    assert!(err.to_string().contains("Configuration validation failed"));
    Ok(())
}
