use chancy::adapters::document::FormDocument;
use chancy::adapters::faker::FakerSource;
use chancy::config::Settings;
use chancy::domain::options::OVERWRITE;
use chancy::domain::{FillOptions, Target};
use chancy::Chancy;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const SIGNUP_YAML: &str = r#"
name: signup
elements:
  - type: email
    name: email
  - type: text
    name: nickname
    chance:
      - ["ada", "grace"]
  - type: number
    name: age
    chance:
      - integer
      - min: 18
        max: 21
  - type: checkbox
    name: topics
    value: rust
  - type: checkbox
    name: topics
    value: go
  - tag: select
    name: plan
    options:
      - value: ""
        label: Choose one
      - value: free
      - value: pro
  - type: hidden
    name: csrf
    value: token
"#;

const CONTACT_JSON: &str = r#"{
  "chance": [{"overwrite": true}],
  "elements": [
    {"type": "text", "name": "subject", "value": "prefilled"},
    {"tag": "textarea", "name": "body"}
  ]
}"#;

const SURVEY_TOML: &str = r#"
name = "survey"

[[elements]]
type = "radio"
name = "rating"
value = "1"

[[elements]]
type = "radio"
name = "rating"
value = "2"

[[elements]]
type = "range"
name = "score"
attributes = { min = "10", max = "20", step = "5" }
"#;

fn write_forms(dir: &TempDir) -> anyhow::Result<()> {
    fs::write(dir.path().join("signup.yaml"), SIGNUP_YAML)?;
    fs::write(dir.path().join("contact.json"), CONTACT_JSON)?;
    fs::write(dir.path().join("survey.toml"), SURVEY_TOML)?;
    Ok(())
}

#[test]
fn test_bound_document_honours_chance_arguments() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_forms(&dir)?;
    let engine = Chancy::new(FakerSource::seeded(5));

    let template = chancy::load_form(&engine, &dir.path().join("signup.yaml"))?;
    for values in chancy::fill_rounds(&engine, &template, 30)? {
        assert!(values["email"].as_str().unwrap().contains('@'));
        let nickname = values["nickname"].as_str().unwrap();
        assert!(nickname == "ada" || nickname == "grace");
        let age: i64 = values["age"].as_str().unwrap().parse()?;
        assert!((18..=21).contains(&age));
        assert!(!values["topics"].as_array().unwrap().is_empty());
        let plan = values["plan"].as_str().unwrap();
        assert!(plan == "free" || plan == "pro");
        assert_eq!(values["csrf"], json!("token"));
    }
    Ok(())
}

#[test]
fn test_form_level_chance_sets_overwrite() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_forms(&dir)?;
    let engine = Chancy::new(FakerSource::seeded(6));

    let mut form = chancy::load_form(&engine, &dir.path().join("contact.json"))?;
    assert_eq!(form.name.as_deref(), Some("contact"));
    engine.fill_form(&mut form, None)?;
    let values = form.values();
    assert_ne!(values["subject"], json!("prefilled"));
    assert!(values["body"].is_string());
    Ok(())
}

#[test]
fn test_toml_document_range_and_radio() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_forms(&dir)?;
    let engine = Chancy::new(FakerSource::seeded(7));

    let template = chancy::load_form(&engine, &dir.path().join("survey.toml"))?;
    for values in chancy::fill_rounds(&engine, &template, 30)? {
        let rating = values["rating"].as_str().unwrap();
        assert!(rating == "1" || rating == "2");
        let score = values["score"].as_str().unwrap();
        assert!(score == "10" || score == "15", "unexpected score {}", score);
    }
    Ok(())
}

#[test]
fn test_run_fills_every_matching_document() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_forms(&dir)?;
    fs::write(dir.path().join("broken.json"), "{ not json")?;

    let mut settings = Settings::default();
    settings.source.seed = Some(8);
    settings.run.rounds = 3;
    settings.run.forms = vec![format!("{}/*", dir.path().display())];

    let output = chancy::run(&settings)?;
    let forms = output.as_object().unwrap();
    assert_eq!(forms.len(), 3);
    for name in ["signup", "contact", "survey"] {
        assert_eq!(forms[name].as_array().unwrap().len(), 3, "{} rounds", name);
    }
    Ok(())
}

#[test]
fn test_seeded_runs_repeat() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_forms(&dir)?;

    let mut settings = Settings::default();
    settings.source.seed = Some(99);
    settings.run.forms = vec![format!("{}/signup.yaml", dir.path().display())];

    assert_eq!(chancy::run(&settings)?, chancy::run(&settings)?);
    Ok(())
}

#[test]
fn test_document_with_unknown_operation_is_skipped() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"elements": [{"type": "text", "name": "t", "chance": ["no_such_generator"]}]}"#,
    )?;

    let engine = Chancy::new(FakerSource::seeded(9));
    let err = chancy::load_form(&engine, &path).unwrap_err();
    assert!(err.to_string().contains("no_such_generator"));

    let mut settings = Settings::default();
    settings.run.forms = vec![path.display().to_string()];
    assert_eq!(chancy::run(&settings)?, json!({}));
    Ok(())
}

#[test]
fn test_clearing_configuration_restores_default() -> anyhow::Result<()> {
    let engine = Chancy::new(FakerSource::seeded(10));
    let mut form: FormDocument = serde_json::from_str(
        r#"{"elements": [{"type": "text", "name": "t", "chance": [["only"]]}]}"#,
    )?;
    form.bind(&engine)?;
    let overwrite = FillOptions::new().with(OVERWRITE, true);

    let mut target = form.target("t").unwrap();
    engine.fill(&mut target, Some(&overwrite))?;
    assert_eq!(target.current_value(), json!("only"));

    engine.configure(&mut target, [json!(null)])?;
    engine.fill(&mut target, Some(&overwrite))?;
    assert_ne!(target.current_value(), json!("only"));
    Ok(())
}
