use prospect_config::{LlmSpec, ProspectConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_full_config_from_file() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
sheet:
  input_path: "data/leads.csv"
  output_path: "data/output_emails.csv"
  website_column: "Website"
scrape:
  timeout_secs: 10
  retries: 1
llm:
  provider: openai
  model: "gpt-4o-mini"
  auth_token: "${OPENAI_API_KEY}"
  temperature: 0.7
  max_tokens: 500
"#;
    let p = write_yaml(&tmp, "prospect.yaml", file_yaml);

    let config = temp_env::with_var("OPENAI_API_KEY", Some("sk-from-env"), || {
        ProspectConfigLoader::new()
            .with_file(p)
            .load()
            .expect("load prospect config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.sheet.input_path, "data/leads.csv");
    assert_eq!(config.sheet.website_column, "Website");
    // Unset columns keep their defaults.
    assert_eq!(config.sheet.name_column, "name");
    assert_eq!(config.scrape.timeout_secs, 10);
    assert_eq!(config.scrape.retries, 1);

    match config.llm.expect("llm spec present") {
        LlmSpec::Openai {
            model,
            auth_token,
            endpoint,
            ..
        } => {
            assert_eq!(model, "gpt-4o-mini");
            assert_eq!(auth_token, "sk-from-env");
            assert_eq!(endpoint, "https://api.openai.com/v1/");
        }
    }
}

#[test]
#[serial]
fn minimal_config_fills_scrape_defaults_and_skips_llm() {
    let config = ProspectConfigLoader::new()
        .with_yaml_str(
            r#"
sheet:
  input_path: "leads.csv"
  output_path: "out.csv"
"#,
        )
        .load()
        .expect("minimal config loads");

    assert_eq!(config.scrape.timeout_secs, 10);
    assert_eq!(config.scrape.retries, 0);
    assert!(config.llm.is_none());
    assert_eq!(config.sheet.website_column, "website");
}
