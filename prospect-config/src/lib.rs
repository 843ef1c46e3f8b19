//! Loader for workspace configuration with YAML + environment overlays.
//!
//! A `prospect.yaml` file names the lead sheet, scrape tuning, and an
//! optional LLM provider. `PROSPECT__`-prefixed environment variables
//! override file values, and `${VAR}` placeholders inside values are
//! expanded recursively (depth-capped) so secrets can stay out of the file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct ProspectConfig {
    pub version: Option<String>,
    pub sheet: SheetConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub llm: Option<LlmSpec>,
}

/// Where leads come from and where results go.
#[derive(Debug, Deserialize)]
pub struct SheetConfig {
    pub input_path: String,
    pub output_path: String,
    #[serde(default = "default_website_column")]
    pub website_column: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
}

/// Fetch tuning handed to the pipeline. The retry budget lives here, not in
/// the fetch layer.
#[derive(Debug, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: 0,
        }
    }
}

/// The tag is `provider`; one variant per supported backend.
#[derive(Debug, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmSpec {
    Openai {
        model: String,
        auth_token: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<u32>,
        #[serde(default = "default_openai_endpoint")]
        endpoint: String,
    },
}

fn default_website_column() -> String {
    "website".into()
}
fn default_name_column() -> String {
    "name".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ProspectConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ProspectConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProspectConfigLoader {
    /// Start with the defaults: `PROSPECT__` env overrides, files attached
    /// via [`ProspectConfigLoader::with_file`].
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("PROSPECT").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use prospect_config::ProspectConfigLoader;
    ///
    /// let cfg = ProspectConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "1"
    /// sheet:
    ///   input_path: "leads.csv"
    ///   output_path: "out.csv"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert_eq!(cfg.scrape.timeout_secs, 10);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources, expanding
    /// `${VAR}` placeholders along the way.
    pub fn load(self) -> Result<ProspectConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ProspectConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
