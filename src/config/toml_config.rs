use crate::core::completion::{CompletionSettings, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT};
use crate::core::planner::DEFAULT_MAX_DOCUMENTS;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:7860";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_DAY_TRIP_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_MULTI_DAY_MODEL: &str = "llama3-70b-8192";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub completion: Option<CompletionSection>,
    pub variants: Option<VariantsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub output_dir: Option<String>,
    /// Generated documents kept in `output_dir` before the oldest are deleted
    pub max_documents: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionSection {
    pub endpoint: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantsSection {
    pub day_trip: Option<VariantSection>,
    pub multi_day: Option<VariantSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantSection {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub human_prompt: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text, after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| {
            PlannerError::configuration(format!("TOML parsing error: {}", e))
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn output_dir(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.output_dir.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    pub fn max_documents(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.max_documents)
            .unwrap_or(DEFAULT_MAX_DOCUMENTS)
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        let defaults = CompletionSettings::default();
        let section = self.completion.clone().unwrap_or_default();
        CompletionSettings {
            endpoint: section.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key_env: section
                .api_key_env
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            temperature: section.temperature.unwrap_or(defaults.temperature),
            timeout_seconds: section.timeout_seconds.unwrap_or(defaults.timeout_seconds),
        }
    }

    pub fn day_trip(&self) -> VariantSection {
        self.variants
            .as_ref()
            .and_then(|v| v.day_trip.clone())
            .unwrap_or_default()
    }

    pub fn multi_day(&self) -> VariantSection {
        self.variants
            .as_ref()
            .and_then(|v| v.multi_day.clone())
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", self.bind())?;
        validation::validate_path("server.output_dir", self.output_dir())?;
        validation::validate_positive_number("server.max_documents", self.max_documents() as u64, 1)?;

        let completion = self.completion_settings();
        validation::validate_url("completion.endpoint", &completion.endpoint)?;
        validation::validate_non_empty_string("completion.api_key_env", &completion.api_key_env)?;
        validation::validate_range("completion.temperature", completion.temperature, 0.0, 2.0)?;
        validation::validate_positive_number(
            "completion.timeout_seconds",
            completion.timeout_seconds,
            1,
        )?;

        for (name, section) in [
            ("variants.day_trip", self.day_trip()),
            ("variants.multi_day", self.multi_day()),
        ] {
            if let Some(model) = &section.model {
                validation::validate_non_empty_string(&format!("{}.model", name), model)?;
            }
            if let Some(prompt) = &section.system_prompt {
                validation::validate_non_empty_string(&format!("{}.system_prompt", name), prompt)?;
            }
        }

        Ok(())
    }
}
