pub mod toml_config;

use crate::core::completion::CompletionSettings;
use crate::core::planner::VariantSettings;
use crate::core::prompt::PromptTemplate;
use crate::core::PlannerVariant;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::{
    TomlConfig, VariantSection, DEFAULT_DAY_TRIP_MODEL, DEFAULT_MULTI_DAY_MODEL,
};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "trip-planner")]
#[command(about = "Web form that turns a destination and interests into an itinerary")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address the web form listens on (overrides [server].bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory exported PDFs are written to (overrides [server].output_dir)
    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

/// Effective settings after merging defaults, the TOML file and CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub output_dir: String,
    pub max_documents: usize,
    pub completion: CompletionSettings,
    pub day_trip: VariantSettings,
    pub multi_day: VariantSettings,
}

impl AppConfig {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        file_config.validate()?;

        Ok(Self::merge(&file_config, cli))
    }

    pub fn merge(file_config: &TomlConfig, cli: &CliConfig) -> Self {
        Self {
            bind: cli
                .bind
                .clone()
                .unwrap_or_else(|| file_config.bind().to_string()),
            output_dir: cli
                .output_dir
                .clone()
                .unwrap_or_else(|| file_config.output_dir().to_string()),
            max_documents: file_config.max_documents(),
            completion: file_config.completion_settings(),
            day_trip: variant_settings(
                PlannerVariant::DayTrip,
                &file_config.day_trip(),
                DEFAULT_DAY_TRIP_MODEL,
            ),
            multi_day: variant_settings(
                PlannerVariant::MultiDay,
                &file_config.multi_day(),
                DEFAULT_MULTI_DAY_MODEL,
            ),
        }
    }
}

fn variant_settings(
    variant: PlannerVariant,
    section: &VariantSection,
    default_model: &str,
) -> VariantSettings {
    let defaults = PromptTemplate::for_variant(variant);
    let template = PromptTemplate::new(
        section.system_prompt.clone().unwrap_or(defaults.system),
        section.human_prompt.clone().unwrap_or(defaults.human),
    );
    VariantSettings::new(
        section
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        template,
    )
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("bind", &self.bind)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_non_empty_string("variants.day_trip.model", &self.day_trip.model)?;
        validation::validate_non_empty_string("variants.multi_day.model", &self.multi_day.model)?;
        Ok(())
    }
}
