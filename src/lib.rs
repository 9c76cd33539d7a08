pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use adapters::{http::HttpTransport, pdf::PdfRenderer, storage::LocalStorage};
pub use config::{AppConfig, CliConfig};
pub use crate::core::{completion::CompletionClient, planner::TripPlanner, prompt::PromptBuilder};
pub use utils::error::{PlannerError, Result};
