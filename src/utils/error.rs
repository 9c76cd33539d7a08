use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Completion service error{}: {message}", status_suffix(.status))]
    UpstreamError { status: Option<u16>, message: String },

    #[error("Document render error: {message}")]
    RenderError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Render,
    Validation,
    System,
}

impl PlannerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            status,
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::RenderError { .. } => ErrorCategory::Render,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Message shown in place of the itinerary when a submission fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message } => {
                format!("The planner is not configured correctly: {}", message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("The planner is not configured correctly: {} {}", field, reason)
            }
            Self::UpstreamError { .. } => {
                format!("The itinerary service could not complete the request. {}", self)
            }
            Self::RenderError { message } => {
                format!("The itinerary could not be exported: {}", message)
            }
            Self::ValidationError { message } => message.clone(),
            Self::IoError(e) => format!("A local file operation failed: {}", e),
            Self::SerializationError(e) => format!("Unexpected data format: {}", e),
        }
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        // a client that could not be built is a local setup problem, not the service's
        if err.is_builder() {
            return Self::configuration(format!("could not build HTTP client: {}", err));
        }
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("could not connect: {}", err)
        } else {
            err.to_string()
        };
        Self::UpstreamError { status, message }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
