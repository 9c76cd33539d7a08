use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// Longest trip the multi-day form offers.
pub const MAX_DAYS: u32 = 15;

/// Splits a comma-separated interest list, trimming entries and dropping blanks.
pub fn parse_interests(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: Option<String>,
    pub destination: String,
    pub day_count: u32,
    pub interests: Vec<String>,
}

impl TripRequest {
    pub fn new(
        origin: Option<&str>,
        destination: &str,
        day_count: u32,
        interests_input: &str,
    ) -> Result<Self> {
        if day_count == 0 {
            return Err(PlannerError::validation(
                "Number of days must be at least 1",
            ));
        }

        let origin = origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string);

        Ok(Self {
            origin,
            destination: destination.to_string(),
            day_count,
            interests: parse_interests(interests_input),
        })
    }

    pub fn day_trip(city: &str, interests_input: &str) -> Self {
        Self {
            origin: None,
            destination: city.to_string(),
            day_count: 1,
            interests: parse_interests(interests_input),
        }
    }

    pub fn interests_joined(&self) -> String {
        self.interests.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryResult {
    pub text: String,
    /// File name of the exported document, when the variant exports one.
    pub document: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannerVariant {
    DayTrip,
    MultiDay,
}

impl PlannerVariant {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::DayTrip => "day-trip",
            Self::MultiDay => "multi-day",
        }
    }

    pub fn exports_document(&self) -> bool {
        matches!(self, Self::MultiDay)
    }
}

impl std::fmt::Display for PlannerVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
