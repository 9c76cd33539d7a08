use crate::core::{ChatMessage, PlannerVariant, TripRequest};
use regex::{Captures, Regex};
use std::sync::OnceLock;

pub const DAY_TRIP_SYSTEM_PROMPT: &str = "You are a helpful travel assistant. Create a day trip \
itinerary for {city} based on the user's interests: {interests}. Provide a brief, bulleted itinerary.";
pub const DAY_TRIP_HUMAN_PROMPT: &str = "Create an itinerary for my day trip.";

pub const MULTI_DAY_SYSTEM_PROMPT: &str = "You are a helpful travel assistant. Create a multi-day \
travel itinerary for a trip from {start_city} to {destination} lasting {days} days. Include travel \
details, sightseeing spots, and food suggestions. Break down the plan day by day. If the user has \
shared interests, include them as well. User interests: {interests}.";
pub const MULTI_DAY_HUMAN_PROMPT: &str = "Create my travel itinerary.";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system: String,
    pub human: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            human: human.into(),
        }
    }

    pub fn for_variant(variant: PlannerVariant) -> Self {
        match variant {
            PlannerVariant::DayTrip => Self::new(DAY_TRIP_SYSTEM_PROMPT, DAY_TRIP_HUMAN_PROMPT),
            PlannerVariant::MultiDay => Self::new(MULTI_DAY_SYSTEM_PROMPT, MULTI_DAY_HUMAN_PROMPT),
        }
    }
}

/// Fills a template from a trip request. Values go in verbatim.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn for_variant(variant: PlannerVariant) -> Self {
        Self::new(PromptTemplate::for_variant(variant))
    }

    pub fn build(&self, request: &TripRequest) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(render(&self.template.system, request)),
            ChatMessage::user(render(&self.template.human, request)),
        ]
    }
}

fn placeholder_value(name: &str, request: &TripRequest) -> Option<String> {
    match name {
        "city" | "destination" => Some(request.destination.clone()),
        "start_city" | "origin" => Some(request.origin.clone().unwrap_or_default()),
        "days" => Some(request.day_count.to_string()),
        "interests" => Some(request.interests_joined()),
        _ => None,
    }
}

// Single pass: text pulled in from the request is never scanned again.
fn render(template: &str, request: &TripRequest) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            placeholder_value(&caps[1], request).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Role;

    #[test]
    fn test_multi_day_prompt_contains_request_fields() {
        let request = TripRequest::new(Some("Boston"), "Paris", 3, "art, wine").unwrap();
        let messages = PromptBuilder::for_variant(PlannerVariant::MultiDay).build(&request);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        let system = &messages[0].content;
        assert!(system.contains("Boston"));
        assert!(system.contains("Paris"));
        assert!(system.contains("3"));
        assert!(system.contains("from Boston to Paris lasting 3 days"));
        assert!(system.contains("art, wine"));

        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, MULTI_DAY_HUMAN_PROMPT);
    }

    #[test]
    fn test_day_trip_prompt() {
        let request = TripRequest::day_trip("Paris", "food, museums, , nightlife");
        let messages = PromptBuilder::for_variant(PlannerVariant::DayTrip).build(&request);

        assert_eq!(
            messages[0].content,
            "You are a helpful travel assistant. Create a day trip itinerary for Paris based on \
the user's interests: food, museums, nightlife. Provide a brief, bulleted itinerary."
        );
        assert_eq!(messages[1].content, "Create an itinerary for my day trip.");
    }

    #[test]
    fn test_user_input_inserted_verbatim_and_not_reexpanded() {
        let request = TripRequest::day_trip("<b>{days}</b> \"Rome\"", "");
        let messages = PromptBuilder::for_variant(PlannerVariant::DayTrip).build(&request);
        assert!(messages[0].content.contains("for <b>{days}</b> \"Rome\" based"));
    }

    #[test]
    fn test_unknown_placeholder_is_left_alone() {
        let builder = PromptBuilder::new(PromptTemplate::new("Go to {city} with {budget}", "{days}"));
        let request = TripRequest::new(None, "Lisbon", 2, "").unwrap();
        let messages = builder.build(&request);
        assert_eq!(messages[0].content, "Go to Lisbon with {budget}");
        assert_eq!(messages[1].content, "2");
    }

    #[test]
    fn test_missing_origin_renders_empty() {
        let builder = PromptBuilder::new(PromptTemplate::new("[{origin}]", "ok"));
        let request = TripRequest::new(None, "Lisbon", 2, "").unwrap();
        assert_eq!(builder.build(&request)[0].content, "[]");
    }
}
