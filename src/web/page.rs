//! Server-rendered HTML for the planner forms.

use crate::domain::model::MAX_DAYS;

/// What the output area shows after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Itinerary {
        text: String,
        document: Option<String>,
    },
    Failure {
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DayTripValues<'a> {
    pub request: &'a str,
    pub city: &'a str,
    pub interests: &'a str,
}

#[derive(Debug, Clone)]
pub struct MultiDayValues<'a> {
    pub start_city: &'a str,
    pub destination: &'a str,
    pub days: u32,
    pub interests: &'a str,
}

impl Default for MultiDayValues<'_> {
    fn default() -> Self {
        Self {
            start_city: "",
            destination: "",
            days: 1,
            interests: "",
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, description: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }}
label {{ display: block; margin-top: 1rem; font-weight: 600; }}
input[type=text], textarea {{ width: 100%; box-sizing: border-box; padding: .4rem; }}
textarea {{ font-family: inherit; }}
.error {{ color: #a40000; background: #fff0f0; padding: .75rem; border-radius: 4px; }}
button {{ margin-top: 1rem; padding: .5rem 1.5rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description}</p>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        description = escape_html(description),
        body = body
    )
}

fn text_input(name: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
<input type="text" id="{name}" name="{name}" value="{value}" placeholder="{placeholder}">"#,
        name = name,
        label = escape_html(label),
        value = escape_html(value),
        placeholder = escape_html(placeholder)
    )
}

fn output_section(label: &str, outcome: Option<&Outcome>) -> String {
    match outcome {
        None => String::new(),
        Some(Outcome::Failure { message }) => format!(
            r#"<section id="output"><h2>{label}</h2>
<p class="error" role="alert">{message}</p></section>"#,
            label = escape_html(label),
            message = escape_html(message)
        ),
        Some(Outcome::Itinerary { text, document }) => {
            let download = document
                .as_ref()
                .map(|name| {
                    format!(
                        r#"<p><a id="download" href="/downloads/{href}" download>Download PDF ({name})</a></p>"#,
                        href = escape_html(name),
                        name = escape_html(name)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<section id="output"><h2>{label}</h2>
<textarea id="itinerary" rows="20" readonly>{text}</textarea>
{download}</section>"#,
                label = escape_html(label),
                text = escape_html(text),
                download = download
            )
        }
    }
}

pub fn index_page() -> String {
    layout(
        "Trip Planner",
        "Pick a planner to generate an itinerary.",
        r#"<ul>
<li><a href="/day-trip">🗺️ Day trip planner</a></li>
<li><a href="/multi-day">🧳 Multi-day travel planner</a> (with PDF export)</li>
</ul>"#,
    )
}

pub fn day_trip_page(values: &DayTripValues<'_>, outcome: Option<&Outcome>) -> String {
    let form = format!(
        r#"<form method="post" action="/day-trip">
{request}
{city}
{interests}
<button type="submit">Plan my day</button>
</form>
{output}"#,
        request = text_input(
            "request",
            "Initial Request",
            values.request,
            "e.g., I want to plan a road trip"
        ),
        city = text_input("city", "City", values.city, "e.g., Paris"),
        interests = text_input(
            "interests",
            "Your Interests (comma-separated)",
            values.interests,
            "e.g., food, museums, nightlife"
        ),
        output = output_section("Day Trip Itinerary", outcome)
    );

    layout(
        "🗺️ Trip Planner",
        "Enter your request, the city you want to visit, and your interests. \
         The assistant will generate a one-day itinerary for you.",
        &form,
    )
}

pub fn multi_day_page(values: &MultiDayValues<'_>, outcome: Option<&Outcome>) -> String {
    let form = format!(
        r#"<form method="post" action="/multi-day">
{start}
{destination}
<label for="days">Number of Days: <output id="days-value">{days}</output></label>
<input type="range" id="days" name="days" min="1" max="{max_days}" step="1" value="{days}"
 oninput="document.getElementById('days-value').value = this.value">
{interests}
<button type="submit">Plan my trip</button>
</form>
{output}"#,
        start = text_input("start_city", "Start Location", values.start_city, ""),
        destination = text_input("destination", "Destination", values.destination, ""),
        days = values.days,
        max_days = MAX_DAYS,
        interests = text_input(
            "interests",
            "Your Interests (Optional)",
            values.interests,
            "e.g., nature, adventure, culture"
        ),
        output = output_section("Day-wise Travel Itinerary", outcome)
    );

    layout(
        "🧳 Multi-Day Travel Planner",
        "Enter your trip details and interests to get a full day-by-day itinerary. \
         You can also download the itinerary as a PDF.",
        &form,
    )
}
