use crate::core::{CompletionTransport, PlannerVariant, Storage, TripRequest};
use crate::domain::model::MAX_DAYS;
use crate::utils::error::{ErrorCategory, PlannerError};
use crate::web::page::{self, DayTripValues, MultiDayValues, Outcome};
use crate::web::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DayTripForm {
    #[serde(default)]
    pub request: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub interests: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MultiDayForm {
    #[serde(default)]
    pub start_city: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub interests: String,
}

fn status_for(err: &PlannerError) -> StatusCode {
    match err.category() {
        ErrorCategory::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCategory::Configuration | ErrorCategory::Render | ErrorCategory::System => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn log_failure(variant: PlannerVariant, err: &PlannerError) {
    tracing::error!(
        "❌ {} submission failed: {} (Category: {:?})",
        variant,
        err,
        err.category()
    );
}

fn parse_days(raw: &str) -> Result<u32, PlannerError> {
    let out_of_range =
        || PlannerError::validation(format!("Number of days must be between 1 and {}", MAX_DAYS));
    let days: u32 = raw.trim().parse().map_err(|_| out_of_range())?;
    if days == 0 || days > MAX_DAYS {
        return Err(out_of_range());
    }
    Ok(days)
}

pub async fn index() -> Html<String> {
    Html(page::index_page())
}

pub async fn day_trip_form() -> Html<String> {
    Html(page::day_trip_page(&DayTripValues::default(), None))
}

pub async fn multi_day_form() -> Html<String> {
    Html(page::multi_day_page(&MultiDayValues::default(), None))
}

pub async fn submit_day_trip<T, S>(
    State(state): State<AppState<T, S>>,
    Form(form): Form<DayTripForm>,
) -> (StatusCode, Html<String>)
where
    T: CompletionTransport + 'static,
    S: Storage + 'static,
{
    if !form.request.trim().is_empty() {
        tracing::debug!("Day trip initial request: {}", form.request);
    }

    let request = TripRequest::day_trip(&form.city, &form.interests);
    let (status, outcome) = match state.planner.plan(PlannerVariant::DayTrip, &request).await {
        Ok(result) => (
            StatusCode::OK,
            Outcome::Itinerary {
                text: result.text,
                document: result.document,
            },
        ),
        Err(e) => {
            log_failure(PlannerVariant::DayTrip, &e);
            (
                status_for(&e),
                Outcome::Failure {
                    message: e.user_message(),
                },
            )
        }
    };

    let values = DayTripValues {
        request: &form.request,
        city: &form.city,
        interests: &form.interests,
    };
    (status, Html(page::day_trip_page(&values, Some(&outcome))))
}

pub async fn submit_multi_day<T, S>(
    State(state): State<AppState<T, S>>,
    Form(form): Form<MultiDayForm>,
) -> (StatusCode, Html<String>)
where
    T: CompletionTransport + 'static,
    S: Storage + 'static,
{
    let planned = async {
        let days = parse_days(&form.days)?;
        let request = TripRequest::new(
            Some(form.start_city.as_str()),
            &form.destination,
            days,
            &form.interests,
        )?;
        state.planner.plan(PlannerVariant::MultiDay, &request).await
    };

    let (status, outcome) = match planned.await {
        Ok(result) => (
            StatusCode::OK,
            Outcome::Itinerary {
                text: result.text,
                document: result.document,
            },
        ),
        Err(e) => {
            log_failure(PlannerVariant::MultiDay, &e);
            (
                status_for(&e),
                Outcome::Failure {
                    message: e.user_message(),
                },
            )
        }
    };

    let values = MultiDayValues {
        start_city: &form.start_city,
        destination: &form.destination,
        days: parse_days(&form.days).unwrap_or(1),
        interests: &form.interests,
    };
    (status, Html(page::multi_day_page(&values, Some(&outcome))))
}

pub async fn download<T, S>(
    State(state): State<AppState<T, S>>,
    Path(name): Path<String>,
) -> Response
where
    T: CompletionTransport + 'static,
    S: Storage + 'static,
{
    match state.planner.load_document(&name).await {
        Ok(data) => (
            [
                (
                    header::CONTENT_TYPE,
                    state.planner.document_content_type().to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", name),
                ),
            ],
            data,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Download of {} refused: {}", name, e);
            (StatusCode::NOT_FOUND, "Document not found").into_response()
        }
    }
}
