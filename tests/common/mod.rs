#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trip_planner::core::completion::{CompletionClient, CompletionSettings};
use trip_planner::core::planner::{TripPlanner, VariantSettings};
use trip_planner::core::prompt::PromptTemplate;
use trip_planner::core::{CompletionTransport, PlannerVariant, TransportResponse};
use trip_planner::{LocalStorage, PdfRenderer, Result};

/// Transport double returning a canned response and counting calls.
#[derive(Clone)]
pub struct CannedTransport {
    pub status: u16,
    pub body: String,
    pub calls: Arc<AtomicUsize>,
}

impl CannedTransport {
    pub fn ok(text: &str) -> Self {
        Self::with_status(200, &completion_body(text))
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionTransport for CannedTransport {
    async fn post_json(
        &self,
        _url: &str,
        _bearer_token: &str,
        _body: &serde_json::Value,
    ) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

pub fn completion_body(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn build_planner<T: CompletionTransport>(
    settings: CompletionSettings,
    api_key: Option<&str>,
    transport: T,
    storage: LocalStorage,
) -> TripPlanner<T, LocalStorage> {
    let client = CompletionClient::new(settings, api_key.map(str::to_string), transport);
    TripPlanner::new(
        client,
        storage,
        Box::new(PdfRenderer::new()),
        VariantSettings::new(
            "llama-3.3-70b-versatile",
            PromptTemplate::for_variant(PlannerVariant::DayTrip),
        ),
        VariantSettings::new(
            "llama3-70b-8192",
            PromptTemplate::for_variant(PlannerVariant::MultiDay),
        ),
    )
}
