use crate::core::completion::CompletionClient;
use crate::core::prompt::{PromptBuilder, PromptTemplate};
use crate::core::{
    CompletionTransport, DocumentRenderer, ItineraryResult, PlannerVariant, Storage, TripRequest,
};
use crate::utils::error::{PlannerError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

const GENERATED_PREFIX: &str = "itinerary-";
/// Generated documents kept in storage; older ones are pruned after each export.
pub const DEFAULT_MAX_DOCUMENTS: usize = 20;

#[derive(Debug, Clone)]
pub struct VariantSettings {
    pub model: String,
    pub template: PromptTemplate,
}

impl VariantSettings {
    pub fn new(model: impl Into<String>, template: PromptTemplate) -> Self {
        Self {
            model: model.into(),
            template,
        }
    }
}

/// Runs one submission: build prompt, call the completion service, export when the variant asks.
pub struct TripPlanner<T: CompletionTransport, S: Storage> {
    client: CompletionClient<T>,
    storage: S,
    renderer: Box<dyn DocumentRenderer>,
    day_trip: VariantSettings,
    multi_day: VariantSettings,
    export_counter: AtomicU64,
    max_documents: usize,
}

impl<T: CompletionTransport, S: Storage> TripPlanner<T, S> {
    pub fn new(
        client: CompletionClient<T>,
        storage: S,
        renderer: Box<dyn DocumentRenderer>,
        day_trip: VariantSettings,
        multi_day: VariantSettings,
    ) -> Self {
        Self {
            client,
            storage,
            renderer,
            day_trip,
            multi_day,
            export_counter: AtomicU64::new(0),
            max_documents: DEFAULT_MAX_DOCUMENTS,
        }
    }

    /// Caps how many generated documents stay in storage. Never below one.
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents.max(1);
        self
    }

    pub fn document_content_type(&self) -> &'static str {
        self.renderer.content_type()
    }

    pub fn variant_settings(&self, variant: PlannerVariant) -> &VariantSettings {
        match variant {
            PlannerVariant::DayTrip => &self.day_trip,
            PlannerVariant::MultiDay => &self.multi_day,
        }
    }

    pub async fn plan(
        &self,
        variant: PlannerVariant,
        request: &TripRequest,
    ) -> Result<ItineraryResult> {
        let settings = self.variant_settings(variant);
        tracing::info!(
            "Planning {} itinerary: {} -> {} ({} days, {} interests)",
            variant,
            request.origin.as_deref().unwrap_or("-"),
            request.destination,
            request.day_count,
            request.interests.len()
        );

        let messages = PromptBuilder::new(settings.template.clone()).build(request);
        let text = self.client.complete(&settings.model, &messages).await?;
        tracing::info!("Received itinerary ({} chars)", text.chars().count());

        let document = if variant.exports_document() {
            Some(self.export(&text, None).await?)
        } else {
            None
        };

        Ok(ItineraryResult { text, document })
    }

    /// Renders `text` and stores it, returning the stored file name.
    pub async fn export(&self, text: &str, filename: Option<&str>) -> Result<String> {
        let filename = match filename {
            Some(name) => {
                validate_document_name(name, self.renderer.extension())?;
                name.to_string()
            }
            None => self.next_document_name(),
        };

        let data = self.renderer.render("Travel Itinerary", text)?;

        tracing::debug!("Writing {} ({} bytes) to storage", filename, data.len());
        self.storage
            .write_file(&filename, &data)
            .await
            .map_err(|e| PlannerError::render(format!("could not write {}: {}", filename, e)))?;

        tracing::info!("Exported itinerary to {}", filename);
        self.prune_documents().await;
        Ok(filename)
    }

    /// Deletes the oldest generated documents beyond `max_documents`.
    /// Names supplied by callers are left alone. Failures are logged, not returned.
    async fn prune_documents(&self) {
        let suffix = format!(".{}", self.renderer.extension());
        let mut generated: Vec<String> = match self.storage.list_files().await {
            Ok(names) => names
                .into_iter()
                .filter(|name| name.starts_with(GENERATED_PREFIX) && name.ends_with(&suffix))
                .collect(),
            Err(e) => {
                tracing::warn!("Could not list stored documents: {}", e);
                return;
            }
        };
        if generated.len() <= self.max_documents {
            return;
        }

        // timestamp then zero-padded counter, so name order is creation order
        generated.sort();
        let excess = generated.len() - self.max_documents;
        for name in &generated[..excess] {
            match self.storage.delete_file(name).await {
                Ok(()) => tracing::debug!("Pruned old document {}", name),
                Err(e) => tracing::warn!("Could not prune {}: {}", name, e),
            }
        }
    }

    pub async fn load_document(&self, name: &str) -> Result<Vec<u8>> {
        validate_document_name(name, self.renderer.extension())?;
        self.storage.read_file(name).await
    }

    fn next_document_name(&self) -> String {
        let seq = self.export_counter.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}{}-{:06}.{}",
            GENERATED_PREFIX,
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            seq,
            self.renderer.extension()
        )
    }
}

/// Document names are flat: `[A-Za-z0-9._-]`, no leading dot, expected extension.
pub fn validate_document_name(name: &str, extension: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let suffix = format!(".{}", extension);

    if name.is_empty()
        || !valid_chars
        || name.starts_with('.')
        || !name.ends_with(&suffix)
        || name.len() == suffix.len()
    {
        return Err(PlannerError::validation(format!(
            "Invalid document name: {}",
            name
        )));
    }
    Ok(())
}
