pub mod completion;
pub mod planner;
pub mod prompt;

pub use crate::domain::model::{ChatMessage, ItineraryResult, PlannerVariant, TripRequest};
pub use crate::domain::ports::{CompletionTransport, DocumentRenderer, Storage, TransportResponse};
pub use crate::utils::error::Result;
