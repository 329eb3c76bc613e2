//! Error types for the collection core.

use thiserror::Error;

use crate::protocol::EntityRef;
use bulletin_types::EntityId;

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors surfaced by sources and coordinators.
///
/// Partial batch failure is deliberately not represented here; it is
/// reported through [`BulkOutcome`](crate::BulkOutcome) on the success
/// path.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// No usable response at all: connect failure, timeout, or an
    /// undecodable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// Credentials missing, expired, or rejected.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The request itself was invalid; previous view state is retained.
    #[error("validation error: {0}")]
    Validation(String),

    /// Business-rule refusal, with the referencing entities when the
    /// backend names them.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        references: Vec<EntityRef>,
    },

    /// Any other error response from the backend.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A mutation for this id is already in flight.
    #[error("a mutation for {0} is already in flight")]
    MutationInFlight(EntityId),

    /// The manager was closed; no further operations are accepted.
    #[error("collection manager is closed")]
    Closed,
}

impl CollectionError {
    /// Whether this is a business-rule conflict (presented as guidance,
    /// not as a failure).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
