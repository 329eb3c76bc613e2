//! Batch operations that must never be all-or-nothing.
//!
//! One failed item never aborts the batch and never raises an error; the
//! caller always gets a complete per-id accounting. Only a whole-batch
//! failure (transport, auth) is an error, and it mutates nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::error::{CollectionError, CollectionResult};
use crate::fetch::FetchCoordinator;
use crate::protocol::BulkDeleteData;
use crate::selection::SelectionStore;
use crate::source::CollectionSource;
use bulletin_types::{Entity, EntityId};

/// Per-id accounting for one batch invocation.
///
/// `succeeded` and `failed` partition the de-duplicated input ids
/// exactly; an outcome exists only once every item has resolved one way
/// or the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: BTreeSet<EntityId>,
    pub failed: BTreeMap<EntityId, String>,
}

impl BulkOutcome {
    /// Reason recorded for input ids the backend failed to mention.
    pub const UNREPORTED: &'static str = "no outcome reported by backend";

    /// Builds the outcome from the wire split, forcing an exact partition
    /// of `ids`: reported successes and failures are taken as-is, anything
    /// unreported counts as failed, ids outside the input are ignored, and
    /// an id reported on both sides counts as failed.
    #[must_use]
    pub fn from_parts(ids: &[EntityId], data: BulkDeleteData) -> Self {
        let requested: BTreeSet<EntityId> = ids.iter().cloned().collect();
        let failed: BTreeMap<EntityId, String> = data
            .failed
            .into_iter()
            .filter(|(id, _)| requested.contains(id))
            .collect();
        let succeeded: BTreeSet<EntityId> = data
            .deleted
            .into_iter()
            .filter(|id| requested.contains(id) && !failed.contains_key(id))
            .collect();
        let mut outcome = Self { succeeded, failed };
        for id in &requested {
            if !outcome.succeeded.contains(id) && !outcome.failed.contains_key(id) {
                outcome
                    .failed
                    .insert(id.clone(), Self::UNREPORTED.to_string());
            }
        }
        outcome
    }

    /// Whether anything failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Whether every item succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of ids accounted for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Runs batch deletes and reconciles the view afterwards.
pub struct BulkExecutor<E, S> {
    source: Arc<S>,
    fetch: FetchCoordinator<E, S>,
    selection: SelectionStore,
    closed: Arc<AtomicBool>,
}

impl<E: Entity, S: CollectionSource<E>> BulkExecutor<E, S> {
    pub(crate) fn new(
        source: Arc<S>,
        fetch: FetchCoordinator<E, S>,
        selection: SelectionStore,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            fetch,
            selection,
            closed,
        }
    }

    /// Deletes `ids` as one batch and resolves exactly once with the
    /// complete outcome. An empty input resolves empty without a request.
    ///
    /// On resolution: succeeded ids leave the local list, the selection is
    /// cleared wholesale, and the current page is re-fetched so pagination
    /// counts reconcile — regardless of partial failure. A refresh failure
    /// surfaces through the list state without failing the batch.
    pub async fn delete_many(&self, ids: &[EntityId]) -> CollectionResult<BulkOutcome> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CollectionError::Closed);
        }
        if ids.is_empty() {
            return Ok(BulkOutcome::default());
        }
        let data = self.source.delete_many(ids).await?;
        let outcome = BulkOutcome::from_parts(ids, data);
        info!(
            kind = E::kind(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk delete resolved"
        );
        self.fetch.store().remove_many(&outcome.succeeded).await;
        self.selection.clear().await;
        if let Err(error) = self.fetch.refresh().await {
            warn!(%error, "post-bulk refresh failed");
        }
        Ok(outcome)
    }
}
