//! Single-item mutations with confirmed-write reconciliation.
//!
//! Writes go to the backend first; the local list changes only on the
//! canonical response, because the backend owns id, slug, and timestamp
//! assignment. A per-id guard rejects overlapping mutations on one id
//! instead of letting the second writer win silently.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{CollectionError, CollectionResult};
use crate::fetch::ListStore;
use crate::selection::SelectionStore;
use crate::source::CollectionSource;
use bulletin_types::{Entity, EntityId};

/// Ids with a mutation currently in flight.
#[derive(Clone, Default)]
struct InFlightIds {
    ids: Arc<Mutex<HashSet<EntityId>>>,
}

impl InFlightIds {
    /// Claims an id, failing if a mutation on it is already running.
    fn claim(&self, id: &EntityId) -> CollectionResult<ClaimedId> {
        let mut ids = self.ids.lock().unwrap();
        if !ids.insert(id.clone()) {
            return Err(CollectionError::MutationInFlight(id.clone()));
        }
        Ok(ClaimedId {
            ids: self.clone(),
            id: id.clone(),
        })
    }
}

/// Releases the claimed id on drop, whatever the exit path.
struct ClaimedId {
    ids: InFlightIds,
    id: EntityId,
}

impl Drop for ClaimedId {
    fn drop(&mut self) {
        let mut ids = match self.ids.ids.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        ids.remove(&self.id);
    }
}

/// Performs create, update, and delete, reconciling the local list from
/// each confirmed response.
pub struct MutationCoordinator<E, S> {
    source: Arc<S>,
    list: ListStore<E>,
    selection: SelectionStore,
    in_flight: InFlightIds,
    closed: Arc<AtomicBool>,
}

impl<E: Entity, S: CollectionSource<E>> MutationCoordinator<E, S> {
    pub(crate) fn new(
        source: Arc<S>,
        list: ListStore<E>,
        selection: SelectionStore,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            list,
            selection,
            in_flight: InFlightIds::default(),
            closed,
        }
    }

    /// Creates an item; on confirmation the canonical entity is prepended
    /// to the current page. Pagination counts catch up on the next fetch.
    pub async fn create(&self, draft: &S::Draft) -> CollectionResult<E> {
        self.ensure_open()?;
        let created = self.source.create(draft).await?;
        debug!(id = %created.id(), kind = E::kind(), "create confirmed");
        self.list.insert_front(created.clone()).await;
        Ok(created)
    }

    /// Applies a partial update; the canonical response replaces the local
    /// copy in place. An id not on the current page is a no-op locally,
    /// not an error.
    pub async fn update(&self, id: &EntityId, patch: &S::Patch) -> CollectionResult<E> {
        self.ensure_open()?;
        let _claim = self.in_flight.claim(id)?;
        let updated = self.source.update(id, patch).await?;
        if self.list.replace(updated.clone()).await {
            debug!(id = %id, kind = E::kind(), "update applied in place");
        } else {
            debug!(id = %id, kind = E::kind(), "updated item not on current page");
        }
        Ok(updated)
    }

    /// Deletes one item; on confirmation it leaves the list and the
    /// selection. No automatic refresh here — callers decide when stale
    /// pagination counts are worth a round trip.
    pub async fn delete(&self, id: &EntityId) -> CollectionResult<()> {
        self.ensure_open()?;
        let _claim = self.in_flight.claim(id)?;
        self.source.delete(id).await?;
        debug!(id = %id, kind = E::kind(), "delete confirmed");
        self.list.remove(id).await;
        self.selection.deselect(id).await;
        Ok(())
    }

    fn ensure_open(&self) -> CollectionResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CollectionError::Closed);
        }
        Ok(())
    }
}
