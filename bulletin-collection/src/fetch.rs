//! List fetching: the single source of truth for the page on screen.
//!
//! Every request takes a number from a monotonically increasing counter,
//! and a response is applied only while its number is still the highest
//! issued. Last request issued wins, whatever order responses arrive in.
//! The guard lives here, in the store, not in any rendering layer.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{CollectionError, CollectionResult};
use crate::protocol::ListPage;
use crate::selection::SelectionStore;
use crate::source::CollectionSource;
use crate::state::{ListPhase, ListState};
use bulletin_types::{Entity, EntityId, QueryParams};

/// Owner of [`ListState`]. Every mutation of the list goes through these
/// operations; the sequence guard makes them safe to call from any number
/// of in-flight requests.
pub struct ListStore<E> {
    inner: Arc<RwLock<ListState<E>>>,
    seq: Arc<AtomicU64>,
    selection: SelectionStore,
}

impl<E> Clone for ListStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            seq: Arc::clone(&self.seq),
            selection: self.selection.clone(),
        }
    }
}

impl<E: Entity> ListStore<E> {
    pub(crate) fn new(selection: SelectionStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ListState::default())),
            seq: Arc::new(AtomicU64::new(0)),
            selection,
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> ListState<E> {
        self.inner.read().await.clone()
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> ListPhase {
        self.inner.read().await.phase()
    }

    /// Ids of the items currently held.
    pub async fn displayed_ids(&self) -> BTreeSet<EntityId> {
        self.inner
            .read()
            .await
            .items
            .iter()
            .map(|item| item.id().clone())
            .collect()
    }

    // ── Request lifecycle ───────────────────────────────────────

    /// Takes the next request sequence number. The previously issued
    /// request is superseded from this moment.
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidates every in-flight request without issuing a new one.
    pub fn invalidate(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }

    /// Marks request `seq` started: loading set, stale error cleared.
    /// No-op if the request was already superseded.
    pub async fn begin(&self, seq: u64) {
        let mut state = self.inner.write().await;
        if !self.is_current(seq) {
            return;
        }
        state.loading = true;
        state.error = None;
    }

    /// Applies a successful page, items and pagination together, unless
    /// the request was superseded. Prunes the selection to the new id set,
    /// or clears it wholesale when the page number changed. Returns
    /// whether the response was applied.
    pub async fn complete(&self, seq: u64, page: ListPage<E>) -> bool {
        let (displayed, page_changed) = {
            let mut state = self.inner.write().await;
            if !self.is_current(seq) {
                debug!(seq, "discarding stale list response");
                return false;
            }
            let new_page = page.pagination.current_page;
            let previous_page = state.page_info.map(|info| info.current_page);
            state.items = page.items;
            state.page_info = Some(page.pagination);
            state.loading = false;
            state.error = None;
            let displayed: BTreeSet<EntityId> =
                state.items.iter().map(|item| item.id().clone()).collect();
            let page_changed = previous_page.is_some_and(|prev| prev != new_page);
            (displayed, page_changed)
        };
        if page_changed {
            self.selection.clear().await;
        } else {
            self.selection.retain_displayed(&displayed).await;
        }
        true
    }

    /// Records a failed request: error message only, previous items and
    /// pagination untouched. Returns whether the failure was applied.
    pub async fn fail(&self, seq: u64, error: &CollectionError) -> bool {
        let mut state = self.inner.write().await;
        if !self.is_current(seq) {
            debug!(seq, "discarding stale list failure");
            return false;
        }
        state.loading = false;
        state.error = Some(error.to_string());
        true
    }

    // ── Local reconciliation (mutation path) ────────────────────
    //
    // Items only. Pagination counts go momentarily out of date and stay
    // that way until the next fetch reconciles them.

    /// Prepends a confirmed entity.
    pub async fn insert_front(&self, entity: E) {
        self.inner.write().await.items.insert(0, entity);
    }

    /// Replaces the item with the same id in place; an absent id is a
    /// no-op. Returns whether a replacement happened.
    pub async fn replace(&self, entity: E) -> bool {
        let mut state = self.inner.write().await;
        match state
            .items
            .iter()
            .position(|item| item.id() == entity.id())
        {
            Some(index) => {
                state.items[index] = entity;
                true
            }
            None => false,
        }
    }

    /// Removes an item by id. Returns whether it was present.
    pub async fn remove(&self, id: &EntityId) -> bool {
        let mut state = self.inner.write().await;
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        state.items.len() != before
    }

    /// Removes every item in `ids`.
    pub async fn remove_many(&self, ids: &BTreeSet<EntityId>) {
        self.inner
            .write()
            .await
            .items
            .retain(|item| !ids.contains(item.id()));
    }
}

/// Issues list requests against the source and drives their lifecycle
/// through the store.
pub struct FetchCoordinator<E, S> {
    source: Arc<S>,
    store: ListStore<E>,
    params: Arc<RwLock<QueryParams>>,
    closed: Arc<AtomicBool>,
}

impl<E, S> Clone for FetchCoordinator<E, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: self.store.clone(),
            params: Arc::clone(&self.params),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<E: Entity, S: CollectionSource<E>> FetchCoordinator<E, S> {
    pub(crate) fn new(
        source: Arc<S>,
        store: ListStore<E>,
        params: Arc<RwLock<QueryParams>>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            store,
            params,
            closed,
        }
    }

    /// The store this coordinator drives.
    pub fn store(&self) -> &ListStore<E> {
        &self.store
    }

    /// Stores `params` as current and fetches that page.
    pub async fn fetch(&self, params: QueryParams) -> CollectionResult<()> {
        *self.params.write().await = params.clone();
        self.run(params).await
    }

    /// Re-fetches with the current params.
    pub async fn refresh(&self) -> CollectionResult<()> {
        let params = self.params.read().await.clone();
        self.run(params).await
    }

    /// One request lifecycle. Returns `Ok(())` when the response was
    /// applied or superseded; `Err` only when this request is still
    /// current and failed.
    async fn run(&self, params: QueryParams) -> CollectionResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CollectionError::Closed);
        }
        let seq = self.store.next_seq();
        debug!(seq, page = params.page, limit = params.limit, "fetching list page");
        self.store.begin(seq).await;
        match self.source.fetch_page(&params).await {
            Ok(page) => {
                self.store.complete(seq, page).await;
                Ok(())
            }
            Err(error) => {
                if self.store.fail(seq, &error).await {
                    warn!(seq, %error, "list fetch failed");
                    Err(error)
                } else {
                    Ok(())
                }
            }
        }
    }
}
