//! The free-text search path: debounced keyword input over the active
//! filters, with its own stale-response guard and lifecycle.
//!
//! Search state lives beside the list state, never on top of it. Clearing
//! the keyword costs nothing: the list page is still there, untouched, and
//! is redisplayed without a network round trip.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::error::{CollectionError, CollectionResult};
use crate::fetch::ListStore;
use crate::selection::SelectionStore;
use crate::source::CollectionSource;
use crate::state::{SearchPhase, SearchState};
use bulletin_types::{Entity, EntityId, QueryParams};

/// Owner of [`SearchState`], with the same sequence guard as the list
/// store: only the most recently issued search may apply its results.
pub struct SearchStore<E> {
    inner: Arc<RwLock<SearchState<E>>>,
    seq: Arc<AtomicU64>,
    selection: SelectionStore,
}

impl<E> Clone for SearchStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            seq: Arc::clone(&self.seq),
            selection: self.selection.clone(),
        }
    }
}

impl<E: Entity> SearchStore<E> {
    pub(crate) fn new(selection: SelectionStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SearchState::default())),
            seq: Arc::new(AtomicU64::new(0)),
            selection,
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SearchState<E> {
        self.inner.read().await.clone()
    }

    /// Takes the next request sequence number.
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidates every in-flight search without issuing a new one.
    pub fn invalidate(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }

    /// Records the keyword as typed, before any request fires. Existing
    /// results stay on screen while the debounce window runs.
    pub async fn set_keyword(&self, keyword: &str) {
        self.inner.write().await.keyword = keyword.to_string();
    }

    /// Clears the search wholesale and invalidates in-flight requests, so
    /// a late result cannot resurrect a dismissed search.
    pub async fn clear(&self) {
        self.invalidate();
        let mut state = self.inner.write().await;
        state.results.clear();
        state.keyword.clear();
        state.loading = false;
        state.error = None;
    }

    /// Marks request `seq` started. No-op if already superseded.
    pub async fn begin(&self, seq: u64) {
        let mut state = self.inner.write().await;
        if !self.is_current(seq) {
            return;
        }
        state.loading = true;
        state.error = None;
    }

    /// Applies results unless the request was superseded, pruning the
    /// selection to the new displayed set. Returns whether they were
    /// applied.
    pub async fn complete(&self, seq: u64, results: Vec<E>) -> bool {
        let displayed = {
            let mut state = self.inner.write().await;
            if !self.is_current(seq) {
                debug!(seq, "discarding stale search response");
                return false;
            }
            state.results = results;
            state.loading = false;
            state.error = None;
            state
                .results
                .iter()
                .map(|item| item.id().clone())
                .collect::<BTreeSet<EntityId>>()
        };
        self.selection.retain_displayed(&displayed).await;
        true
    }

    /// Records a failed search; previous results are retained. Returns
    /// whether the failure was applied.
    pub async fn fail(&self, seq: u64, error: &CollectionError) -> bool {
        let mut state = self.inner.write().await;
        if !self.is_current(seq) {
            debug!(seq, "discarding stale search failure");
            return false;
        }
        state.loading = false;
        state.error = Some(error.to_string());
        true
    }
}

/// Drives keyword input through the debouncer and issues search requests.
pub struct SearchCoordinator<E, S> {
    source: Arc<S>,
    store: SearchStore<E>,
    list: ListStore<E>,
    params: Arc<RwLock<QueryParams>>,
    debouncer: Arc<Debouncer>,
    selection: SelectionStore,
    closed: Arc<AtomicBool>,
}

impl<E, S> Clone for SearchCoordinator<E, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: self.store.clone(),
            list: self.list.clone(),
            params: Arc::clone(&self.params),
            debouncer: Arc::clone(&self.debouncer),
            selection: self.selection.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<E, S> SearchCoordinator<E, S>
where
    E: Entity,
    S: CollectionSource<E> + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        source: Arc<S>,
        store: SearchStore<E>,
        list: ListStore<E>,
        params: Arc<RwLock<QueryParams>>,
        debouncer: Arc<Debouncer>,
        selection: SelectionStore,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            store,
            list,
            params,
            debouncer,
            selection,
            closed,
        }
    }

    /// The store this coordinator drives.
    pub fn store(&self) -> &SearchStore<E> {
        &self.store
    }

    /// Handles keyword input.
    ///
    /// Empty or whitespace-only input deactivates the search synchronously
    /// — pending debounce cancelled, state cleared, list redisplayed, no
    /// network. Anything else records the keyword and (re)arms the
    /// debounce; the request fires once input settles, with whatever
    /// params are current at fire time.
    pub async fn set_keyword(&self, text: &str) -> CollectionResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CollectionError::Closed);
        }
        let keyword = text.trim().to_string();
        if keyword.is_empty() {
            self.debouncer.cancel();
            self.store.clear().await;
            // Back on the list view: selections not on the page go.
            let displayed = self.list.displayed_ids().await;
            self.selection.retain_displayed(&displayed).await;
            return Ok(());
        }
        let was_active = self.store.state().await.is_active();
        self.store.set_keyword(&keyword).await;
        if !was_active {
            // The view switches to the (still empty) result set at the
            // first keystroke, taking any list selection with it.
            self.selection.clear().await;
        }
        let runner = self.clone();
        self.debouncer.call(async move {
            runner.run(keyword).await;
        });
        Ok(())
    }

    /// Re-issues the search immediately with the current keyword. Used
    /// when a structured filter changes while a keyword is active, so
    /// filters and keyword stay composed; a pending debounce is folded
    /// into this request.
    pub async fn reissue(&self) {
        let keyword = self.store.state().await.keyword;
        if keyword.is_empty() {
            return;
        }
        self.debouncer.cancel();
        self.run(keyword).await;
    }

    /// Whether a keyword is currently active.
    pub async fn is_active(&self) -> bool {
        self.store.state().await.is_active()
    }

    /// Search lifecycle, including the debounce window.
    pub async fn phase(&self) -> SearchPhase {
        let state = self.store.state().await;
        if state.is_active() && self.debouncer.is_pending() {
            return SearchPhase::Debouncing;
        }
        state.phase()
    }

    /// Cancels a pending debounce without touching state.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }

    async fn run(&self, keyword: String) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let seq = self.store.next_seq();
        let params = self.params.read().await.clone();
        debug!(seq, %keyword, "issuing search");
        self.store.begin(seq).await;
        match self.source.search(&keyword, &params).await {
            Ok(results) => {
                self.store.complete(seq, results).await;
            }
            Err(error) => {
                if self.store.fail(seq, &error).await {
                    warn!(seq, %error, "search failed");
                }
            }
        }
    }
}
