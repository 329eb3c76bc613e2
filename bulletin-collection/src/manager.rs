//! The generic collection manager.
//!
//! One assembly of fetch, search, mutation, bulk, selection, and
//! notification, parameterized over the entity and the source. Each admin
//! surface instantiates this instead of re-growing its own copy of the
//! pattern, so a fix here lands everywhere at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::bulk::{BulkExecutor, BulkOutcome};
use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::error::CollectionResult;
use crate::fetch::{FetchCoordinator, ListStore};
use crate::merge::{CollectionView, merged_view};
use crate::mutation::MutationCoordinator;
use crate::notify::{Notification, Notifier, NullNotifier};
use crate::search::{SearchCoordinator, SearchStore};
use crate::selection::SelectionStore;
use crate::source::CollectionSource;
use crate::state::{ListPhase, ListState, SearchPhase, SearchState};
use bulletin_types::{Entity, EntityId, QueryParams, QueryPatch};

/// Manager tuning knobs.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Trailing delay between the last keystroke and the search request.
    pub debounce: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Orchestrates one remote collection end to end: fetching, searching,
/// mutating, batch deletes, selection, and the merged view.
pub struct CollectionManager<E, S> {
    params: Arc<RwLock<QueryParams>>,
    fetch: FetchCoordinator<E, S>,
    search: SearchCoordinator<E, S>,
    mutations: MutationCoordinator<E, S>,
    bulk: BulkExecutor<E, S>,
    selection: SelectionStore,
    notifier: Arc<dyn Notifier>,
    closed: Arc<AtomicBool>,
}

impl<E, S> CollectionManager<E, S>
where
    E: Entity,
    S: CollectionSource<E> + 'static,
{
    /// Creates a manager over `source` with default params and config.
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, QueryParams::default(), ManagerConfig::default())
    }

    /// Creates a manager with explicit initial params and config.
    #[must_use]
    pub fn with_config(source: Arc<S>, params: QueryParams, config: ManagerConfig) -> Self {
        let params = Arc::new(RwLock::new(params.normalized()));
        let closed = Arc::new(AtomicBool::new(false));
        let selection = SelectionStore::new();
        let list_store = ListStore::new(selection.clone());
        let search_store = SearchStore::new(selection.clone());
        let debouncer = Arc::new(Debouncer::new(config.debounce));

        let fetch = FetchCoordinator::new(
            Arc::clone(&source),
            list_store.clone(),
            Arc::clone(&params),
            Arc::clone(&closed),
        );
        let search = SearchCoordinator::new(
            Arc::clone(&source),
            search_store,
            list_store.clone(),
            Arc::clone(&params),
            debouncer,
            selection.clone(),
            Arc::clone(&closed),
        );
        let mutations = MutationCoordinator::new(
            Arc::clone(&source),
            list_store,
            selection.clone(),
            Arc::clone(&closed),
        );
        let bulk = BulkExecutor::new(
            source,
            fetch.clone(),
            selection.clone(),
            Arc::clone(&closed),
        );

        Self {
            params,
            fetch,
            search,
            mutations,
            bulk,
            selection,
            notifier: Arc::new(NullNotifier),
            closed,
        }
    }

    /// Attaches the presentation layer's notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // ── Query and fetch ─────────────────────────────────────────

    /// Fetches the current page. Also the initial load.
    pub async fn refresh(&self) -> CollectionResult<()> {
        self.fetch.refresh().await
    }

    /// Snapshot of the current params.
    pub async fn params(&self) -> QueryParams {
        self.params.read().await.clone()
    }

    /// Merges `patch` into the params and re-fetches the list. When a
    /// keyword is active the search is re-issued as well, so structured
    /// filters and keyword stay composed.
    pub async fn update_params(&self, patch: &QueryPatch) -> CollectionResult<()> {
        let next = self.params.read().await.apply(patch);
        let fetched = self.fetch.fetch(next).await;
        if self.search.is_active().await {
            self.search.reissue().await;
        }
        fetched
    }

    /// Keyword input; see [`SearchCoordinator::set_keyword`].
    pub async fn set_keyword(&self, text: &str) -> CollectionResult<()> {
        self.search.set_keyword(text).await
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Creates an item and reports the outcome.
    pub async fn create(&self, draft: &S::Draft) -> CollectionResult<E> {
        let result = self.mutations.create(draft).await;
        match &result {
            Ok(_) => self.notify(Notification::success(format!("{} created", E::kind()))),
            Err(error) => self.notify(Notification::error(format!(
                "failed to create {}: {error}",
                E::kind()
            ))),
        }
        result
    }

    /// Updates an item and reports the outcome.
    pub async fn update(&self, id: &EntityId, patch: &S::Patch) -> CollectionResult<E> {
        let result = self.mutations.update(id, patch).await;
        match &result {
            Ok(_) => self.notify(Notification::success(format!("{} updated", E::kind()))),
            Err(error) => self.notify(Notification::error(format!(
                "failed to update {}: {error}",
                E::kind()
            ))),
        }
        result
    }

    /// Deletes an item and reports the outcome. A reference conflict is
    /// presented as guidance — a warning with the referencing entities —
    /// rather than as a failure.
    pub async fn delete(&self, id: &EntityId) -> CollectionResult<()> {
        let result = self.mutations.delete(id).await;
        match &result {
            Ok(()) => self.notify(Notification::success(format!("{} deleted", E::kind()))),
            Err(error) if error.is_conflict() => {
                self.notify(Notification::warning(error.to_string()));
            }
            Err(error) => self.notify(Notification::error(format!(
                "failed to delete {}: {error}",
                E::kind()
            ))),
        }
        result
    }

    // ── Bulk ────────────────────────────────────────────────────

    /// Deletes `ids` as one batch; see [`BulkExecutor::delete_many`].
    /// Complete success gets a toast, partial failure a persistent
    /// report with per-id reasons.
    pub async fn delete_many(&self, ids: &[EntityId]) -> CollectionResult<BulkOutcome> {
        let result = self.bulk.delete_many(ids).await;
        match &result {
            Ok(outcome) if outcome.is_empty() => {}
            Ok(outcome) if outcome.is_complete_success() => {
                self.notify(Notification::success(format!(
                    "{} {} deleted",
                    outcome.succeeded.len(),
                    E::kind_plural()
                )));
            }
            Ok(outcome) => {
                self.notify(Notification::BulkReport {
                    message: format!(
                        "{} of {} {} deleted, {} failed",
                        outcome.succeeded.len(),
                        outcome.len(),
                        E::kind_plural(),
                        outcome.failed.len()
                    ),
                    outcome: outcome.clone(),
                });
            }
            Err(error) => self.notify(Notification::error(format!(
                "bulk delete failed: {error}"
            ))),
        }
        result
    }

    /// Deletes the currently selected ids as one batch.
    pub async fn delete_selected(&self) -> CollectionResult<BulkOutcome> {
        let ids = self.selection.selected().await;
        self.delete_many(&ids).await
    }

    // ── Selection ───────────────────────────────────────────────

    /// Selects an id if it is currently displayed; returns whether it
    /// was.
    pub async fn select(&self, id: &EntityId) -> bool {
        if !self.is_displayed(id).await {
            return false;
        }
        self.selection.select(id.clone()).await;
        true
    }

    /// Deselects an id.
    pub async fn deselect(&self, id: &EntityId) {
        self.selection.deselect(id).await;
    }

    /// Toggles a displayed id; returns whether it is selected afterwards.
    pub async fn toggle(&self, id: &EntityId) -> bool {
        if !self.is_displayed(id).await {
            return false;
        }
        self.selection.toggle(id.clone()).await
    }

    /// Clears the selection.
    pub async fn clear_selection(&self) {
        self.selection.clear().await;
    }

    /// Selected ids, in id order.
    pub async fn selected(&self) -> Vec<EntityId> {
        self.selection.selected().await
    }

    /// Whether an id is selected.
    pub async fn is_selected(&self, id: &EntityId) -> bool {
        self.selection.is_selected(id).await
    }

    async fn is_displayed(&self, id: &EntityId) -> bool {
        self.view().await.items.iter().any(|item| item.id() == id)
    }

    // ── Views and phases ────────────────────────────────────────

    /// The merged view: search results while a keyword is active,
    /// otherwise the paginated list.
    pub async fn view(&self) -> CollectionView<E> {
        let list = self.fetch.store().state().await;
        let search = self.search.store().state().await;
        merged_view(&list, &search)
    }

    /// List lifecycle phase.
    pub async fn list_phase(&self) -> ListPhase {
        self.fetch.store().phase().await
    }

    /// Search lifecycle phase, including the debounce window.
    pub async fn search_phase(&self) -> SearchPhase {
        self.search.phase().await
    }

    /// Raw list state snapshot.
    pub async fn list_state(&self) -> ListState<E> {
        self.fetch.store().state().await
    }

    /// Raw search state snapshot.
    pub async fn search_state(&self) -> SearchState<E> {
        self.search.store().state().await
    }

    // ── Teardown ────────────────────────────────────────────────

    /// Stops accepting operations. Pending debounces are cancelled and
    /// responses still in flight are dropped when they land.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.search.cancel_pending();
        self.fetch.store().invalidate();
        self.search.store().invalidate();
        info!(kind = E::kind(), "collection manager closed");
    }

    /// Whether `close` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}
