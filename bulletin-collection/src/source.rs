//! The collection-source abstraction.
//!
//! Coordinators read and write the remote collection exclusively through
//! [`CollectionSource`], which keeps transport concerns out of the
//! orchestration logic. `rest` implements it over HTTP; the `mock` module
//! provides the scripted source the tests drive.

use async_trait::async_trait;

use crate::error::CollectionResult;
use crate::protocol::{BulkDeleteData, ListPage};
use bulletin_types::{Entity, EntityId, QueryParams};

/// Remote read/write operations over one collection.
#[async_trait]
pub trait CollectionSource<E: Entity>: Send + Sync {
    /// Payload for creating an item; the backend returns the canonical
    /// stored form.
    type Draft: Send + Sync;
    /// Partial-update payload.
    type Patch: Send + Sync;

    /// Reads one page of the filtered, sorted collection.
    async fn fetch_page(&self, params: &QueryParams) -> CollectionResult<ListPage<E>>;

    /// Runs a free-text search constrained by the active filters.
    /// Unpaginated by design.
    async fn search(&self, keyword: &str, params: &QueryParams) -> CollectionResult<Vec<E>>;

    /// Creates an item, returning the canonical stored form.
    async fn create(&self, draft: &Self::Draft) -> CollectionResult<E>;

    /// Applies a partial update, returning the canonical updated form.
    async fn update(&self, id: &EntityId, patch: &Self::Patch) -> CollectionResult<E>;

    /// Deletes one item. A reference-constraint refusal surfaces as
    /// [`Conflict`](crate::CollectionError::Conflict).
    async fn delete(&self, id: &EntityId) -> CollectionResult<()>;

    /// Deletes a batch in one request; the response splits outcomes
    /// per id.
    async fn delete_many(&self, ids: &[EntityId]) -> CollectionResult<BulkDeleteData>;
}

/// A scripted collection source for tests.
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::error::CollectionError;

    /// One call served by [`MockSource`], recorded for assertions.
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        FetchPage(QueryParams),
        Search {
            keyword: String,
            params: QueryParams,
        },
        Create,
        Update(EntityId),
        Delete(EntityId),
        DeleteMany(Vec<EntityId>),
    }

    /// Scripted collection source.
    ///
    /// Every operation pops the next queued response for that operation;
    /// an empty queue fails the call. Optional per-call latencies make
    /// response-ordering races reproducible under paused test time.
    pub struct MockSource<E> {
        pages: Mutex<VecDeque<CollectionResult<ListPage<E>>>>,
        page_delays: Mutex<VecDeque<Duration>>,
        searches: Mutex<VecDeque<CollectionResult<Vec<E>>>>,
        search_delays: Mutex<VecDeque<Duration>>,
        creates: Mutex<VecDeque<CollectionResult<E>>>,
        updates: Mutex<VecDeque<CollectionResult<E>>>,
        update_delays: Mutex<VecDeque<Duration>>,
        deletes: Mutex<VecDeque<CollectionResult<()>>>,
        delete_delays: Mutex<VecDeque<Duration>>,
        bulk_deletes: Mutex<VecDeque<CollectionResult<BulkDeleteData>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl<E> Default for MockSource<E> {
        fn default() -> Self {
            Self {
                pages: Mutex::new(VecDeque::new()),
                page_delays: Mutex::new(VecDeque::new()),
                searches: Mutex::new(VecDeque::new()),
                search_delays: Mutex::new(VecDeque::new()),
                creates: Mutex::new(VecDeque::new()),
                updates: Mutex::new(VecDeque::new()),
                update_delays: Mutex::new(VecDeque::new()),
                deletes: Mutex::new(VecDeque::new()),
                delete_delays: Mutex::new(VecDeque::new()),
                bulk_deletes: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl<E> MockSource<E> {
        /// Creates a source with nothing scripted.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        // ── Scripting ───────────────────────────────────────────

        /// Queues a successful page response.
        pub fn queue_page(&self, page: ListPage<E>) {
            self.pages.lock().unwrap().push_back(Ok(page));
        }

        /// Queues a failed page response.
        pub fn queue_page_error(&self, error: CollectionError) {
            self.pages.lock().unwrap().push_back(Err(error));
        }

        /// Delays the next page fetch by `delay` before it resolves.
        pub fn delay_next_page(&self, delay: Duration) {
            self.page_delays.lock().unwrap().push_back(delay);
        }

        /// Queues a successful search response.
        pub fn queue_search(&self, results: Vec<E>) {
            self.searches.lock().unwrap().push_back(Ok(results));
        }

        /// Queues a failed search response.
        pub fn queue_search_error(&self, error: CollectionError) {
            self.searches.lock().unwrap().push_back(Err(error));
        }

        /// Delays the next search by `delay` before it resolves.
        pub fn delay_next_search(&self, delay: Duration) {
            self.search_delays.lock().unwrap().push_back(delay);
        }

        /// Queues the canonical entity a create returns.
        pub fn queue_create(&self, entity: E) {
            self.creates.lock().unwrap().push_back(Ok(entity));
        }

        /// Queues a failed create.
        pub fn queue_create_error(&self, error: CollectionError) {
            self.creates.lock().unwrap().push_back(Err(error));
        }

        /// Queues the canonical entity an update returns.
        pub fn queue_update(&self, entity: E) {
            self.updates.lock().unwrap().push_back(Ok(entity));
        }

        /// Queues a failed update.
        pub fn queue_update_error(&self, error: CollectionError) {
            self.updates.lock().unwrap().push_back(Err(error));
        }

        /// Delays the next update by `delay` before it resolves.
        pub fn delay_next_update(&self, delay: Duration) {
            self.update_delays.lock().unwrap().push_back(delay);
        }

        /// Queues a successful delete.
        pub fn queue_delete_ok(&self) {
            self.deletes.lock().unwrap().push_back(Ok(()));
        }

        /// Queues a failed delete.
        pub fn queue_delete_error(&self, error: CollectionError) {
            self.deletes.lock().unwrap().push_back(Err(error));
        }

        /// Delays the next delete by `delay` before it resolves.
        pub fn delay_next_delete(&self, delay: Duration) {
            self.delete_delays.lock().unwrap().push_back(delay);
        }

        /// Queues a bulk-delete outcome split.
        pub fn queue_bulk(&self, data: BulkDeleteData) {
            self.bulk_deletes.lock().unwrap().push_back(Ok(data));
        }

        /// Queues a whole-batch bulk failure.
        pub fn queue_bulk_error(&self, error: CollectionError) {
            self.bulk_deletes.lock().unwrap().push_back(Err(error));
        }

        // ── Recorded traffic ────────────────────────────────────

        /// Everything the source has served, in call order.
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Params of every page fetch served so far.
        pub fn fetched_params(&self) -> Vec<QueryParams> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    RecordedCall::FetchPage(params) => Some(params),
                    _ => None,
                })
                .collect()
        }

        /// Keywords of every search served so far.
        pub fn searched_keywords(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    RecordedCall::Search { keyword, .. } => Some(keyword),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: RecordedCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn missing(op: &str) -> CollectionError {
            CollectionError::Transport(format!("mock: no scripted response for {op}"))
        }
    }

    // Responses and delays are popped at call time, in issue order, so
    // concurrent calls with different latencies keep their own scripted
    // response.
    fn take<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        queue.lock().unwrap().pop_front()
    }

    #[async_trait]
    impl<E: Entity> CollectionSource<E> for MockSource<E> {
        type Draft = E;
        type Patch = serde_json::Value;

        async fn fetch_page(&self, params: &QueryParams) -> CollectionResult<ListPage<E>> {
            self.record(RecordedCall::FetchPage(params.clone()));
            let result =
                take(&self.pages).unwrap_or_else(|| Err(Self::missing("fetch_page")));
            if let Some(delay) = take(&self.page_delays) {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn search(&self, keyword: &str, params: &QueryParams) -> CollectionResult<Vec<E>> {
            self.record(RecordedCall::Search {
                keyword: keyword.to_string(),
                params: params.clone(),
            });
            let result = take(&self.searches).unwrap_or_else(|| Err(Self::missing("search")));
            if let Some(delay) = take(&self.search_delays) {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn create(&self, _draft: &E) -> CollectionResult<E> {
            self.record(RecordedCall::Create);
            take(&self.creates).unwrap_or_else(|| Err(Self::missing("create")))
        }

        async fn update(&self, id: &EntityId, _patch: &serde_json::Value) -> CollectionResult<E> {
            self.record(RecordedCall::Update(id.clone()));
            let result = take(&self.updates).unwrap_or_else(|| Err(Self::missing("update")));
            if let Some(delay) = take(&self.update_delays) {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn delete(&self, id: &EntityId) -> CollectionResult<()> {
            self.record(RecordedCall::Delete(id.clone()));
            let result = take(&self.deletes).unwrap_or_else(|| Err(Self::missing("delete")));
            if let Some(delay) = take(&self.delete_delays) {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn delete_many(&self, ids: &[EntityId]) -> CollectionResult<BulkDeleteData> {
            self.record(RecordedCall::DeleteMany(ids.to_vec()));
            take(&self.bulk_deletes).unwrap_or_else(|| Err(Self::missing("delete_many")))
        }
    }
}
