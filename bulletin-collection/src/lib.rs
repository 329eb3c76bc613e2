//! Collection synchronization core for the Bulletin admin surfaces.
//!
//! Every admin listing screen — articles, categories, media — shares one
//! orchestration problem: reconcile a remote paginated, filterable,
//! sortable collection with local view state, blend free-text search with
//! structured filters, apply confirmed mutations, and report batch results
//! that can partially fail. This crate solves it once, generically, so a
//! rendering layer only displays snapshots and forwards intents.
//!
//! # Components
//!
//! - [`CollectionSource`]: the read/write seam to the backend, with a
//!   REST implementation ([`RestCollectionSource`]) and a scripted mock
//!   ([`source::mock::MockSource`])
//! - [`FetchCoordinator`] / [`ListStore`]: sequence-guarded list requests
//!   where the last request issued wins
//! - [`SearchCoordinator`] / [`SearchStore`]: the debounced keyword path
//!   with its own lifecycle
//! - [`merged_view`]: the one pure decision between the two views
//! - [`MutationCoordinator`]: create, update, delete with confirmed-write
//!   reconciliation
//! - [`BulkExecutor`] / [`BulkOutcome`]: batch deletes that never turn
//!   partial failure into an error
//! - [`CollectionManager`]: the generic facade wiring all of the above
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bulletin_collection::CollectionManager;
//! use bulletin_collection::source::mock::MockSource;
//! use bulletin_model::Article;
//!
//! let source: Arc<MockSource<Article>> = Arc::new(MockSource::new());
//! let manager = CollectionManager::new(source);
//! assert!(!manager.is_closed());
//! ```

pub mod bulk;
pub mod debounce;
mod error;
pub mod fetch;
mod manager;
pub mod merge;
pub mod mutation;
pub mod notify;
pub mod protocol;
pub mod rest;
pub mod search;
pub mod selection;
pub mod source;
pub mod state;

pub use bulk::{BulkExecutor, BulkOutcome};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use error::{CollectionError, CollectionResult};
pub use fetch::{FetchCoordinator, ListStore};
pub use manager::{CollectionManager, ManagerConfig};
pub use merge::{CollectionView, ViewOrigin, merged_view};
pub use mutation::MutationCoordinator;
pub use notify::{Notification, Notifier, NullNotifier, Severity};
pub use protocol::{
    ApiResponse, BulkDeleteData, ConflictData, EntityRef, ListPage, PageInfo, ResponseStatus,
    SearchData,
};
pub use rest::{RestCollectionSource, RestSourceConfig};
pub use search::{SearchCoordinator, SearchStore};
pub use selection::SelectionStore;
pub use source::CollectionSource;
pub use state::{ListPhase, ListState, SearchPhase, SearchState};
