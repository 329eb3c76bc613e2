//! List and search view state.
//!
//! Plain data. The stores in `fetch` and `search` own the locking and the
//! request lifecycle; these structs are what snapshots hand to the merger
//! and the presentation layer.

use crate::protocol::PageInfo;

/// One page of the filtered, sorted collection, plus request lifecycle.
#[derive(Debug, Clone)]
pub struct ListState<E> {
    /// Items currently held for the page.
    pub items: Vec<E>,
    /// Pagination from the last successful fetch; `None` before the
    /// first one completes.
    pub page_info: Option<PageInfo>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Error from the last completed fetch, if it failed.
    pub error: Option<String>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_info: None,
            loading: false,
            error: None,
        }
    }
}

impl<E> ListState<E> {
    /// Current phase of the list request lifecycle.
    #[must_use]
    pub fn phase(&self) -> ListPhase {
        if self.loading {
            ListPhase::Loading
        } else if self.error.is_some() {
            ListPhase::Failed
        } else if self.page_info.is_some() {
            ListPhase::Ready
        } else {
            ListPhase::Idle
        }
    }
}

/// Free-text search results and lifecycle, independent of the list state.
#[derive(Debug, Clone)]
pub struct SearchState<E> {
    /// Complete, unpaginated result set for the active keyword.
    pub results: Vec<E>,
    /// Whether a search request is in flight.
    pub loading: bool,
    /// The keyword as typed. Empty means the search view is inactive.
    pub keyword: String,
    /// Error from the last completed search, if it failed.
    pub error: Option<String>,
}

impl<E> Default for SearchState<E> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            loading: false,
            keyword: String::new(),
            error: None,
        }
    }
}

impl<E> SearchState<E> {
    /// Whether a keyword is active, i.e. the search view is displayed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.keyword.is_empty()
    }

    /// Lifecycle phase ignoring the debounce window; the coordinator
    /// layers that in, since the timer lives there.
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        if self.keyword.is_empty() {
            SearchPhase::Idle
        } else if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Failed
        } else {
            SearchPhase::Ready
        }
    }
}

/// List request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch completed and its page is displayed.
    Ready,
    /// The last fetch failed; previous items are retained.
    Failed,
}

/// Search lifecycle, nested under a ready list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No keyword active.
    Idle,
    /// A keyword was typed but the debounce window has not elapsed.
    Debouncing,
    /// A search request is in flight.
    Loading,
    /// Results for the active keyword are displayed.
    Ready,
    /// The last search failed.
    Failed,
}
