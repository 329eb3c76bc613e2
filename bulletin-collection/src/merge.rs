//! The single decision point for what the user sees.
//!
//! Rendering layers display exactly what `merged_view` returns and add no
//! logic of their own; every "which items, which count, which controls"
//! question is answered here, once.

use crate::protocol::PageInfo;
use crate::state::{ListState, SearchState};

/// Which state slice a view was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOrigin {
    /// The paginated, filtered list.
    List,
    /// Unpaginated free-text search results.
    Search,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct CollectionView<E> {
    pub origin: ViewOrigin,
    pub items: Vec<E>,
    /// Displayed item count: the page's items for the list, the whole
    /// result set for a search.
    pub total: usize,
    /// Page controls; `None` while the search view is active, since
    /// search results are unpaginated.
    pub page_info: Option<PageInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Chooses between the searched and the paginated view.
///
/// Pure: the output depends only on the two states passed in. A non-empty
/// keyword selects the search results; otherwise the paginated list is
/// shown. Both states keep existing independently either way, which is
/// what makes clearing a keyword instant.
#[must_use]
pub fn merged_view<E: Clone>(list: &ListState<E>, search: &SearchState<E>) -> CollectionView<E> {
    if search.is_active() {
        CollectionView {
            origin: ViewOrigin::Search,
            items: search.results.clone(),
            total: search.results.len(),
            page_info: None,
            loading: search.loading,
            error: search.error.clone(),
        }
    } else {
        CollectionView {
            origin: ViewOrigin::List,
            items: list.items.clone(),
            total: list.items.len(),
            page_info: list.page_info,
            loading: list.loading,
            error: list.error.clone(),
        }
    }
}
