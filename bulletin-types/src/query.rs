//! View-request parameters for paginated, filterable, sortable listings.
//!
//! `QueryParams` is an immutable value object: every change produces a new
//! value, either through `apply` or the `with_*` builders. The field set is
//! closed on purpose, so invalid filter combinations are unrepresentable
//! rather than policed at runtime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire value for query strings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Publication-status filter. `All` disables status filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Published,
    Archived,
}

impl StatusFilter {
    /// Wire value for query strings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Whether the filter actually restricts anything.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Immutable description of the current list view request.
///
/// A value of this type is always well-formed: `page` and `limit` are
/// floored at 1 by every constructor and by `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub page: u32,
    pub limit: u32,
    pub status: StatusFilter,
    pub category_id: Option<EntityId>,
    pub author_id: Option<EntityId>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub featured: Option<bool>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: StatusFilter::All,
            category_id: None,
            author_id: None,
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::Desc,
            date_from: None,
            date_to: None,
            featured: None,
        }
    }
}

impl QueryParams {
    /// Creates params for a given page and limit, everything else
    /// defaulted.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
        .normalized()
    }

    /// Floors `page` and `limit` at 1.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.max(1);
        self
    }

    /// Produces a new value with `patch` merged in; fields the patch does
    /// not mention are preserved unchanged.
    #[must_use]
    pub fn apply(&self, patch: &QueryPatch) -> Self {
        let mut next = self.clone();
        if let Some(page) = patch.page {
            next.page = page;
        }
        if let Some(limit) = patch.limit {
            next.limit = limit;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(category_id) = &patch.category_id {
            next.category_id = category_id.clone();
        }
        if let Some(author_id) = &patch.author_id {
            next.author_id = author_id.clone();
        }
        if let Some(sort_by) = &patch.sort_by {
            next.sort_by = sort_by.clone();
        }
        if let Some(sort_order) = patch.sort_order {
            next.sort_order = sort_order;
        }
        if let Some(date_from) = patch.date_from {
            next.date_from = date_from;
        }
        if let Some(date_to) = patch.date_to {
            next.date_to = date_to;
        }
        if let Some(featured) = patch.featured {
            next.featured = featured;
        }
        next.normalized()
    }

    /// Returns a copy on the given page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns a copy with the given page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Returns a copy filtered to the given status.
    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Returns a copy filtered to the given category, or unfiltered for
    /// `None`.
    #[must_use]
    pub fn with_category(mut self, category_id: Option<EntityId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Returns a copy filtered to the given author, or unfiltered for
    /// `None`.
    #[must_use]
    pub fn with_author(mut self, author_id: Option<EntityId>) -> Self {
        self.author_id = author_id;
        self
    }

    /// Returns a copy sorted by the given field and direction.
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = sort_order;
        self
    }

    /// Returns a copy constrained to the given creation-date window.
    #[must_use]
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Returns a copy filtered on the featured flag, or unfiltered for
    /// `None`.
    #[must_use]
    pub fn with_featured(mut self, featured: Option<bool>) -> Self {
        self.featured = featured;
        self
    }
}

/// Partial override for [`QueryParams`]; `None` means "leave unchanged".
///
/// Nullable params carry a second `Option` layer: `Some(None)` clears the
/// field, outer `None` preserves whatever is there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<StatusFilter>,
    pub category_id: Option<Option<EntityId>>,
    pub author_id: Option<Option<EntityId>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub date_from: Option<Option<NaiveDate>>,
    pub date_to: Option<Option<NaiveDate>>,
    pub featured: Option<Option<bool>>,
}

impl QueryPatch {
    /// Patch that only changes the page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// Patch that only changes the page size.
    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Patch that only changes the status filter.
    #[must_use]
    pub fn status(status: StatusFilter) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch that sets or clears the category filter.
    #[must_use]
    pub fn category(category_id: Option<EntityId>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Default::default()
        }
    }

    /// Patch that sets or clears the author filter.
    #[must_use]
    pub fn author(author_id: Option<EntityId>) -> Self {
        Self {
            author_id: Some(author_id),
            ..Default::default()
        }
    }

    /// Patch that only changes the sort field and direction.
    #[must_use]
    pub fn sort(sort_by: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by.into()),
            sort_order: Some(sort_order),
            ..Default::default()
        }
    }

    /// Patch that sets or clears the creation-date window.
    #[must_use]
    pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        }
    }

    /// Patch that sets or clears the featured filter.
    #[must_use]
    pub fn featured(featured: Option<bool>) -> Self {
        Self {
            featured: Some(featured),
            ..Default::default()
        }
    }
}
