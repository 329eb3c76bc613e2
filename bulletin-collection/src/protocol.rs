//! Wire-level shapes shared by every collection endpoint.
//!
//! The backend wraps every payload in a `{ status, data, message }`
//! envelope. List reads return items plus a pagination block, search reads
//! return an unpaginated item set, and bulk deletes return a per-id
//! outcome split.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bulletin_types::EntityId;

/// Envelope status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The `{ status, data, message }` envelope every endpoint uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One page of a collection listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<E> {
    pub items: Vec<E>,
    pub pagination: PageInfo,
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub limit: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Builds the block the way the backend computes it.
    #[must_use]
    pub fn new(current_page: u32, total_items: u64, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total_items.div_ceil(u64::from(limit)) as u32;
        Self {
            current_page,
            total_pages,
            total_items,
            limit,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

/// Search responses arrive either wrapped in an object or as a bare
/// array, depending on the endpoint's vintage.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchData<E> {
    Wrapped { items: Vec<E> },
    Bare(Vec<E>),
}

impl<E> SearchData<E> {
    /// Unwraps to the item list either way.
    #[must_use]
    pub fn into_items(self) -> Vec<E> {
        match self {
            Self::Wrapped { items } => items,
            Self::Bare(items) => items,
        }
    }
}

/// Per-id outcome split returned by the bulk-delete endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteData {
    #[serde(default)]
    pub deleted: Vec<EntityId>,
    #[serde(default)]
    pub failed: BTreeMap<EntityId, String>,
}

/// Detail payload of a 409 conflict response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictData {
    #[serde(default)]
    pub references: Vec<EntityRef>,
}

/// A referencing entity, presentable as an actionable link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_info_computes_boundaries() {
        let info = PageInfo::new(1, 47, 10);
        assert_eq!(info.total_pages, 5);
        assert!(info.has_next_page);
        assert!(!info.has_prev_page);

        let last = PageInfo::new(5, 47, 10);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn page_info_with_no_items_has_zero_pages() {
        let info = PageInfo::new(1, 0, 10);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
    }

    #[test]
    fn search_data_accepts_both_shapes() {
        let wrapped: SearchData<String> =
            serde_json::from_str(r#"{"items": ["a", "b"]}"#).unwrap();
        assert_eq!(wrapped.into_items(), vec!["a", "b"]);

        let bare: SearchData<String> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(bare.into_items(), vec!["a", "b"]);
    }

    #[test]
    fn envelope_tolerates_missing_data_and_message() {
        let envelope: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(envelope.status, ResponseStatus::Error);
        assert!(envelope.data.is_none());
        assert!(envelope.message.is_none());
    }
}
