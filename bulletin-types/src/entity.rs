//! The entity abstraction managed collections are generic over.

use crate::EntityId;

/// A collection item with a stable identity.
///
/// Reconciliation is purely id-based; every other field is treated as
/// mutable payload. `kind` and `kind_plural` feed user-facing messages
/// ("article created", "3 media files deleted").
pub trait Entity: Clone + Send + Sync + 'static {
    /// The item's backend-assigned identifier.
    fn id(&self) -> &EntityId;

    /// Lowercase singular noun for this collection's items.
    fn kind() -> &'static str {
        "item"
    }

    /// Plural form used in batch messages.
    fn kind_plural() -> String {
        format!("{}s", Self::kind())
    }
}
