//! Selection tracking for bulk actions.
//!
//! The selection is UI-local state and always a subset of the ids on
//! screen: it is pruned against every applied result set and cleared
//! wholesale when the page changes or a bulk operation completes.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use bulletin_types::EntityId;

/// Shared handle to the selected-id set.
#[derive(Clone, Default)]
pub struct SelectionStore {
    inner: Arc<RwLock<BTreeSet<EntityId>>>,
}

impl SelectionStore {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id to the selection.
    pub async fn select(&self, id: EntityId) {
        self.inner.write().await.insert(id);
    }

    /// Removes an id from the selection.
    pub async fn deselect(&self, id: &EntityId) {
        self.inner.write().await.remove(id);
    }

    /// Toggles an id; returns whether it is selected afterwards.
    pub async fn toggle(&self, id: EntityId) -> bool {
        let mut selected = self.inner.write().await;
        if selected.remove(&id) {
            false
        } else {
            selected.insert(id);
            true
        }
    }

    /// Clears the selection wholesale.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Drops every selected id not present in `displayed`.
    pub async fn retain_displayed(&self, displayed: &BTreeSet<EntityId>) {
        self.inner
            .write()
            .await
            .retain(|id| displayed.contains(id));
    }

    /// Whether the id is currently selected.
    pub async fn is_selected(&self, id: &EntityId) -> bool {
        self.inner.read().await.contains(id)
    }

    /// Snapshot of the selected ids, in id order.
    pub async fn selected(&self) -> Vec<EntityId> {
        self.inner.read().await.iter().cloned().collect()
    }

    /// Number of selected ids.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether nothing is selected.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
