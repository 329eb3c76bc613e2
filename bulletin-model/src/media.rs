//! Uploaded media objects.

use bulletin_types::{Entity, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded media object. Its storage filename is its identity, which
/// is why media ids look like `hero-2025.png` rather than database ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    /// Storage filename, unique within the media library.
    pub id: EntityId,
    /// Public URL the file is served from.
    pub url: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl Entity for MediaFile {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn kind() -> &'static str {
        "media file"
    }
}
