//! Wire-shape tests for the domain records.

use bulletin_model::{Article, ArticleDraft, ArticlePatch, ArticleStatus, Category, MediaFile};
use bulletin_types::{Entity, EntityId};
use pretty_assertions::assert_eq;

// ── Deserialization from backend JSON ───────────────────────────────────

#[test]
fn article_deserializes_from_backend_json() {
    let json = r#"{
        "id": "64f1a2b3",
        "title": "Sports Day Postponed",
        "slug": "sports-day-postponed",
        "summary": "Heavy rain expected Friday.",
        "status": "published",
        "categoryId": "cat-events",
        "authorId": "au-7",
        "featured": true,
        "coverImage": "sports-day.jpg",
        "publishedAt": "2025-09-10T08:30:00Z",
        "createdAt": "2025-09-09T14:00:00Z",
        "updatedAt": "2025-09-10T08:30:00Z"
    }"#;

    let article: Article = serde_json::from_str(json).unwrap();
    assert_eq!(article.id, EntityId::new("64f1a2b3"));
    assert_eq!(article.status, ArticleStatus::Published);
    assert_eq!(article.category_id, Some(EntityId::new("cat-events")));
    assert!(article.featured);
    // `content` is omitted by list endpoints.
    assert_eq!(article.content, "");
}

#[test]
fn category_tolerates_missing_optional_fields() {
    let json = r#"{
        "id": "cat-news",
        "name": "News",
        "slug": "news",
        "createdAt": "2025-01-01T00:00:00Z"
    }"#;

    let category: Category = serde_json::from_str(json).unwrap();
    assert_eq!(category.article_count, 0);
    assert_eq!(category.description, None);
}

#[test]
fn media_file_id_is_its_filename() {
    let json = r#"{
        "id": "hero-2025.png",
        "url": "https://cdn.example.edu/uploads/hero-2025.png",
        "mimeType": "image/png",
        "sizeBytes": 482133,
        "uploadedAt": "2025-08-20T10:15:00Z"
    }"#;

    let file: MediaFile = serde_json::from_str(json).unwrap();
    assert_eq!(file.id().as_str(), "hero-2025.png");
    assert_eq!(file.mime_type, "image/png");
}

// ── Write payload shapes ────────────────────────────────────────────────

#[test]
fn draft_serializes_without_absent_optionals() {
    let draft = ArticleDraft::new("Welcome Back", "Term starts Monday.");
    let json = serde_json::to_value(&draft).unwrap();

    assert_eq!(json["title"], "Welcome Back");
    assert_eq!(json["status"], "draft");
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("summary"));
    assert!(!object.contains_key("categoryId"));
}

#[test]
fn patch_only_carries_present_fields() {
    let patch = ArticlePatch {
        status: Some(ArticleStatus::Archived),
        ..Default::default()
    };
    let json = serde_json::to_value(&patch).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 1);
    assert_eq!(json["status"], "archived");
}

// ── Entity impls ────────────────────────────────────────────────────────

#[test]
fn kinds_feed_user_facing_messages() {
    assert_eq!(Article::kind(), "article");
    assert_eq!(Article::kind_plural(), "articles");
    assert_eq!(Category::kind_plural(), "categories");
    assert_eq!(MediaFile::kind_plural(), "media files");
}
