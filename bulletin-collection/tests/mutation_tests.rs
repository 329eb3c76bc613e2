//! Create, update, and delete reconciliation against the local list.

use std::sync::Arc;
use std::time::Duration;

use bulletin_collection::source::mock::MockSource;
use bulletin_collection::{CollectionError, CollectionManager, EntityRef, ListPage, PageInfo};
use bulletin_model::{Article, ArticleStatus};
use bulletin_types::EntityId;
use chrono::{TimeZone, Utc};
use serde_json::json;

fn article(id: &str, title: &str) -> Article {
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
    Article {
        id: EntityId::new(id),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        summary: None,
        content: String::new(),
        status: ArticleStatus::Published,
        category_id: None,
        author_id: None,
        featured: false,
        cover_image: None,
        published_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn page(items: Vec<Article>, current: u32, total: u64) -> ListPage<Article> {
    ListPage {
        items,
        pagination: PageInfo::new(current, total, 10),
    }
}

fn make_manager(
    source: &Arc<MockSource<Article>>,
) -> CollectionManager<Article, MockSource<Article>> {
    CollectionManager::new(Arc::clone(source))
}

// ── Create ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_prepends_the_canonical_entity() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Existing")], 1, 1));
    source.queue_create(article("backend-id", "Fresh"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let created = manager.create(&article("ignored", "Fresh")).await.unwrap();
    assert_eq!(created.id, EntityId::new("backend-id"));

    let state = manager.list_state().await;
    assert_eq!(state.items[0].id, EntityId::new("backend-id"));
    assert_eq!(state.items[1].id, EntityId::new("a1"));
    // Pagination counts stay as they were until the next fetch.
    assert_eq!(state.page_info.unwrap().total_items, 1);
}

#[tokio::test]
async fn failed_create_leaves_the_list_untouched() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Existing")], 1, 1));
    source.queue_create_error(CollectionError::Validation("title is required".to_string()));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let error = manager.create(&article("x", "")).await.unwrap_err();
    assert!(matches!(error, CollectionError::Validation(_)));
    assert_eq!(manager.list_state().await.items.len(), 1);
}

// ── Update ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_in_place_preserving_order() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![
            article("a1", "First"),
            article("a2", "Second"),
            article("a3", "Third"),
        ],
        1,
        3,
    ));
    source.queue_update(article("a2", "Renamed"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    manager
        .update(&EntityId::new("a2"), &json!({"title": "Renamed"}))
        .await
        .unwrap();

    let titles: Vec<String> = manager
        .list_state()
        .await
        .items
        .iter()
        .map(|a| a.title.clone())
        .collect();
    assert_eq!(titles, vec!["First", "Renamed", "Third"]);
}

#[tokio::test]
async fn updating_an_item_off_page_is_a_local_no_op() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Here")], 1, 1));
    source.queue_update(article("elsewhere", "Edited On Page 3"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let updated = manager
        .update(&EntityId::new("elsewhere"), &json!({"title": "Edited On Page 3"}))
        .await
        .unwrap();
    assert_eq!(updated.id, EntityId::new("elsewhere"));

    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, EntityId::new("a1"));
}

// ── Delete ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_from_list_and_selection() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![article("a1", "Doomed"), article("a2", "Spared")],
        1,
        2,
    ));
    source.queue_delete_ok();
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();
    assert!(manager.select(&EntityId::new("a1")).await);

    manager.delete(&EntityId::new("a1")).await.unwrap();

    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, EntityId::new("a2"));
    assert!(manager.selected().await.is_empty());
    // Counts reconcile on the next fetch, not now.
    assert_eq!(state.page_info.unwrap().total_items, 2);
}

#[tokio::test]
async fn delete_conflict_keeps_the_item_and_carries_references() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("cat-1", "Events")], 1, 1));
    source.queue_delete_error(CollectionError::Conflict {
        message: "category is referenced by 2 articles".to_string(),
        references: vec![
            EntityRef {
                id: EntityId::new("a7"),
                title: "Open Day".to_string(),
            },
            EntityRef {
                id: EntityId::new("a9"),
                title: "Bake Sale".to_string(),
            },
        ],
    });
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let error = manager.delete(&EntityId::new("cat-1")).await.unwrap_err();
    match &error {
        CollectionError::Conflict {
            message,
            references,
        } => {
            assert!(message.contains("referenced"));
            assert_eq!(references.len(), 2);
            assert_eq!(references[0].title, "Open Day");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(manager.list_state().await.items.len(), 1);
}

// ── Overlap guard ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn overlapping_mutations_on_one_id_are_rejected() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Contested")], 1, 1));
    source.queue_update(article("a1", "First Writer Wins"));
    source.delay_next_update(Duration::from_millis(200));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let id = EntityId::new("a1");
    let first_patch = json!({"title": "First Writer Wins"});
    let second_patch = json!({"title": "Second Writer"});
    let (first, second) = tokio::join!(
        manager.update(&id, &first_patch),
        manager.update(&id, &second_patch),
    );

    first.unwrap();
    let rejected = second.unwrap_err();
    assert!(matches!(rejected, CollectionError::MutationInFlight(_)));
    assert_eq!(
        manager.list_state().await.items[0].title,
        "First Writer Wins"
    );
}

#[tokio::test]
async fn sequential_mutations_on_one_id_are_allowed() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Twice")], 1, 1));
    source.queue_update(article("a1", "Once Edited"));
    source.queue_update(article("a1", "Twice Edited"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let id = EntityId::new("a1");
    manager.update(&id, &json!({"title": "Once Edited"})).await.unwrap();
    manager.update(&id, &json!({"title": "Twice Edited"})).await.unwrap();

    assert_eq!(manager.list_state().await.items[0].title, "Twice Edited");
}

#[tokio::test(start_paused = true)]
async fn distinct_ids_mutate_concurrently() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![article("a1", "Left"), article("a2", "Right")],
        1,
        2,
    ));
    source.queue_update(article("a1", "Left Edited"));
    source.delay_next_update(Duration::from_millis(100));
    source.queue_update(article("a2", "Right Edited"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let left_id = EntityId::new("a1");
    let right_id = EntityId::new("a2");
    let left_patch = json!({"title": "Left Edited"});
    let right_patch = json!({"title": "Right Edited"});
    let (first, second) = tokio::join!(
        manager.update(&left_id, &left_patch),
        manager.update(&right_id, &right_patch),
    );
    first.unwrap();
    second.unwrap();

    let titles: Vec<String> = manager
        .list_state()
        .await
        .items
        .iter()
        .map(|a| a.title.clone())
        .collect();
    assert_eq!(titles, vec!["Left Edited", "Right Edited"]);
}

// ── Guard release ───────────────────────────────────────────────────────

#[tokio::test]
async fn the_guard_releases_after_a_failed_mutation() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Flaky")], 1, 1));
    source.queue_update_error(CollectionError::Transport("dropped".to_string()));
    source.queue_update(article("a1", "Recovered"));
    let manager = make_manager(&source);
    manager.refresh().await.unwrap();

    let id = EntityId::new("a1");
    manager.update(&id, &json!({})).await.unwrap_err();
    // The in-flight claim must not leak from the failed attempt.
    manager.update(&id, &json!({"title": "Recovered"})).await.unwrap();

    assert_eq!(manager.list_state().await.items[0].title, "Recovered");
}
