//! List fetch lifecycle and stale-response handling.

use std::sync::Arc;
use std::time::Duration;

use bulletin_collection::source::mock::MockSource;
use bulletin_collection::{CollectionError, CollectionManager, ListPage, ListPhase, PageInfo};
use bulletin_model::{Article, ArticleStatus};
use bulletin_types::{EntityId, QueryPatch};
use chrono::{TimeZone, Utc};

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

// ── Lifecycle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn initial_fetch_populates_items_and_pagination() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![article("a1", "First"), article("a2", "Second")],
        1,
        2,
    ));
    let manager = make_manager(&source);

    assert_eq!(manager.list_phase().await, ListPhase::Idle);
    manager.refresh().await.unwrap();

    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.page_info.unwrap().total_items, 2);
    assert_eq!(manager.list_phase().await, ListPhase::Ready);
}

#[tokio::test]
async fn failure_retains_previous_items_and_pagination() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "Kept")], 1, 1));
    source.queue_page_error(CollectionError::Transport("connection refused".to_string()));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap();
    let error = manager.refresh().await.unwrap_err();
    assert!(matches!(error, CollectionError::Transport(_)));

    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, EntityId::new("a1"));
    assert!(state.page_info.is_some());
    assert!(state.error.is_some());
    assert_eq!(manager.list_phase().await, ListPhase::Failed);
}

#[tokio::test]
async fn a_later_success_clears_the_error() {
    let source = Arc::new(MockSource::new());
    source.queue_page_error(CollectionError::Transport("flaky".to_string()));
    source.queue_page(page(vec![article("a1", "Back")], 1, 1));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap_err();
    manager.refresh().await.unwrap();

    let state = manager.list_state().await;
    assert!(state.error.is_none());
    assert_eq!(manager.list_phase().await, ListPhase::Ready);
}

#[tokio::test]
async fn identical_params_produce_identical_views() {
    let items = vec![article("a1", "One"), article("a2", "Two")];
    let source = Arc::new(MockSource::new());
    source.queue_page(page(items.clone(), 1, 2));
    source.queue_page(page(items, 1, 2));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap();
    let first: Vec<EntityId> = manager
        .list_state()
        .await
        .items
        .iter()
        .map(|a| a.id.clone())
        .collect();

    manager.refresh().await.unwrap();
    let second: Vec<EntityId> = manager
        .list_state()
        .await
        .items
        .iter()
        .map(|a| a.id.clone())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn out_of_range_page_failure_is_surfaced() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("a1", "One")], 1, 1));
    source.queue_page_error(CollectionError::Validation(
        "page 99 is out of range".to_string(),
    ));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap();
    let error = manager
        .update_params(&QueryPatch::page(99))
        .await
        .unwrap_err();

    assert!(matches!(error, CollectionError::Validation(_)));
    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 1);
    assert!(state.error.as_deref().unwrap().contains("out of range"));
}

// ── Last request issued wins ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn slow_earlier_response_is_discarded() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(vec![article("old", "Old Page")], 1, 20));
    source.delay_next_page(Duration::from_millis(500));
    source.queue_page(page(vec![article("new", "New Page")], 2, 20));
    source.delay_next_page(Duration::from_millis(50));
    let manager = make_manager(&source);

    let page_one = QueryPatch::page(1);
    let page_two = QueryPatch::page(2);
    let (first, second) = tokio::join!(
        manager.update_params(&page_one),
        manager.update_params(&page_two),
    );
    // The superseded request resolves Ok; its response is just dropped.
    first.unwrap();
    second.unwrap();

    let state = manager.list_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, EntityId::new("new"));
    assert_eq!(state.page_info.unwrap().current_page, 2);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn stale_failure_does_not_clobber_the_winning_response() {
    let source = Arc::new(MockSource::new());
    source.queue_page_error(CollectionError::Transport("timed out".to_string()));
    source.delay_next_page(Duration::from_millis(500));
    source.queue_page(page(vec![article("new", "New Page")], 2, 20));
    source.delay_next_page(Duration::from_millis(50));
    let manager = make_manager(&source);

    let page_one = QueryPatch::page(1);
    let page_two = QueryPatch::page(2);
    let (first, second) = tokio::join!(
        manager.update_params(&page_one),
        manager.update_params(&page_two),
    );
    // The stale failure is dropped entirely, so neither call errors.
    first.unwrap();
    second.unwrap();

    let state = manager.list_state().await;
    assert!(state.error.is_none());
    assert_eq!(state.items[0].id, EntityId::new("new"));
    assert_eq!(manager.list_phase().await, ListPhase::Ready);
}

// ── Selection across fetches ────────────────────────────────────────────

#[tokio::test]
async fn page_change_clears_the_selection_wholesale() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![article("a1", "One"), article("a2", "Two")],
        1,
        12,
    ));
    // a2 appears on the next page too; a mere prune would keep it.
    source.queue_page(page(
        vec![article("a2", "Two"), article("b1", "Eleven")],
        2,
        12,
    ));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap();
    assert!(manager.select(&EntityId::new("a1")).await);
    assert!(manager.select(&EntityId::new("a2")).await);

    manager.update_params(&QueryPatch::page(2)).await.unwrap();
    assert!(manager.selected().await.is_empty());
}

#[tokio::test]
async fn refresh_on_the_same_page_prunes_vanished_ids_only() {
    let source = Arc::new(MockSource::new());
    source.queue_page(page(
        vec![article("a1", "One"), article("a2", "Two")],
        1,
        2,
    ));
    // Same page refetched; a1 has disappeared server-side.
    source.queue_page(page(vec![article("a2", "Two")], 1, 1));
    let manager = make_manager(&source);

    manager.refresh().await.unwrap();
    assert!(manager.select(&EntityId::new("a1")).await);
    assert!(manager.select(&EntityId::new("a2")).await);

    manager.refresh().await.unwrap();
    assert_eq!(manager.selected().await, vec![EntityId::new("a2")]);
}
