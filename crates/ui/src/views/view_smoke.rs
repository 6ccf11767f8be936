use std::sync::Arc;

use storage::repository::{InMemoryRepository, ProgressRepository, StorageError, TopicRepository};
use tracker_core::model::{ProgressEntry, ProgressStatus, Topic, TopicId, User, UserId};
use tracker_core::time::fixed_now;

use super::test_harness::{setup_view_harness, setup_view_harness_with_repos};

fn learner() -> User {
    User::new(
        UserId::random(),
        "ada@example.com",
        Some("Ada Lovelace".into()),
    )
    .unwrap()
}

fn catalog() -> Vec<Topic> {
    vec![
        Topic::new(TopicId::new(1), "Traits", Some("shared behaviour".into()), 3, 1).unwrap(),
        Topic::new(TopicId::new(2), "Ownership", None, 1, 2).unwrap(),
    ]
}

struct PendingTopics;

#[async_trait::async_trait]
impl TopicRepository for PendingTopics {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        std::future::pending().await
    }
}

struct FailingTopics;

#[async_trait::async_trait]
impl TopicRepository for FailingTopics {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_shows_loading_while_catalog_is_outstanding() {
    let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
    let mut harness =
        setup_view_harness_with_repos(Arc::new(PendingTopics), progress, Some(learner()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Loading..."), "missing loading text in {html}");
    assert!(!html.contains("Sign Out"), "header rendered early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_weeks_cards_and_progress() {
    let user = learner();
    let repo = InMemoryRepository::with_topics(catalog());
    repo.upsert_progress(&ProgressEntry::new(
        user.id(),
        TopicId::new(2),
        ProgressStatus::Completed,
        Some("borrowck finally clicked".into()),
        fixed_now(),
    ))
    .await
    .expect("seed progress");

    let mut harness = setup_view_harness(&repo, Some(user));
    harness.settle().await;
    let html = harness.render();

    for expected in [
        "Learning Tracker",
        "Welcome,",
        "Ada Lovelace",
        "Sign Out",
        "All Weeks",
        "Week 1",
        "Week 3",
        "Complete",
        "In Progress",
        "Mark Unread",
        "shared behaviour",
        "borrowck finally clicked",
        "Edit Notes",
        "Add Notes",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains(">completed<"), "missing completed badge in {html}");
    assert!(html.contains(">unread<"), "missing unread badge in {html}");

    let week1 = html.find("Ownership").expect("week 1 card");
    let week3 = html.find("Traits").expect("week 3 card");
    assert!(week1 < week3, "week 1 should render before week 3");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_error_when_catalog_fails() {
    let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
    let mut harness =
        setup_view_harness_with_repos(Arc::new(FailingTopics), progress, Some(learner()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("connection error: offline"), "missing detail in {html}");
    assert!(!html.contains("Loading..."), "still loading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_without_user_renders_signed_out_message() {
    let repo = InMemoryRepository::with_topics(catalog());
    let mut harness = setup_view_harness(&repo, None);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("You are signed out."), "missing message in {html}");
    assert!(!html.contains("Week 1"), "rendered topics without a user in {html}");
}
