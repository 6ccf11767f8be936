use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dioxus::prelude::*;
use services::{Clock, ProgressService};
use storage::repository::{InMemoryRepository, ProgressRepository, StorageError};
use tracker_core::model::{ProgressEntry, ProgressStatus, Topic, TopicId, User, UserId};
use tracker_core::time::fixed_now;

use crate::vm::{TopicCardVm, map_topic_card, status_toast};

use super::hooks::{ProgressHandle, use_progress_sync};
use super::test_harness::ViewHarness;
use super::toast::{ToastKind, Toaster};
use super::topic_card::{TopicCardActions, use_topic_card_actions};

const TOPIC: TopicId = TopicId::new(7);

/// Progress backend that counts writes and can be told to reject them.
#[derive(Default)]
struct CountingRepo {
    inner: InMemoryRepository,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl CountingRepo {
    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    fn record_write(&self) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Remote {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for CountingRepo {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        self.inner.list_progress(user_id).await
    }

    async fn get_progress(
        &self,
        user_id: UserId,
        topic_id: TopicId,
    ) -> Result<Option<ProgressEntry>, StorageError> {
        self.inner.get_progress(user_id, topic_id).await
    }

    async fn update_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        self.record_write()?;
        self.inner.update_progress(entry).await
    }

    async fn insert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        self.record_write()?;
        self.inner.insert_progress(entry).await
    }

    async fn upsert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        self.record_write()?;
        self.inner.upsert_progress(entry).await
    }
}

#[derive(Clone, Default)]
struct CardHandles {
    actions: Rc<RefCell<Option<TopicCardActions>>>,
    progress: Rc<RefCell<Option<ProgressHandle>>>,
    toaster: Rc<RefCell<Option<Toaster>>>,
}

impl CardHandles {
    fn actions(&self) -> TopicCardActions {
        self.actions.borrow().expect("card mounted")
    }

    fn progress(&self) -> ProgressHandle {
        self.progress.borrow().clone().expect("progress registered")
    }

    fn toasts(&self) -> Vec<(ToastKind, String)> {
        self.toaster
            .borrow()
            .expect("toaster registered")
            .toasts()
            .into_iter()
            .map(|toast| (toast.kind, toast.message))
            .collect()
    }
}

#[derive(Props, Clone)]
struct CardHarnessProps {
    service: Arc<ProgressService>,
    user: Option<User>,
    topic: Topic,
    handles: CardHandles,
}

impl PartialEq for CardHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn CardHarness(props: CardHarnessProps) -> Element {
    let progress = use_progress_sync(props.service.clone(), props.user.clone());
    let service = props.service.clone();
    let user = props.user.clone();
    let handle = use_context_provider(move || ProgressHandle::new(progress, service, user));
    let toaster = use_context_provider(Toaster::new);
    let handles = props.handles.clone();
    use_context_provider(move || handles);

    *props.handles.progress.borrow_mut() = Some(handle);
    *props.handles.toaster.borrow_mut() = Some(toaster);

    let state = progress.read();
    if state.is_loading() {
        return rsx! { div {} };
    }
    let card = map_topic_card(&props.topic, &state.progress(props.topic.id()));

    rsx! {
        RegisteredCard { card }
    }
}

#[component]
fn RegisteredCard(card: TopicCardVm) -> Element {
    let handles = use_context::<CardHandles>();
    let actions = use_topic_card_actions(&card);
    *handles.actions.borrow_mut() = Some(actions);
    rsx! { div {} }
}

struct CardFixture {
    harness: ViewHarness,
    handles: CardHandles,
    repo: Arc<CountingRepo>,
    user: User,
}

impl CardFixture {
    async fn mount(recorded: Option<(ProgressStatus, &str)>) -> Self {
        let user = User::new(UserId::random(), "ada@example.com", None).unwrap();
        let repo = Arc::new(CountingRepo::default());
        if let Some((status, notes)) = recorded {
            repo.inner
                .upsert_progress(&ProgressEntry::new(
                    user.id(),
                    TOPIC,
                    status,
                    Some(notes.to_owned()),
                    fixed_now(),
                ))
                .await
                .expect("seed progress");
        }

        let handles = CardHandles::default();
        let service = Arc::new(ProgressService::new(
            Clock::fixed(fixed_now()),
            repo.clone(),
        ));
        let topic = Topic::new(TOPIC, "Lifetimes", None, 2, 1).unwrap();
        let dom = VirtualDom::new_with_props(
            CardHarness,
            CardHarnessProps {
                service,
                user: Some(user.clone()),
                topic,
                handles: handles.clone(),
            },
        );

        let mut harness = ViewHarness { dom };
        harness.settle().await;
        Self {
            harness,
            handles,
            repo,
            user,
        }
    }

    async fn drive(&mut self) {
        for _ in 0..3 {
            self.harness.drive_async().await;
        }
    }

    async fn stored(&self) -> Option<ProgressEntry> {
        self.repo
            .inner
            .get_progress(self.user.id(), TOPIC)
            .await
            .expect("read stored progress")
    }
}

#[tokio::test(flavor = "current_thread")]
async fn status_button_saves_current_draft() {
    let mut fixture = CardFixture::mount(None).await;
    let actions = fixture.handles.actions();

    let mut draft = actions.draft;
    draft.set("chapter 10 exercises".to_owned());
    actions.set_status.call(ProgressStatus::Completed);
    fixture.drive().await;

    let stored = fixture.stored().await.expect("row written");
    assert_eq!(stored.status, ProgressStatus::Completed);
    assert_eq!(stored.notes.as_deref(), Some("chapter 10 exercises"));
    assert_eq!(fixture.repo.writes(), 1);
    assert_eq!(
        fixture.handles.progress().status_of(TOPIC),
        ProgressStatus::Completed
    );
    assert!(!*actions.pending.peek());
    assert_eq!(
        fixture.handles.toasts(),
        vec![(ToastKind::Success, status_toast(ProgressStatus::Completed))]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn save_notes_keeps_recorded_status_and_leaves_edit_mode() {
    let mut fixture = CardFixture::mount(Some((ProgressStatus::InProgress, "old notes"))).await;
    let actions = fixture.handles.actions();

    actions.begin_edit.call(());
    fixture.drive().await;
    assert!(*actions.editing.peek());
    assert_eq!(*actions.draft.peek(), "old notes");

    let mut draft = actions.draft;
    draft.set("borrowed data outlives the borrow".to_owned());
    actions.save_notes.call(());
    fixture.drive().await;

    let stored = fixture.stored().await.expect("row kept");
    assert_eq!(stored.status, ProgressStatus::InProgress);
    assert_eq!(
        stored.notes.as_deref(),
        Some("borrowed data outlives the borrow")
    );
    assert_eq!(fixture.repo.writes(), 1);
    assert!(!*actions.editing.peek());
    assert_eq!(
        fixture.handles.toasts(),
        vec![(ToastKind::Success, "Notes updated successfully".to_owned())]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn cancel_discards_draft_without_writing() {
    let mut fixture = CardFixture::mount(Some((ProgressStatus::InProgress, "old notes"))).await;
    let actions = fixture.handles.actions();

    actions.begin_edit.call(());
    fixture.drive().await;
    let mut draft = actions.draft;
    draft.set("scratch text".to_owned());
    actions.cancel_edit.call(());
    fixture.drive().await;

    assert_eq!(fixture.repo.writes(), 0);
    assert!(!*actions.editing.peek());
    assert_eq!(*actions.draft.peek(), "old notes");
    assert_eq!(
        fixture.stored().await.and_then(|entry| entry.notes).as_deref(),
        Some("old notes")
    );
    assert!(fixture.handles.toasts().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn failed_writes_toast_and_leave_cache_unchanged() {
    let mut fixture = CardFixture::mount(Some((ProgressStatus::InProgress, "old notes"))).await;
    let actions = fixture.handles.actions();
    fixture.repo.reject_writes();

    actions.begin_edit.call(());
    fixture.drive().await;
    let mut draft = actions.draft;
    draft.set("never stored".to_owned());
    actions.save_notes.call(());
    fixture.drive().await;

    assert!(*actions.editing.peek(), "edit mode should survive a failed save");
    assert!(!*actions.pending.peek());

    actions.set_status.call(ProgressStatus::Completed);
    fixture.drive().await;

    let progress = fixture.handles.progress();
    assert_eq!(progress.status_of(TOPIC), ProgressStatus::InProgress);
    assert_eq!(fixture.repo.writes(), 2);
    let stored = fixture.stored().await.expect("row kept");
    assert_eq!(stored.status, ProgressStatus::InProgress);
    assert_eq!(stored.notes.as_deref(), Some("old notes"));
    assert_eq!(
        fixture.handles.toasts(),
        vec![
            (ToastKind::Error, "Failed to update notes".to_owned()),
            (ToastKind::Error, "Failed to update status".to_owned()),
        ]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn upsert_without_user_is_rejected_before_any_write() {
    let repo = Arc::new(CountingRepo::default());
    let handles = CardHandles::default();
    let service = Arc::new(ProgressService::new(
        Clock::fixed(fixed_now()),
        repo.clone(),
    ));
    let topic = Topic::new(TOPIC, "Lifetimes", None, 2, 1).unwrap();
    let dom = VirtualDom::new_with_props(
        CardHarness,
        CardHarnessProps {
            service,
            user: None,
            topic,
            handles: handles.clone(),
        },
    );
    let mut harness = ViewHarness { dom };
    harness.settle().await;

    let err = handles
        .progress()
        .upsert(TOPIC, ProgressStatus::Completed, None)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "not signed in");
    assert_eq!(repo.writes(), 0);
    assert!(handles.actions.borrow().is_none(), "card mounted without a user");
}
