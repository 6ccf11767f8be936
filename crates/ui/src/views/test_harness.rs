use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::Router;
use services::{AuthService, Clock, ProgressService, TopicService};
use storage::repository::{
    AuthSession, InMemoryRepository, LocalAuth, ProgressRepository, TopicRepository,
};
use tracker_core::model::User;
use tracker_core::time::fixed_now;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::routes::Route;

#[derive(Clone)]
struct TestApp {
    topics: Arc<TopicService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
}

impl UiApp for TestApp {
    fn topic_service(&self) -> Arc<TopicService> {
        Arc::clone(&self.topics)
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    fn auth_service(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { Router::<Route> {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let mount-time loads settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(repo: &InMemoryRepository, user: Option<User>) -> ViewHarness {
    setup_view_harness_with_repos(Arc::new(repo.clone()), Arc::new(repo.clone()), user)
}

fn test_app(
    topics: Arc<dyn TopicRepository>,
    progress: Arc<dyn ProgressRepository>,
    user: Option<User>,
) -> Arc<TestApp> {
    let clock = Clock::fixed(fixed_now());
    Arc::new(TestApp {
        topics: Arc::new(TopicService::new(topics)),
        progress: Arc::new(ProgressService::new(clock, progress)),
        auth: Arc::new(AuthService::new(
            Arc::new(LocalAuth),
            user.map(AuthSession::local),
        )),
    })
}

/// App context over an in-memory backend, for harnesses with their own root.
pub fn test_app_context(repo: &InMemoryRepository, user: Option<User>) -> AppContext {
    let app: Arc<dyn UiApp> = test_app(Arc::new(repo.clone()), Arc::new(repo.clone()), user);
    build_app_context(&app)
}

pub fn setup_view_harness_with_repos(
    topics: Arc<dyn TopicRepository>,
    progress: Arc<dyn ProgressRepository>,
    user: Option<User>,
) -> ViewHarness {
    let app = test_app(topics, progress, user);
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app });
    ViewHarness { dom }
}
