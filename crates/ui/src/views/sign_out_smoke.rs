use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, Router};
use storage::repository::InMemoryRepository;
use tracker_core::model::{User, UserId};

use crate::context::AppContext;

use super::dashboard::use_sign_out;
use super::test_harness::{ViewHarness, test_app_context};
use super::toast::{ToastHost, Toaster};

#[derive(Clone, Default)]
struct SignOutHandles {
    sign_out: Rc<RefCell<Option<Callback<()>>>>,
}

#[derive(Props, Clone)]
struct SignOutHarnessProps {
    context: AppContext,
    handles: SignOutHandles,
}

impl PartialEq for SignOutHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn SignOutRouterHarness(props: SignOutHarnessProps) -> Element {
    let context = props.context.clone();
    use_context_provider(move || context);
    let handles = props.handles.clone();
    use_context_provider(move || handles);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[layout(TestLayout)]
        #[route("/")] Start {},
        #[route("/signed-out")] Done {},
}

#[component]
fn TestLayout() -> Element {
    use_context_provider(Toaster::new);
    rsx! {
        Outlet::<TestRoute> {}
        ToastHost {}
    }
}

#[component]
fn Start() -> Element {
    let handles = use_context::<SignOutHandles>();
    let sign_out = use_sign_out();
    *handles.sign_out.borrow_mut() = Some(sign_out);
    rsx! { p { "still signed in" } }
}

#[component]
fn Done() -> Element {
    rsx! { p { "left the dashboard" } }
}

#[tokio::test(flavor = "current_thread")]
async fn sign_out_navigates_then_confirms_on_the_next_page() {
    let user = User::new(UserId::random(), "ada@example.com", None).unwrap();
    let context = test_app_context(&InMemoryRepository::new(), Some(user));
    let handles = SignOutHandles::default();
    let dom = VirtualDom::new_with_props(
        SignOutRouterHarness,
        SignOutHarnessProps {
            context: context.clone(),
            handles: handles.clone(),
        },
    );
    let mut harness = ViewHarness { dom };
    harness.settle().await;
    assert!(harness.render().contains("still signed in"));

    let sign_out = handles.sign_out.borrow().expect("sign-out registered");
    sign_out.call(());
    for _ in 0..3 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("left the dashboard"), "did not navigate: {html}");
    assert!(
        html.contains("Signed out successfully"),
        "missing toast in {html}"
    );
    assert!(context.current_user().is_none());
}
