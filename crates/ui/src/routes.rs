use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{DashboardView, SignedOutView, ToastHost, Toaster};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/signed-out", SignedOutView)] SignedOut {},
}

/// Owns the toast stack so notifications survive navigation.
#[component]
fn Layout() -> Element {
    use_context_provider(Toaster::new);

    rsx! {
        div { class: "app",
            main { class: "content",
                Outlet::<Route> {}
            }
            ToastHost {}
        }
    }
}
