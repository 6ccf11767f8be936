use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracker_core::model::WeekFilter;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::hooks::{ProgressHandle, use_progress_sync, use_topic_catalog};
use crate::views::toast::Toaster;
use crate::views::week_section::{WeekSection, WeekSelector};
use crate::views::{ViewState, view_state_from_sync};
use crate::vm::{WeekButtonVm, WeekSectionVm, map_week_buttons, map_week_sections};

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    buttons: Vec<WeekButtonVm>,
    sections: Vec<WeekSectionVm>,
}

/// Sign out, then leave for the signed-out page with a confirmation toast.
pub fn use_sign_out() -> Callback<()> {
    let ctx = use_context::<AppContext>();
    let toaster = use_context::<Toaster>();
    let navigator = use_navigator();
    let auth = ctx.auth_service();

    use_callback(move |()| {
        let auth = auth.clone();
        spawn(async move {
            match auth.sign_out().await {
                Ok(()) => {
                    navigator.push(Route::SignedOut {});
                    toaster.success("Signed out successfully");
                }
                Err(_) => toaster.error("Error signing out"),
            }
        });
    })
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let user = ctx.current_user();
    let sign_out = use_sign_out();

    let catalog = use_topic_catalog(ctx.topic_service());
    let progress = use_progress_sync(ctx.progress_service(), user.clone());
    let progress_service = ctx.progress_service();
    let handle_user = user.clone();
    use_context_provider(move || ProgressHandle::new(progress, progress_service, handle_user));
    let mut selected = use_signal(WeekFilter::default);

    let Some(user) = user else {
        return rsx! {
            div { class: "page signed-out",
                p { "You are signed out." }
            }
        };
    };

    let filter = selected();
    let state = {
        let catalog = catalog.read();
        let progress = progress.read();
        view_state_from_sync(&catalog, &progress, || DashboardData {
            buttons: map_week_buttons(&catalog.weeks(), filter),
            sections: map_week_sections(catalog.topics(), &progress, filter),
        })
    };

    if matches!(state, ViewState::Loading) {
        return rsx! {
            div { class: "page loading",
                p { class: "loading-text", "Loading..." }
            }
        };
    }

    let display_name = user.display_name().to_owned();

    rsx! {
        div { class: "dashboard",
            nav { class: "topbar",
                h1 { "Learning Tracker" }
                div { class: "topbar-user",
                    div { class: "topbar-greeting",
                        p { class: "welcome", "Welcome," }
                        p { class: "user-name", "{display_name}" }
                    }
                    button { class: "sign-out", r#type: "button", onclick: move |_| sign_out.call(()), "Sign Out" }
                }
            }

            main { class: "dashboard-main",
                match state {
                    ViewState::Loading => rsx! {},
                    ViewState::Ready(data) => rsx! {
                        WeekSelector {
                            buttons: data.buttons,
                            on_select: move |week: WeekFilter| selected.set(week),
                        }
                        div { class: "week-sections",
                            for section in data.sections {
                                WeekSection { key: "{section.week}", section }
                            }
                        }
                    },
                    ViewState::Error(err) => {
                        let message = err.message();
                        let detail = err.detail().to_owned();
                        rsx! {
                            div { class: "load-error",
                                p { "{message}" }
                                p { class: "load-error-detail", "{detail}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
