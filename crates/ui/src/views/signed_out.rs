use dioxus::prelude::*;

#[component]
pub fn SignedOutView() -> Element {
    rsx! {
        div { class: "page signed-out",
            h1 { "Learning Tracker" }
            p { "You are signed out." }
        }
    }
}
