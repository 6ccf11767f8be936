use dioxus::prelude::*;
use tracker_core::model::WeekFilter;

use crate::views::topic_card::TopicCard;
use crate::vm::{WeekButtonVm, WeekSectionVm};

#[component]
pub fn WeekSelector(buttons: Vec<WeekButtonVm>, on_select: EventHandler<WeekFilter>) -> Element {
    rsx! {
        div { class: "week-selector",
            for item in buttons {
                button {
                    key: "{item.label}",
                    class: item.class(),
                    r#type: "button",
                    onclick: move |_| on_select.call(item.filter),
                    "{item.label}"
                }
            }
        }
    }
}

#[component]
pub fn WeekSection(section: WeekSectionVm) -> Element {
    rsx! {
        section { class: "week-section",
            h2 { class: "week-heading", "{section.heading}" }
            div { class: "card-grid",
                for card in section.cards {
                    TopicCard { key: "{card.id}", card }
                }
            }
        }
    }
}
