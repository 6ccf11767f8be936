use dioxus::prelude::*;
use tracker_core::model::ProgressStatus;

use crate::views::hooks::ProgressHandle;
use crate::views::toast::Toaster;
use crate::vm::{STATUS_ACTIONS, TopicCardVm, notes_from_draft, status_toast};

/// Ephemeral state and actions of one topic card.
///
/// The draft starts from the notes recorded at mount and is reset to the
/// recorded notes on entering or leaving edit mode. `pending` is set while
/// this card's write is in flight.
#[derive(Clone, Copy)]
pub struct TopicCardActions {
    pub draft: Signal<String>,
    pub editing: Signal<bool>,
    pub pending: Signal<bool>,
    pub set_status: Callback<ProgressStatus>,
    pub save_notes: Callback<()>,
    pub begin_edit: Callback<()>,
    pub cancel_edit: Callback<()>,
}

pub fn use_topic_card_actions(card: &TopicCardVm) -> TopicCardActions {
    let progress = use_context::<ProgressHandle>();
    let toaster = use_context::<Toaster>();

    let initial_notes = card.notes.clone();
    let mut draft = use_signal(move || initial_notes.unwrap_or_default());
    let mut editing = use_signal(|| false);
    let mut pending = use_signal(|| false);
    let topic_id = card.id;

    let progress_for_status = progress.clone();
    let set_status = use_callback(move |status: ProgressStatus| {
        let progress = progress_for_status.clone();
        let notes = notes_from_draft(&draft.peek());
        pending.set(true);
        spawn(async move {
            match progress.upsert(topic_id, status, notes).await {
                Ok(_) => toaster.success(status_toast(status)),
                Err(_) => toaster.error("Failed to update status"),
            }
            pending.set(false);
        });
    });

    let save_notes = use_callback(move |()| {
        let progress = progress.clone();
        let notes = notes_from_draft(&draft.peek());
        let status = progress.status_of(topic_id);
        pending.set(true);
        spawn(async move {
            match progress.upsert(topic_id, status, notes).await {
                Ok(_) => {
                    editing.set(false);
                    toaster.success("Notes updated successfully");
                }
                Err(_) => toaster.error("Failed to update notes"),
            }
            pending.set(false);
        });
    });

    let notes_for_edit = card.notes.clone();
    let begin_edit = use_callback(move |()| {
        draft.set(notes_for_edit.clone().unwrap_or_default());
        editing.set(true);
    });
    let notes_for_cancel = card.notes.clone();
    let cancel_edit = use_callback(move |()| {
        draft.set(notes_for_cancel.clone().unwrap_or_default());
        editing.set(false);
    });

    TopicCardActions {
        draft,
        editing,
        pending,
        set_status,
        save_notes,
        begin_edit,
        cancel_edit,
    }
}

/// One topic with its status controls and notes editor.
#[component]
pub fn TopicCard(card: TopicCardVm) -> Element {
    let TopicCardActions {
        mut draft,
        editing,
        pending,
        set_status,
        save_notes,
        begin_edit,
        cancel_edit,
    } = use_topic_card_actions(&card);

    let is_pending = pending();
    let draft_value = draft();
    let status_label = card.status_label();

    rsx! {
        article { class: "topic-card",
            div { class: "topic-card-header",
                div {
                    h3 { class: "topic-name", "{card.name}" }
                    if let Some(description) = card.description.as_deref() {
                        p { class: "topic-description", "{description}" }
                    }
                }
                span { class: card.badge_class, "{status_label}" }
            }

            div { class: "status-actions",
                for action in STATUS_ACTIONS {
                    button {
                        key: "{action.label}",
                        class: action.class,
                        r#type: "button",
                        disabled: is_pending,
                        onclick: move |_| set_status.call(action.status),
                        "{action.label}"
                    }
                }
            }

            if editing() {
                div { class: "notes-editor",
                    textarea {
                        rows: "3",
                        placeholder: "Add your notes here...",
                        value: "{draft_value}",
                        oninput: move |evt| draft.set(evt.value()),
                    }
                    div { class: "notes-actions",
                        button {
                            class: "notes-save",
                            r#type: "button",
                            disabled: is_pending,
                            onclick: move |_| save_notes.call(()),
                            "Save"
                        }
                        button {
                            class: "notes-cancel",
                            r#type: "button",
                            onclick: move |_| cancel_edit.call(()),
                            "Cancel"
                        }
                    }
                }
            } else {
                div { class: "notes",
                    if let Some(notes) = card.notes.as_deref() {
                        p { class: "notes-text", "{notes}" }
                    }
                    button {
                        class: "notes-toggle",
                        r#type: "button",
                        onclick: move |_| begin_edit.call(()),
                        "{card.notes_button_label}"
                    }
                }
            }
        }
    }
}
