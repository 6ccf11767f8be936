use tracker_core::model::{Progress, ProgressStatus, Topic, TopicId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicCardVm {
    pub id: TopicId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProgressStatus,
    pub badge_class: &'static str,
    pub notes: Option<String>,
    pub notes_button_label: &'static str,
}

impl TopicCardVm {
    /// The badge text: the wire name of the status.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.status.as_str()
    }
}

/// One of the three status buttons on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusActionVm {
    pub status: ProgressStatus,
    pub label: &'static str,
    pub class: &'static str,
}

pub const STATUS_ACTIONS: [StatusActionVm; 3] = [
    StatusActionVm {
        status: ProgressStatus::Completed,
        label: "Complete",
        class: "status-button status-button--completed",
    },
    StatusActionVm {
        status: ProgressStatus::InProgress,
        label: "In Progress",
        class: "status-button status-button--in-progress",
    },
    StatusActionVm {
        status: ProgressStatus::Unread,
        label: "Mark Unread",
        class: "status-button status-button--unread",
    },
];

#[must_use]
pub fn badge_class(status: ProgressStatus) -> &'static str {
    match status {
        ProgressStatus::Completed => "status-badge status-badge--completed",
        ProgressStatus::InProgress => "status-badge status-badge--in-progress",
        ProgressStatus::Unread => "status-badge status-badge--unread",
    }
}

#[must_use]
pub fn map_topic_card(topic: &Topic, progress: &Progress) -> TopicCardVm {
    let notes = progress.notes.clone().filter(|n| !n.is_empty());
    TopicCardVm {
        id: topic.id(),
        name: topic.name().to_owned(),
        description: topic.description().map(str::to_owned),
        status: progress.status,
        badge_class: badge_class(progress.status),
        notes_button_label: if notes.is_some() {
            "Edit Notes"
        } else {
            "Add Notes"
        },
        notes,
    }
}

/// Notes payload for an upsert: an empty draft clears the notes.
#[must_use]
pub fn notes_from_draft(draft: &str) -> Option<String> {
    if draft.trim().is_empty() {
        None
    } else {
        Some(draft.to_owned())
    }
}

#[must_use]
pub fn status_toast(status: ProgressStatus) -> String {
    format!("Topic marked as {status}")
}
