mod dashboard_vm;
mod topic_card_vm;

pub use dashboard_vm::{WeekButtonVm, WeekSectionVm, map_week_buttons, map_week_sections};
pub use topic_card_vm::{
    STATUS_ACTIONS, StatusActionVm, TopicCardVm, badge_class, map_topic_card, notes_from_draft,
    status_toast,
};
