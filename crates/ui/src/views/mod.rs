mod dashboard;
mod hooks;
mod signed_out;
mod state;
mod toast;
mod topic_card;
mod week_section;

#[cfg(test)]
mod sign_out_smoke;
#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod topic_card_smoke;
#[cfg(test)]
mod view_smoke;

pub use dashboard::{DashboardView, use_sign_out};
pub use hooks::{ProgressHandle, use_progress_sync, use_topic_catalog};
pub use signed_out::SignedOutView;
pub use state::{ViewError, ViewState, view_state_from_sync};
pub use toast::{Toast, ToastHost, ToastKind, Toaster};
pub use topic_card::{TopicCard, TopicCardActions, use_topic_card_actions};
pub use week_section::{WeekSection, WeekSelector};
