mod ids;
mod progress;
mod topic;
mod user;
pub mod week;

pub use ids::{ParseIdError, TopicId, UserId};
pub use progress::{Progress, ProgressEntry, ProgressError, ProgressStatus};
pub use topic::{Topic, TopicError};
pub use user::{User, UserError};
pub use week::{WeekFilter, WeekGroup, group_by_week, topics_for_week, week_numbers};
