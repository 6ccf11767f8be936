use services::ProgressState;
use tracker_core::model::{Topic, WeekFilter, WeekGroup, group_by_week, topics_for_week};

use crate::vm::topic_card_vm::{TopicCardVm, map_topic_card};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekButtonVm {
    pub filter: WeekFilter,
    pub label: String,
    pub selected: bool,
}

impl WeekButtonVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.selected {
            "week-button week-button--selected"
        } else {
            "week-button"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekSectionVm {
    pub week: u32,
    pub heading: String,
    pub cards: Vec<TopicCardVm>,
}

/// "All Weeks" followed by one button per catalog week.
#[must_use]
pub fn map_week_buttons(weeks: &[u32], selected: WeekFilter) -> Vec<WeekButtonVm> {
    let all = WeekButtonVm {
        filter: WeekFilter::All,
        label: "All Weeks".to_owned(),
        selected: selected == WeekFilter::All,
    };
    std::iter::once(all)
        .chain(weeks.iter().map(|&week| WeekButtonVm {
            filter: WeekFilter::Week(week),
            label: format!("Week {week}"),
            selected: selected.is_selected(week),
        }))
        .collect()
}

/// Sections to render under `filter`, cards resolved against the cache.
///
/// A single-week filter yields that week even if no topic carries it,
/// which renders as an empty section.
#[must_use]
pub fn map_week_sections(
    topics: &[Topic],
    progress: &ProgressState,
    filter: WeekFilter,
) -> Vec<WeekSectionVm> {
    let groups = match filter {
        WeekFilter::All => group_by_week(topics),
        WeekFilter::Week(week) => vec![WeekGroup {
            week,
            topics: topics_for_week(topics, week).into_iter().cloned().collect(),
        }],
    };
    groups
        .into_iter()
        .map(|group| WeekSectionVm {
            week: group.week,
            heading: format!("Week {}", group.week),
            cards: group
                .topics
                .iter()
                .map(|topic| map_topic_card(topic, &progress.progress(topic.id())))
                .collect(),
        })
        .collect()
}
