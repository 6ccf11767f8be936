use std::collections::{BTreeMap, BTreeSet};

use crate::model::topic::Topic;

/// Topics sharing one week number, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup {
    pub week: u32,
    pub topics: Vec<Topic>,
}

/// Which weeks the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WeekFilter {
    #[default]
    All,
    Week(u32),
}

impl WeekFilter {
    #[must_use]
    pub fn is_selected(self, week: u32) -> bool {
        self == WeekFilter::Week(week)
    }
}

/// Ascending, de-duplicated week numbers present in `topics`.
#[must_use]
pub fn week_numbers(topics: &[Topic]) -> Vec<u32> {
    topics
        .iter()
        .map(Topic::week_number)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Topics belonging to `week`, keeping input order.
#[must_use]
pub fn topics_for_week(topics: &[Topic], week: u32) -> Vec<&Topic> {
    topics.iter().filter(|t| t.week_number() == week).collect()
}

/// Groups topics by week number, ascending.
#[must_use]
pub fn group_by_week(topics: &[Topic]) -> Vec<WeekGroup> {
    let mut groups: BTreeMap<u32, Vec<Topic>> = BTreeMap::new();
    for topic in topics {
        groups
            .entry(topic.week_number())
            .or_default()
            .push(topic.clone());
    }
    groups
        .into_iter()
        .map(|(week, topics)| WeekGroup { week, topics })
        .collect()
}
