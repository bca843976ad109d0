//! Timetable listing: free-text search plus a status tab.

use crate::models::{ScheduleEntry, ScheduleStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimetableTab {
    #[default]
    All,
    /// Runs that are on time
    Upcoming,
    /// Runs that are delayed or cancelled
    Delayed,
}

impl TimetableTab {
    pub fn admits(&self, status: ScheduleStatus) -> bool {
        match self {
            Self::All => true,
            Self::Upcoming => status == ScheduleStatus::OnTime,
            Self::Delayed => matches!(status, ScheduleStatus::Delayed | ScheduleStatus::Cancelled),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimetableFilter {
    /// Case-insensitive substring of the route number or route name
    pub query: Option<String>,
    pub tab: TimetableTab,
}

impl TimetableFilter {
    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        self.tab.admits(entry.status) && self.matches_query(entry)
    }

    fn matches_query(&self, entry: &ScheduleEntry) -> bool {
        let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };

        let query = query.to_lowercase();
        entry.route_number.to_lowercase().contains(&query) || entry.route_name.to_lowercase().contains(&query)
    }

    /// Matching entries, in published order
    pub fn apply<'s, 'e>(&'s self, entries: &'e [ScheduleEntry]) -> impl Iterator<Item = &'e ScheduleEntry> + use<'s, 'e> {
        entries.iter().filter(move |e| self.matches(e))
    }
}
