//! The state of a tracker session

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::document::{self, Workbook};
use crate::error::Result;
use crate::item::RecordId;
use crate::table::{self, Table};
use crate::task::{Task, TaskPatch, TaskStatus};
use crate::meeting::{Meeting, MeetingPatch};
use crate::traits::Record;
use crate::week::{DateRange, GroupBy, GroupKey, WeekSelection};


/// Everything a tracker session holds: both tables, and what the user currently looks at.
///
/// The presentation layer owns one of these, calls the operations below for each user action, and re-renders from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tracker {
    tasks: Table<Task>,
    meetings: Table<Meeting>,

    week: WeekSelection,
    /// Only show tasks that have this status (`None` shows them all)
    status_filter: Option<TaskStatus>,
    group_by: Option<GroupBy>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &Table<Task> { &self.tasks }
    pub fn meetings(&self) -> &Table<Meeting> { &self.meetings }


    pub fn add_task(&mut self, title: String, description: String, status: TaskStatus, due_date: NaiveDate) -> RecordId {
        self.tasks.add(Task::new(title, description, status, due_date))
    }

    pub fn update_task(&mut self, id: &RecordId, patch: TaskPatch) -> Result<()> {
        self.tasks.update(id, patch)
    }

    pub fn delete_task(&mut self, id: &RecordId) -> Result<()> {
        self.tasks.delete(id)
    }

    pub fn add_meeting(&mut self, topic: String, date: NaiveDate, time: NaiveTime, link: Option<String>) -> RecordId {
        self.meetings.add(Meeting::new(topic, date, time, link))
    }

    pub fn update_meeting(&mut self, id: &RecordId, patch: MeetingPatch) -> Result<()> {
        self.meetings.update(id, patch)
    }

    pub fn delete_meeting(&mut self, id: &RecordId) -> Result<()> {
        self.meetings.delete(id)
    }


    pub fn week(&self) -> &WeekSelection { &self.week }
    pub fn previous_week(&mut self) -> Result<()> { self.week.previous_week() }
    pub fn next_week(&mut self) -> Result<()> { self.week.next_week() }
    pub fn set_week_offset(&mut self, offset: i64) -> Result<()> { self.week.set_offset(offset) }
    pub fn set_custom_range(&mut self, start: NaiveDate, end: NaiveDate) { self.week.set_custom_range(start, end) }

    pub fn status_filter(&self) -> Option<TaskStatus> { self.status_filter }
    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) { self.status_filter = status }
    pub fn group_by(&self) -> Option<GroupBy> { self.group_by }
    pub fn set_group_by(&mut self, group_by: Option<GroupBy>) { self.group_by = group_by }


    /// The tasks due in the selected range (as seen from `today`), with the selected status
    pub fn visible_tasks<'a>(&'a self, today: NaiveDate) -> impl Iterator<Item = &'a Task> + Clone + 'a {
        let range = self.week.range_from(today);
        let status = self.status_filter;
        self.tasks.filter(move |t| {
            table::in_range(t, &range) && status.map(|s| table::has_status(t, s)).unwrap_or(true)
        })
    }

    /// The visible tasks, grouped the way the user selected.
    ///
    /// Returns `None` if no grouping is selected.
    pub fn grouped_tasks(&self, today: NaiveDate) -> Option<BTreeMap<GroupKey, Vec<&Task>>> {
        self.group_by.map(|group_by| table::group_by(self.visible_tasks(today), group_by))
    }

    /// The statuses the user can filter the selected range by.
    ///
    /// These are the statuses present in the selected range, regardless of the current status filter
    pub fn status_choices(&self, today: NaiveDate) -> Vec<TaskStatus> {
        table::distinct_statuses(self.tasks.in_range(self.week.range_from(today)))
    }

    /// The meetings planned in the selected range
    pub fn visible_meetings<'a>(&'a self, today: NaiveDate) -> impl Iterator<Item = &'a Meeting> + Clone + 'a {
        self.meetings.in_range(self.week.range_from(today))
    }

    /// The date of the weekly update, i.e. the date of the first meeting in the selected range
    pub fn weekly_update_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        table::first_date(self.visible_meetings(today))
    }

    pub fn selected_range(&self, today: NaiveDate) -> DateRange {
        self.week.range_from(today)
    }


    /// Replace the tables with the ones of a workbook.
    ///
    /// Tables that are absent from the workbook are left unchanged. Rows without an ID are given one.
    pub fn import_workbook(&mut self, workbook: &Workbook) {
        if let Some(tasks) = workbook.table::<Task>() {
            self.tasks = with_ids(tasks);
        } else {
            log::info!("No {} sheet, keeping the current tasks", Task::SHEET_NAME);
        }
        if let Some(meetings) = workbook.table::<Meeting>() {
            self.meetings = with_ids(meetings);
        } else {
            log::info!("No {} sheet, keeping the current meetings", Meeting::SHEET_NAME);
        }
    }

    /// Build a workbook document out of both tables
    pub fn to_document(&self) -> Result<Vec<u8>> {
        document::build_from(&self.tasks, &self.meetings)
    }

    pub fn replace_tables(&mut self, tasks: Table<Task>, meetings: Table<Meeting>) {
        self.tasks = tasks;
        self.meetings = meetings;
    }
}

fn with_ids<R: Record>(mut table: Table<R>) -> Table<R> {
    let n_assigned = table.assign_missing_ids();
    if n_assigned > 0 {
        log::info!("{} rows of {} had no ID yet", n_assigned, R::SHEET_NAME);
    }
    table
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::week::week_range;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A Wednesday
    fn today() -> NaiveDate {
        date(2024, 5, 15)
    }

    fn populated() -> Tracker {
        let mut tracker = Tracker::new();
        tracker.add_task("Last week".into(), String::new(), TaskStatus::Done, date(2024, 5, 12));
        tracker.add_task("Monday".into(), String::new(), TaskStatus::ToDo, date(2024, 5, 13));
        tracker.add_task("Friday".into(), "prepare the demo".into(), TaskStatus::InProgress, date(2024, 5, 17));
        tracker.add_task("Sunday".into(), String::new(), TaskStatus::ToDo, date(2024, 5, 19));
        tracker.add_meeting("Standup".into(), date(2024, 5, 14), NaiveTime::from_hms_opt(9, 0, 0).unwrap(), None);
        tracker.add_meeting("Retro".into(), date(2024, 5, 24), NaiveTime::from_hms_opt(16, 0, 0).unwrap(), Some("https://meet.example.com/retro".into()));
        tracker
    }

    fn titles<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a str> {
        tasks.map(|t| t.title()).collect()
    }

    #[test]
    fn current_week_view() {
        let mut tracker = populated();
        assert_eq!(Some(tracker.selected_range(today())), week_range(today(), 0));
        assert_eq!(titles(tracker.visible_tasks(today())), vec!["Monday", "Friday", "Sunday"]);
        assert_eq!(tracker.status_choices(today()), vec![TaskStatus::ToDo, TaskStatus::InProgress]);

        tracker.set_status_filter(Some(TaskStatus::ToDo));
        assert_eq!(titles(tracker.visible_tasks(today())), vec!["Monday", "Sunday"]);
        // choices do not depend on the current filter
        assert_eq!(tracker.status_choices(today()).len(), 2);

        assert_eq!(tracker.weekly_update_date(today()), Some(date(2024, 5, 14)));
        assert!(tracker.grouped_tasks(today()).is_none());
    }

    #[test]
    fn navigating_weeks() {
        let mut tracker = populated();
        tracker.previous_week().unwrap();
        assert_eq!(titles(tracker.visible_tasks(today())), vec!["Last week"]);
        assert_eq!(tracker.weekly_update_date(today()), None);

        tracker.set_custom_range(date(2024, 5, 1), date(2024, 5, 31));
        assert_eq!(tracker.visible_tasks(today()).count(), 4);
        assert_eq!(tracker.visible_meetings(today()).count(), 2);

        tracker.next_week().unwrap();
        tracker.next_week().unwrap();
        assert_eq!(Some(tracker.selected_range(today())), week_range(today(), 1));
        assert_eq!(tracker.visible_meetings(today()).map(|m| m.topic()).collect::<Vec<_>>(), vec!["Retro"]);
    }

    #[test]
    fn grouping_by_week() {
        let mut tracker = populated();
        tracker.set_custom_range(date(2024, 5, 1), date(2024, 5, 31));
        tracker.set_group_by(Some(GroupBy::Week));

        let groups = tracker.grouped_tasks(today()).unwrap();
        let labels: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["Week 19 - 2024", "Week 20 - 2024"]);
        assert_eq!(groups.values().map(|g| g.len()).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn edit_and_delete() {
        let mut tracker = populated();
        let friday = tracker.tasks().iter().find(|t| t.title() == "Friday").unwrap().id().clone();

        tracker.update_task(&friday, TaskPatch { status: Some(TaskStatus::Done), ..TaskPatch::default() }).unwrap();
        assert_eq!(tracker.tasks().get(&friday).unwrap().status(), Some(TaskStatus::Done));
        assert_eq!(tracker.tasks().get(&friday).unwrap().description(), "prepare the demo");

        tracker.delete_task(&friday).unwrap();
        assert!(tracker.tasks().get(&friday).is_none());
        assert!(matches!(tracker.update_task(&friday, TaskPatch::default()), Err(TrackerError::NotFound(_))));

        let standup = tracker.meetings().iter().next().unwrap().id().clone();
        tracker.update_meeting(&standup, MeetingPatch { topic: Some("Daily".into()), ..MeetingPatch::default() }).unwrap();
        assert_eq!(tracker.meetings().get(&standup).unwrap().topic(), "Daily");
        tracker.delete_meeting(&standup).unwrap();
        assert_eq!(tracker.meetings().len(), 1);
    }

    #[test]
    fn import_keeps_absent_tables() {
        let mut tracker = populated();
        let mut other = Tracker::new();
        other.add_task("Imported".into(), String::new(), TaskStatus::ToDo, date(2024, 5, 13));

        let mut workbook = crate::document::parse(&other.to_document().unwrap()).unwrap();
        workbook.sheets.retain(|s| s.name == "Tasks");

        tracker.import_workbook(&workbook);
        assert_eq!(tracker.tasks(), other.tasks());
        assert_eq!(tracker.meetings().len(), 2);
    }
}
