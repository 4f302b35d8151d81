//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime};

use crate::document::{self, Row};
use crate::item::RecordId;
use crate::traits::Record;

/// The progress of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Every status, in the order they are offered to the user
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    /// The label stored in documents
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::ToDo
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TaskStatus::ALL.iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown task status {:?}", s))
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Persistent, unique identifier of this task
    id: RecordId,

    /// The display name of the task
    title: String,
    description: String,
    /// `None` when the stored value was missing or unreadable
    status: Option<TaskStatus>,
    due_date: Option<NaiveDate>,

    /// The time this task was created.
    /// This can be `None` for tasks read from an incomplete document
    created: Option<NaiveDateTime>,
}

/// Fields of a [`Task`] to overwrite. `None` leaves the field untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}


impl Task {
    /// Create a brand new Task.
    /// This will pick a new (random) task ID.
    pub fn new(title: String, description: String, status: TaskStatus, due_date: NaiveDate) -> Self {
        let new_id = RecordId::random();
        let new_creation_date = Some(document::now());
        Self::new_with_parameters(new_id, title, description, Some(status), Some(due_date), new_creation_date)
    }

    /// Create a new Task instance, that may have been read from a document already
    pub fn new_with_parameters(id: RecordId, title: String, description: String,
                               status: Option<TaskStatus>, due_date: Option<NaiveDate>,
                               created: Option<NaiveDateTime>,
                            ) -> Self
    {
        Self {
            id,
            title,
            description,
            status,
            due_date,
            created,
        }
    }

    pub fn title(&self) -> &str                     { &self.title       }
    pub fn description(&self) -> &str               { &self.description }
    pub fn status(&self) -> Option<TaskStatus>      { self.status       }
    pub fn due_date(&self) -> Option<NaiveDate>     { self.due_date     }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }
    pub fn set_description(&mut self, new_description: String) {
        self.description = new_description;
    }
    pub fn set_status(&mut self, new_status: TaskStatus) {
        self.status = Some(new_status);
    }
    pub fn set_due_date(&mut self, new_due_date: NaiveDate) {
        self.due_date = Some(new_due_date);
    }
}

impl Record for Task {
    type Patch = TaskPatch;

    const SHEET_NAME: &'static str = "Tasks";
    const COLUMNS: &'static [&'static str] = &["ID", "Title", "Description", "Status", "DueDate", "Created"];

    fn id(&self) -> &RecordId { &self.id }
    fn set_id(&mut self, id: RecordId) { self.id = id; }
    fn created(&self) -> Option<&NaiveDateTime> { self.created.as_ref() }
    fn date(&self) -> Option<NaiveDate> { self.due_date }

    fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title { self.set_title(title); }
        if let Some(description) = patch.description { self.set_description(description); }
        if let Some(status) = patch.status { self.set_status(status); }
        if let Some(due_date) = patch.due_date { self.set_due_date(due_date); }
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.status.map(|s| s.label().to_string()).unwrap_or_default(),
            document::format_date(self.due_date),
            document::format_timestamp(self.created),
        ]
    }

    fn from_row(row: &Row<'_>) -> Self {
        let status = match row.get("Status").trim() {
            "" => None,
            value => match value.parse() {
                Ok(status) => Some(status),
                Err(err) => {
                    log::warn!("{}. Leaving the status of task {:?} empty", err, row.get("Title"));
                    None
                },
            },
        };

        Self::new_with_parameters(
            RecordId::from(row.get("ID")),
            row.get("Title").to_string(),
            row.get("Description").to_string(),
            status,
            document::parse_date(row.get("DueDate")),
            document::parse_timestamp(row.get("Created")),
        )
    }
}
