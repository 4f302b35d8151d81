//! Scheduled meetings

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::document::{self, Row};
use crate::item::RecordId;
use crate::traits::Record;

/// A meeting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    id: RecordId,
    topic: String,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    /// An empty string when there is no link
    link: String,
    created: Option<NaiveDateTime>,
}

/// Fields of a [`Meeting`] to overwrite. `None` leaves the field untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeetingPatch {
    pub topic: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// `Some(String::new())` removes the link
    pub link: Option<String>,
}

impl Meeting {
    /// Schedule a brand new meeting.
    /// This will pick a new (random) meeting ID.
    pub fn new(topic: String, date: NaiveDate, time: NaiveTime, link: Option<String>) -> Self {
        let new_id = RecordId::random();
        let new_creation_date = Some(document::now());
        Self::new_with_parameters(new_id, topic, Some(date), Some(time), link.unwrap_or_default(), new_creation_date)
    }

    pub fn new_with_parameters(id: RecordId, topic: String,
                               date: Option<NaiveDate>, time: Option<NaiveTime>,
                               link: String, created: Option<NaiveDateTime>) -> Self
    {
        Self { id, topic, date, time, link, created }
    }

    pub fn topic(&self) -> &str                 { &self.topic }
    pub fn date(&self) -> Option<NaiveDate>     { self.date   }
    pub fn time(&self) -> Option<NaiveTime>     { self.time   }

    /// The meeting link, if there is one
    pub fn link(&self) -> Option<&str> {
        match self.link.trim() {
            "" => None,
            link => Some(link),
        }
    }
}

impl Record for Meeting {
    type Patch = MeetingPatch;

    const SHEET_NAME: &'static str = "Meetings";
    const COLUMNS: &'static [&'static str] = &["ID", "Topic", "Date", "Time", "Link", "Created"];

    fn id(&self) -> &RecordId { &self.id }
    fn set_id(&mut self, id: RecordId) { self.id = id; }
    fn created(&self) -> Option<&NaiveDateTime> { self.created.as_ref() }
    fn date(&self) -> Option<NaiveDate> { self.date }

    fn apply(&mut self, patch: MeetingPatch) {
        if let Some(topic) = patch.topic { self.topic = topic; }
        if let Some(date) = patch.date { self.date = Some(date); }
        if let Some(time) = patch.time { self.time = Some(time); }
        if let Some(link) = patch.link { self.link = link; }
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.topic.clone(),
            document::format_date(self.date),
            document::format_time(self.time),
            self.link.clone(),
            document::format_timestamp(self.created),
        ]
    }

    fn from_row(row: &Row<'_>) -> Self {
        Self::new_with_parameters(
            RecordId::from(row.get("ID")),
            row.get("Topic").to_string(),
            document::parse_date(row.get("Date")),
            document::parse_time(row.get("Time")),
            row.get("Link").to_string(),
            document::parse_timestamp(row.get("Created")),
        )
    }
}
