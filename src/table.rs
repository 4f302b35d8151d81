//! In-memory tables of records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::item::RecordId;
use crate::task::{Task, TaskStatus};
use crate::traits::Record;
use crate::week::{DateRange, GroupBy, GroupKey};


/// An ordered sequence of records.
///
/// Insertion order only matters for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<R> {
    records: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Append a record, and return its ID.
    ///
    /// A random ID is given to records that do not have one yet.
    pub fn add(&mut self, mut record: R) -> RecordId {
        if record.id().is_empty() {
            record.set_id(RecordId::random());
        }
        let id = record.id().clone();
        log::debug!("Adding record {} to {}", id, R::SHEET_NAME);
        self.records.push(record);
        id
    }

    /// Give a random ID to every record that has none (e.g. rows of a legacy document).
    /// Returns how many IDs have been assigned
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut n_assigned = 0;
        for record in self.records.iter_mut().filter(|r| r.id().is_empty()) {
            record.set_id(RecordId::random());
            n_assigned += 1;
        }
        if n_assigned > 0 {
            log::debug!("Assigned {} new IDs in {}", n_assigned, R::SHEET_NAME);
        }
        n_assigned
    }

    /// Overwrite the fields set in `patch` on the record with this ID
    pub fn update(&mut self, id: &RecordId, patch: R::Patch) -> Result<()> {
        match self.records.iter_mut().find(|r| r.id() == id) {
            None => Err(TrackerError::NotFound(id.clone())),
            Some(record) => {
                log::debug!("Updating record {} of {}", id, R::SHEET_NAME);
                record.apply(patch);
                Ok(())
            },
        }
    }

    pub fn delete(&mut self, id: &RecordId) -> Result<()> {
        match self.records.iter().position(|r| r.id() == id) {
            None => Err(TrackerError::NotFound(id.clone())),
            Some(index) => {
                log::debug!("Deleting record {} of {}", id, R::SHEET_NAME);
                self.records.remove(index);
                Ok(())
            },
        }
    }

    /// The records that match `predicate`.
    ///
    /// The returned iterator is lazy, and can be cloned to walk the same sequence again.
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a R> + Clone + 'a
    where
        P: Fn(&R) -> bool + Clone + 'a,
    {
        self.records.iter().filter(move |r| predicate(*r))
    }

    /// The records whose date lies within `range` (both ends included)
    pub fn in_range<'a>(&'a self, range: DateRange) -> impl Iterator<Item = &'a R> + Clone + 'a {
        self.filter(move |r| in_range(r, &range))
    }
}

impl<R> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R> std::iter::FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}


/// Predicate: the date of `record` lies within `range`
pub fn in_range<R: Record>(record: &R, range: &DateRange) -> bool {
    match record.date() {
        None => false,
        Some(date) => range.contains(date),
    }
}

/// Predicate: `task` has this status
pub fn has_status(task: &Task, status: TaskStatus) -> bool {
    task.status() == Some(status)
}


/// Partition records into groups, ordered chronologically.
///
/// Inside a group, records keep the order they have in `records`.
/// Records without a date do not belong to any group.
pub fn group_by<'a, R, I>(records: I, group_by: GroupBy) -> BTreeMap<GroupKey, Vec<&'a R>>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut groups: BTreeMap<GroupKey, Vec<&'a R>> = BTreeMap::new();
    for record in records {
        let key = match record.date() {
            None => continue,
            Some(date) => group_by.key_of(date),
        };
        groups.entry(key).or_default().push(record);
    }
    groups
}

/// The statuses that appear in `tasks`, in the order they first appear
pub fn distinct_statuses<'a, I>(tasks: I) -> Vec<TaskStatus>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut statuses = Vec::new();
    for status in tasks.into_iter().filter_map(|t| t.status()) {
        if statuses.contains(&status) == false {
            statuses.push(status);
        }
    }
    statuses
}

/// The date of the first dated record of `records`
pub fn first_date<'a, R, I>(records: I) -> Option<chrono::NaiveDate>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records.into_iter().find_map(|r| r.date())
}
