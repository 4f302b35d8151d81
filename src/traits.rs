//! Traits used by the tables and by the sync machinery

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::document::Row;
use crate::error::Result;
use crate::item::{RecordId, VersionTag};

/// A row of one of the tracker tables (a [`Task`](crate::Task) or a [`Meeting`](crate::Meeting))
pub trait Record: Clone + Debug + PartialEq {
    /// A set of optional field values, used to edit an existing record
    type Patch;

    /// The name of the sheet this kind of record is stored in
    const SHEET_NAME: &'static str;
    /// The fixed column schema, in the order they are written
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &RecordId;
    /// Only meant to give an ID to records that have none.
    /// An ID that has been assigned must never change.
    fn set_id(&mut self, id: RecordId);
    fn created(&self) -> Option<&NaiveDateTime>;

    /// The date this record is filtered and grouped by (due date for tasks, meeting date for meetings)
    fn date(&self) -> Option<NaiveDate>;

    /// Overwrite the fields that are set in `patch`. ID and creation date are never changed
    fn apply(&mut self, patch: Self::Patch);

    /// Cell values, in the order of [`Self::COLUMNS`]
    fn to_row(&self) -> Vec<String>;
    /// Build a record from a row of a sheet normalized to [`Self::COLUMNS`]. Malformed optional values become empty values
    fn from_row(row: &Row<'_>) -> Self;
}


/// A file as it was read from a [`RemoteStore`]
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteDocument {
    pub content: Vec<u8>,
    pub version: VersionTag,
}

/// A versioned file store (usually a git repository, see [`Client`](crate::client::Client))
#[async_trait]
pub trait RemoteStore {
    /// Read the file at `path` on `branch`.
    /// Returns `Ok(None)` if there is no such file yet, which is not an error: the first push will create it.
    async fn fetch(&mut self, path: &str, branch: &str) -> Result<Option<RemoteDocument>>;

    /// Write the file at `path` on `branch`, and return its new version.
    ///
    /// `known_version` is the version read at the last fetch. It must be `None` to create a file that does not exist yet.
    /// Stores reject the write when it does not match the current version of the file.
    async fn push(&mut self, path: &str, branch: &str, content: Vec<u8>, known_version: Option<&VersionTag>) -> Result<VersionTag>;
}
