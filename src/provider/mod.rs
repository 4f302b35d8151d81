//! This modules syncs the tracker with a remote versioned store
//!
//! Saving merges the in-memory tables into the document currently stored in the remote, then pushes the result.

use crate::document;
use crate::error::Result;
use crate::item::VersionTag;
use crate::state::Tracker;
use crate::table::Table;
use crate::traits::{Record, RemoteStore};
use crate::{Meeting, Task};

pub mod merge;
pub use merge::merge;
pub mod feedback;
use feedback::{FeedbackSender, Reporter, SaveEvent};


/// The remote tables, as they were at a given version.
///
/// Rows that had no ID in the remote document hold the IDs they were given when they were imported,
/// so that they are matched with their in-memory counterparts at the next save.
#[derive(Clone, Debug)]
struct Snapshot {
    version: VersionTag,
    tasks: Table<Task>,
    meetings: Table<Meeting>,
}

/// Loads and saves a [`Tracker`] from/to a file of a [`RemoteStore`].
///
/// Usually, the store is a [`Client`](crate::client::Client) to a GitHub repository.
/// In tests, it can be mocked by a `MockStore` (see the `mock_remote_store` feature).
#[derive(Debug)]
pub struct Provider<S>
where
    S: RemoteStore,
{
    /// The remote source (usually a git repository)
    store: S,
    /// Path of the document in the store
    path: String,
    branch: String,

    /// The remote tables as they were last loaded or saved
    snapshot: Option<Snapshot>,
}

impl<S> Provider<S>
where
    S: RemoteStore,
{
    /// Create a provider for the document at `path` on `branch`
    pub fn new<P: ToString, B: ToString>(store: S, path: P, branch: B) -> Self {
        Self {
            store,
            path: path.to_string(),
            branch: branch.to_string(),
            snapshot: None,
        }
    }

    /// Returns the remote store
    pub fn store(&self) -> &S { &self.store }
    /// Returns the remote store
    pub fn store_mut(&mut self) -> &mut S { &mut self.store }
    pub fn path(&self) -> &str { &self.path }
    pub fn branch(&self) -> &str { &self.branch }
    /// The version of the remote document at the last successful load or save, if any
    pub fn last_version(&self) -> Option<&VersionTag> { self.snapshot.as_ref().map(|s| &s.version) }

    /// Replace the tables of `tracker` with the ones of the remote document.
    ///
    /// Returns `false` when there is no remote document yet (this is not an error, the first save will create it).
    /// Tables that are missing from the document are left unchanged.
    /// In case of error, `tracker` is left unchanged.
    pub async fn load(&mut self, tracker: &mut Tracker) -> Result<bool> {
        log::info!("Loading {} from branch {}", self.path, self.branch);
        let remote = match self.store.fetch(&self.path, &self.branch).await? {
            None => {
                log::info!("There is no {} on branch {} yet. It will be created at the first save", self.path, self.branch);
                self.snapshot = None;
                return Ok(false);
            },
            Some(remote) => remote,
        };

        let workbook = document::parse(&remote.content)?;
        tracker.import_workbook(&workbook);

        // IDs given to legacy rows during the import are part of the snapshot
        let tasks = match workbook.sheet(Task::SHEET_NAME) {
            Some(_) => tracker.tasks().clone(),
            None => Table::new(),
        };
        let meetings = match workbook.sheet(Meeting::SHEET_NAME) {
            Some(_) => tracker.meetings().clone(),
            None => Table::new(),
        };
        self.snapshot = Some(Snapshot { version: remote.version, tasks, meetings });
        Ok(true)
    }

    /// Saves the tracker into the remote document, and provide feeedback to the user about the progress.
    ///
    /// The tables currently stored in the remote are merged with the ones of `tracker` (see [`merge`]), so that the in-memory version of a record always wins.
    /// The merged tables are pushed, and replace the tables of `tracker`.
    ///
    /// In case of error, neither `tracker` nor the remote document are changed. Nothing is retried.
    pub async fn save_with_feedback(&mut self, tracker: &mut Tracker, feedback_sender: FeedbackSender) -> Result<VersionTag> {
        self.run_save(tracker, &Reporter::to(feedback_sender)).await
    }

    /// Saves the tracker into the remote document, without giving any feedback.
    ///
    /// See [`Self::save_with_feedback`]
    pub async fn save(&mut self, tracker: &mut Tracker) -> Result<VersionTag> {
        self.run_save(tracker, &Reporter::silent()).await
    }

    async fn run_save(&mut self, tracker: &mut Tracker, reporter: &Reporter) -> Result<VersionTag> {
        reporter.report(SaveEvent::Started);
        let result = self.run_save_inner(tracker, reporter).await;
        match &result {
            Ok(version) => reporter.report(SaveEvent::Pushed { version: version.clone() }),
            Err(err) => reporter.report(SaveEvent::Failed { error: err.to_string() }),
        }
        result
    }

    async fn run_save_inner(&mut self, tracker: &mut Tracker, reporter: &Reporter) -> Result<VersionTag> {
        let (old_tasks, old_meetings, known_version): (Table<Task>, Table<Meeting>, Option<VersionTag>) = match self.store.fetch(&self.path, &self.branch).await? {
            None => (Table::new(), Table::new(), None),
            Some(remote) => match &self.snapshot {
                // unchanged since the last load or save
                Some(snapshot) if snapshot.version == remote.version => {
                    (snapshot.tasks.clone(), snapshot.meetings.clone(), Some(remote.version))
                },
                _ => {
                    let workbook = document::parse(&remote.content)?;
                    (
                        workbook.table().unwrap_or_default(),
                        workbook.table().unwrap_or_default(),
                        Some(remote.version),
                    )
                },
            },
        };
        reporter.report(SaveEvent::Fetched { version: known_version.clone() });

        let tasks = merge(&old_tasks, tracker.tasks());
        reporter.report(merged_event(&old_tasks, tracker.tasks(), &tasks));
        let meetings = merge(&old_meetings, tracker.meetings());
        reporter.report(merged_event(&old_meetings, tracker.meetings(), &meetings));

        let content = document::build_from(&tasks, &meetings)?;
        log::debug!("Pushing {} bytes to {}", content.len(), self.path);
        let new_version = self.store.push(&self.path, &self.branch, content, known_version.as_ref()).await?;

        tracker.replace_tables(tasks.clone(), meetings.clone());
        self.snapshot = Some(Snapshot { version: new_version.clone(), tasks, meetings });
        Ok(new_version)
    }
}

fn merged_event<R: Record>(old: &Table<R>, new: &Table<R>, merged: &Table<R>) -> SaveEvent {
    SaveEvent::Merged { table: R::SHEET_NAME, old: old.len(), new: new.len(), merged: merged.len() }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_store::MockStore;
    use crate::task::TaskStatus;

    const LEGACY: &str = r#"{"sheets": [
        {"name": "Tasks", "columns": ["Title", "Status"], "rows": [["Pay rent", "To Do"], ["Call Bob", "Done"]]}
    ]}"#;

    fn legacy_provider() -> Provider<MockStore> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut store = MockStore::new();
        store.external_edit("tracker.json", "main", LEGACY.as_bytes().to_vec());
        Provider::new(store, "tracker.json", "main")
    }

    #[tokio::test]
    async fn legacy_rows_are_not_duplicated() {
        let mut provider = legacy_provider();
        let mut tracker = Tracker::new();
        provider.load(&mut tracker).await.unwrap();
        let loaded = tracker.tasks().clone();
        assert_eq!(loaded.len(), 2);

        provider.save(&mut tracker).await.unwrap();
        assert_eq!(tracker.tasks(), &loaded);

        let pushed = document::parse(&provider.store().file("tracker.json", "main").unwrap().content).unwrap();
        assert_eq!(pushed.table::<Task>().unwrap(), loaded);
    }

    #[tokio::test]
    async fn snapshot_is_dropped_when_the_remote_changes() {
        let mut provider = legacy_provider();
        let mut tracker = Tracker::new();
        provider.load(&mut tracker).await.unwrap();
        let loaded_version = provider.last_version().cloned();

        let mut other = Tracker::new();
        other.add_task("From elsewhere".to_string(), String::new(), TaskStatus::ToDo, chrono::NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        provider.store_mut().external_edit("tracker.json", "main", other.to_document().unwrap());

        provider.save(&mut tracker).await.unwrap();
        assert_ne!(provider.last_version().cloned(), loaded_version);
        let titles: Vec<&str> = tracker.tasks().iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["From elsewhere", "Pay rent", "Call Bob"]);
    }
}
