//! This module stores the tracker in a workbook file on the local disk

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::document;
use crate::error::Result;
use crate::state::Tracker;


/// A workbook file that the tables can be imported from and exported to
#[derive(Clone, Debug, PartialEq)]
pub struct LocalFile {
    backing_file: PathBuf,
}

impl LocalFile {
    pub fn new(path: &Path) -> Self {
        Self { backing_file: PathBuf::from(path) }
    }

    /// The default file name of an exported workbook
    pub fn default_file_name() -> &'static str {
        "tracker.json"
    }

    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    /// Import the tables of the backing file into `tracker`.
    ///
    /// Sheets that are missing from the file leave the matching table unchanged.
    /// In case of error (missing file, invalid content...), `tracker` is left unchanged.
    pub fn load_into(&self, tracker: &mut Tracker) -> Result<()> {
        let path = &self.backing_file;
        let content = std::fs::read(path)?;
        let workbook = document::parse(&content)?;
        tracker.import_workbook(&workbook);
        log::info!("Loaded {} tasks and {} meetings from {:?}", tracker.tasks().len(), tracker.meetings().len(), path);
        Ok(())
    }

    /// Export both tables of `tracker` to the backing file
    pub fn save_from(&self, tracker: &Tracker) -> Result<()> {
        let path = &self.backing_file;
        let content = tracker.to_document()?;

        let mut file = std::fs::File::create(path)?;
        file.write_all(&content)?;
        file.flush()?;
        log::info!("Saved {} tasks and {} meetings to {:?}", tracker.tasks().len(), tracker.meetings().len(), path);
        Ok(())
    }
}
