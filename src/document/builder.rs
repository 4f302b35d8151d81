//! A module to build workbook documents

use crate::document::{Sheet, Workbook};
use crate::error::Result;
use crate::table::Table;
use crate::{Meeting, Task};

/// Build a workbook document with a `Tasks` and a `Meetings` sheet
pub fn build_from(tasks: &Table<Task>, meetings: &Table<Meeting>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    workbook.insert_sheet(Sheet::from_table(tasks));
    workbook.insert_sheet(Sheet::from_table(meetings));

    Ok(serde_json::to_vec_pretty(&workbook)?)
}
