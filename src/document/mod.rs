//! This module handles conversion between workbook documents and the in-memory tables
//!
//! A workbook is a list of named sheets, each made of a header row and string cells, just like a spreadsheet.
//! It is stored as JSON.

mod parser;
pub use parser::parse;
mod builder;
pub use builder::build_from;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::table::Table;
use crate::traits::Record;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";


/// A set of named sheets
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Add a sheet, or replace the sheet that has the same name
    pub fn insert_sheet(&mut self, sheet: Sheet) {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Read the table stored in the sheet `R::SHEET_NAME`.
    ///
    /// Returns `None` if there is no such sheet.
    /// Rows are normalized to the schema of `R`, and rows without an ID are kept with an empty ID.
    pub fn table<R: Record>(&self) -> Option<Table<R>> {
        self.sheet(R::SHEET_NAME)
            .map(|sheet| sheet.normalized::<R>().records().collect())
    }
}


/// A named table of text cells
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: String, columns: Vec<String>) -> Self {
        Self { name, columns, rows: Vec::new() }
    }

    /// Write a table, with the fixed columns of `R`
    pub fn from_table<R: Record>(table: &Table<R>) -> Self {
        let columns = R::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut sheet = Self::new(R::SHEET_NAME.to_string(), columns);
        sheet.rows = table.iter().map(|record| record.to_row()).collect();
        sheet
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        let columns = &self.columns;
        self.rows.iter().map(move |cells| Row { columns, cells })
    }

    /// Build a record out of every row
    pub fn records<'a, R: Record + 'a>(&'a self) -> impl Iterator<Item = R> + 'a {
        self.rows().map(|row| R::from_row(&row))
    }

    /// A copy of this sheet that has exactly the columns of `R`, in order.
    /// Missing columns are filled with empty cells, extra columns are dropped.
    pub fn normalized<R: Record>(&self) -> Self {
        let columns: Vec<String> = R::COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = self.rows()
            .map(|row| columns.iter().map(|c| row.get(c).to_string()).collect())
            .collect();
        Self { name: self.name.clone(), columns, rows }
    }
}


/// A view on a sheet row, that reads cells by column name
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// The value of the cell in column `column`.
    /// This is empty in case the column or the cell does not exist.
    pub fn get(&self, column: &str) -> &'a str {
        self.columns.iter()
            .position(|c| c.trim() == column)
            .and_then(|index| self.cells.get(index))
            .map(|cell| cell.as_str())
            .unwrap_or("")
    }
}


/// The current local time, with the precision timestamps are stored with
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

pub fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string()).unwrap_or_default()
}

pub fn format_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    timestamp.map(|t| t.format(TIMESTAMP_FORMAT).to_string()).unwrap_or_default()
}

/// Parse a date cell. Full timestamps are accepted as well, since spreadsheet tools tend to turn dates into them
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(cell, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => match parse_timestamp(cell) {
            Some(timestamp) => Some(timestamp.date()),
            None => {
                log::warn!("Invalid date {:?}, ignoring it", cell);
                None
            },
        },
    }
}

pub fn parse_time(cell: &str) -> Option<NaiveTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(cell, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(cell, "%H:%M:%S"))
        .map_err(|err| log::warn!("Invalid time {:?} ({}), ignoring it", cell, err))
        .ok()
}

pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(cell, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(cell, DATE_FORMAT).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}
