//! A module to parse workbook documents

use serde::Deserialize;
use serde_json::Value;

use crate::document::{Sheet, Workbook};
use crate::error::{Result, TrackerError};

#[derive(Deserialize)]
struct RawWorkbook {
    sheets: Vec<RawSheet>,
}

#[derive(Deserialize)]
struct RawSheet {
    name: String,
    #[serde(default)]
    columns: Vec<Value>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}


/// Parse a document into a [`Workbook`].
///
/// Every row is padded or truncated to the width of its header. Cells that are not strings are converted to text.
/// This only fails when the content is not a workbook at all.
pub fn parse(content: &[u8]) -> Result<Workbook> {
    let raw: RawWorkbook = serde_json::from_slice(content)
        .map_err(|err| TrackerError::Schema(format!("Unable to parse workbook: {}", err)))?;

    let mut workbook = Workbook::new();
    for raw_sheet in raw.sheets {
        if workbook.sheet(&raw_sheet.name).is_some() {
            log::warn!("Duplicate sheet {:?}, ignoring all but the first one", raw_sheet.name);
            continue;
        }

        let columns: Vec<String> = raw_sheet.columns.iter().map(cell_to_string).collect();
        let width = columns.len();
        let rows = raw_sheet.rows.iter()
            .map(|raw_row| {
                let mut row: Vec<String> = raw_row.iter().take(width).map(cell_to_string).collect();
                row.resize(width, String::new());
                row
            })
            .collect();

        workbook.sheets.push(Sheet { name: raw_sheet.name, columns, rows });
    }

    Ok(workbook)
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
