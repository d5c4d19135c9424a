//! Roster spreadsheet reader.
//!
//! CSV files go through the `csv` crate; Excel and OpenDocument workbooks
//! through `calamine`, reading the first worksheet. Either way the first
//! row is the header row.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use reviewnote_core::model::RawCell;
use reviewnote_core::roster::RosterTable;

/// Load a roster table, picking the reader from the file extension.
pub fn load_roster(path: &Path) -> Result<RosterTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open roster: {}", path.display()))?;
            read_csv(file).with_context(|| format!("failed to read CSV roster: {}", path.display()))?
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "" => anyhow::bail!("roster file has no extension: {}", path.display()),
        other => anyhow::bail!("unsupported roster format '.{other}' (expected .csv, .xlsx, .xls or .ods)"),
    };

    tracing::debug!(
        "loaded roster {} ({} columns, {} rows)",
        path.display(),
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Read a CSV roster. Empty fields become [`RawCell::Empty`].
pub fn read_csv<R: Read>(reader: R) -> Result<RosterTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {}", i + 1))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RosterTable { headers, rows })
}

fn read_workbook(path: &Path) -> Result<RosterTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("workbook has no worksheets: {}", path.display()))?
        .with_context(|| format!("failed to read first worksheet: {}", path.display()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| match c {
                Data::Empty => String::new(),
                other => other.to_string().trim().to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|row| row.iter().map(workbook_cell).collect()).collect();

    Ok(RosterTable { headers, rows })
}

fn workbook_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(s) if s.is_empty() => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        other => RawCell::Text(other.to_string()),
    }
}
