//! Roster parsing: a raw table in, student records out.
//!
//! The column schema is resolved once, before any row is read, so a table
//! with an unrecognized layout fails as a whole instead of half-way through.

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::model::{Module, ParsedAnswer, RawCell, StudentRecord};
use crate::parser::parse_cell_detailed;
use crate::schema::{resolve_columns, ColumnAliases};

/// A spreadsheet as delivered by the reader: one header row, then data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RosterTable {
    /// Build a table from text cells; empty strings become [`RawCell::Empty`].
    pub fn from_text_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|c| if c.is_empty() { RawCell::Empty } else { RawCell::from(*c) })
                        .collect()
                })
                .collect(),
        }
    }
}

/// How to treat a list cell in which no token is a valid question number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyListPolicy {
    /// Keep it as an attempted module with no misses, and warn.
    #[default]
    AllCorrect,
    /// Refuse the roster.
    Reject,
}

/// Options for [`parse_roster`].
#[derive(Debug, Clone, Default)]
pub struct RosterOptions {
    pub aliases: ColumnAliases,
    pub empty_list: EmptyListPolicy,
}

/// A recoverable oddity found while parsing a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterWarning {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub name: String,
    pub message: String,
}

/// Parsed students plus the warnings collected on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedRoster {
    pub students: Vec<StudentRecord>,
    pub warnings: Vec<RosterWarning>,
}

impl ParsedRoster {
    /// Number of students who sat the given module.
    pub fn attempted(&self, module: Module) -> usize {
        self.students
            .iter()
            .filter(|s| s.answer(module).is_attempted())
            .count()
    }
}

/// Parse a roster table into student records.
pub fn parse_roster(table: &RosterTable, options: &RosterOptions) -> Result<ParsedRoster, RosterError> {
    if table.headers.is_empty() {
        return Err(RosterError::EmptyTable);
    }
    let columns = resolve_columns(&table.headers, &options.aliases)?;

    let mut roster = ParsedRoster::default();
    let empty = RawCell::Empty;

    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        let cell = |col: usize| row.get(col).unwrap_or(&empty);

        if row.iter().all(|c| !c.is_present() || c.to_text().is_some_and(|t| t.trim().is_empty())) {
            tracing::debug!("skipping blank row {row_number}");
            continue;
        }

        let name = match cell(columns.name).to_text() {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => {
                let fallback = format!("row {row_number}");
                roster.warnings.push(RosterWarning {
                    row: row_number,
                    name: fallback.clone(),
                    message: "name is empty".into(),
                });
                fallback
            }
        };

        let mut answers = [ParsedAnswer::NotAttempted, ParsedAnswer::NotAttempted];
        let mut cells_present = [false; 2];
        for module in Module::ALL {
            let raw = cell(columns.module(module));
            cells_present[module.index()] = raw.is_present();
            let parsed = parse_cell_detailed(raw);

            for token in &parsed.dropped_tokens {
                roster.warnings.push(RosterWarning {
                    row: row_number,
                    name: name.clone(),
                    message: format!("{module}: ignored '{token}', not a question number"),
                });
            }
            for q in &parsed.duplicates {
                roster.warnings.push(RosterWarning {
                    row: row_number,
                    name: name.clone(),
                    message: format!("{module}: question {q} listed more than once"),
                });
            }
            if parsed.is_empty_list() {
                let cell_text = raw.to_text().unwrap_or_default();
                match options.empty_list {
                    EmptyListPolicy::Reject => {
                        return Err(RosterError::NoValidQuestions {
                            row: row_number,
                            name,
                            module,
                            cell: cell_text,
                        });
                    }
                    EmptyListPolicy::AllCorrect => roster.warnings.push(RosterWarning {
                        row: row_number,
                        name: name.clone(),
                        message: format!(
                            "{module}: '{}' has no valid question numbers, counted as all correct",
                            cell_text.trim()
                        ),
                    }),
                }
            }
            answers[module.index()] = parsed.answer;
        }

        let [module1, module2] = answers;
        roster.students.push(StudentRecord {
            name,
            module1,
            module2,
            cells_present,
        });
    }

    for w in &roster.warnings {
        tracing::warn!("row {} ({}): {}", w.row, w.name, w.message);
    }

    Ok(roster)
}
