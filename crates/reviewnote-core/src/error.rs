//! Roster and configuration error types.
//!
//! Cell-level problems never surface here: malformed tokens and
//! out-of-range question numbers are recovered where they occur. These
//! errors describe a roster or configuration that cannot be processed at all.

use thiserror::Error;

use crate::model::Module;
use crate::schema::Field;

/// Errors that stop a roster from being processed.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The table has no header row.
    #[error("roster is empty: no header row found")]
    EmptyTable,

    /// No header matched any accepted spelling of a required field.
    #[error("missing required column '{field}' (accepted: {}; found: {})", .accepted.join(", "), .found.join(", "))]
    MissingColumn {
        field: Field,
        accepted: Vec<String>,
        found: Vec<String>,
    },

    /// A non-empty cell held no valid question number and the roster is strict about it.
    #[error("row {row} ({name}): {module} cell '{cell}' contains no valid question numbers")]
    NoValidQuestions {
        row: usize,
        name: String,
        module: Module,
        cell: String,
    },
}

/// Errors in a loaded configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{module} question count must be between 1 and {max}, got {value}")]
    QuestionCount { module: Module, value: u32, max: u32 },

    #[error("emphasis threshold must be between 0 and 100, got {0}")]
    Threshold(f64),

    #[error("decimal places must be at most {max}, got {value}")]
    Decimals { value: u32, max: u32 },

    #[error("document font family must not contain '<' or '>', got '{0}'")]
    FontFamily(String),
}
