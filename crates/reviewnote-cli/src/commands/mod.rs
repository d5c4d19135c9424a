pub mod init;
pub mod notes;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use reviewnote_core::config::{load_config_from, ReviewnoteConfig};
use reviewnote_core::parser::format_questions;
use reviewnote_core::roster::{parse_roster, ParsedRoster};
use reviewnote_io::load_roster;

/// Load config and apply the title override.
pub(crate) fn load_config(path: Option<PathBuf>, title: Option<String>) -> Result<ReviewnoteConfig> {
    let mut config = load_config_from(path.as_deref())?;
    if let Some(title) = title {
        config.title = title;
    }
    anyhow::ensure!(!config.title.trim().is_empty(), "title must not be empty");
    Ok(config)
}

/// Read and parse a roster with the configured column aliases and policies.
pub(crate) fn read_roster(path: &Path, config: &ReviewnoteConfig) -> Result<ParsedRoster> {
    let table = load_roster(path)?;
    parse_roster(&table, &config.roster_options())
        .with_context(|| format!("failed to parse roster: {}", path.display()))
}

/// Ascending comma-joined question numbers, or a dash.
pub(crate) fn question_list(numbers: &[u32]) -> String {
    if numbers.is_empty() {
        "-".to_string()
    } else {
        format_questions(numbers)
    }
}
