//! The `reviewnote validate` command.

use std::path::PathBuf;

use anyhow::Result;

use reviewnote_core::model::Module;
use reviewnote_core::roster::parse_roster;
use reviewnote_core::schema::{resolve_columns, Field};
use reviewnote_core::statistics::out_of_range;
use reviewnote_io::load_roster;

use super::load_config;

pub fn execute(roster_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path, None)?;
    let options = config.roster_options();

    let table = load_roster(&roster_path)?;
    let columns = resolve_columns(&table.headers, &options.aliases)?;
    println!("Roster: {} ({} rows)", roster_path.display(), table.rows.len());
    for field in Field::ALL {
        println!("  {field} column: '{}'", table.headers[columns.get(field)]);
    }

    let roster = parse_roster(&table, &options)?;
    println!(
        "Students: {} (Module1 attempted: {}, Module2 attempted: {})",
        roster.students.len(),
        roster.attempted(Module::Module1),
        roster.attempted(Module::Module2)
    );

    let mut total_warnings = 0;
    for w in &roster.warnings {
        println!("  [row {} {}] WARNING: {}", w.row, w.name, w.message);
        total_warnings += 1;
    }
    for module in Module::ALL {
        let total = config.questions.get(module);
        for (name, q) in out_of_range(&roster.students, module, total) {
            println!("  [{name}] WARNING: {module} question {q} is outside 1..={total}");
            total_warnings += 1;
        }
    }

    if total_warnings == 0 {
        println!("Roster valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
