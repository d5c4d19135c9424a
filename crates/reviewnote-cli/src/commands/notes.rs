//! The `reviewnote notes` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use reviewnote_core::model::Module;
use reviewnote_core::selection::{build_notes, EligibilityPolicy, StudentNote};
use reviewnote_io::{load_bundle, write_note_archive_to_path};
use reviewnote_report::HtmlNoteRenderer;

use super::{load_config, question_list, read_roster};

pub fn execute(
    roster_path: PathBuf,
    assets_path: PathBuf,
    title: Option<String>,
    output: PathBuf,
    eligibility: Option<EligibilityPolicy>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path, title)?;
    config.document.validate()?;
    let policy = eligibility.unwrap_or(config.policy.eligibility);

    let roster = read_roster(&roster_path, &config)?;
    let bundle = load_bundle(&assets_path, config.max_asset_bytes)?;

    let notes = build_notes(&roster.students, &config.title, &bundle, policy);
    let skipped = roster.students.len() - notes.len();
    if notes.is_empty() {
        tracing::warn!("no student is eligible for a note under {policy}");
    }

    let renderer = HtmlNoteRenderer::new(config.document.clone());
    let summary = write_note_archive_to_path(&output, &notes, &renderer)?;

    print_summary(&notes);
    println!(
        "Wrote {} notes ({} images) to {}",
        summary.documents.len(),
        summary.images,
        output.display()
    );
    if skipped > 0 {
        println!("{skipped} student(s) skipped under {policy}.");
    }

    Ok(())
}

fn print_summary(notes: &[StudentNote<'_>]) {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Module1", "Module2", "Images", "No image"]);

    for note in notes {
        let section = |module: Module| note.sections.iter().find(|s| s.module == module);
        let listed = |module: Module| {
            section(module)
                .map(|s| {
                    let mut numbers: Vec<u32> = s
                        .images
                        .iter()
                        .filter_map(|image| image.key.parse().ok())
                        .collect();
                    numbers.extend(&s.missing);
                    question_list(&numbers)
                })
                .unwrap_or_else(|| "-".to_string())
        };
        let missing: Vec<String> = note
            .sections
            .iter()
            .flat_map(|s| s.missing.iter().map(move |q| format!("{}-{q}", s.module.prefix())))
            .collect();

        table.add_row(vec![
            Cell::new(&note.name),
            Cell::new(listed(Module::Module1)),
            Cell::new(listed(Module::Module2)),
            Cell::new(note.image_count()),
            Cell::new(if missing.is_empty() {
                "-".to_string()
            } else {
                missing.join(", ")
            }),
        ]);
    }

    println!("{table}");
}
