//! The `reviewnote stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Attribute, Cell, Table};

use reviewnote_core::model::Module;
use reviewnote_core::report::MissRateReport;
use reviewnote_core::statistics::out_of_range;
use reviewnote_report::csv::write_csv_report;
use reviewnote_report::html::write_html_report;
use reviewnote_report::xlsx::write_xlsx_report;

use super::{load_config, read_roster};

const FORMATS: [&str; 5] = ["table", "json", "html", "csv", "xlsx"];

pub fn execute(
    roster_path: PathBuf,
    title: Option<String>,
    question_counts: [Option<u32>; 2],
    threshold: Option<f64>,
    format: String,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path, title)?;
    let [m1, m2] = question_counts;
    if let Some(n) = m1 {
        config.questions.module1 = n;
    }
    if let Some(n) = m2 {
        config.questions.module2 = n;
    }
    if let Some(t) = threshold {
        config.report.emphasis_threshold = t;
    }
    config.validate()?;

    let formats: Vec<&str> = if format == "all" {
        FORMATS.to_vec()
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            FORMATS.contains(fmt),
            "unknown format '{fmt}' (expected table, json, html, csv, xlsx or all)"
        );
    }

    let roster = read_roster(&roster_path, &config)?;
    for module in Module::ALL {
        let total = config.questions.get(module);
        for (name, q) in out_of_range(&roster.students, module, total) {
            tracing::warn!("{name}: {module} question {q} is outside 1..={total}, not counted");
        }
    }

    let report = MissRateReport::build(&roster.students, &config.report_options());

    for fmt in &formats {
        match *fmt {
            "table" => print_table(&report),
            "json" => {
                let path = output.join("miss-rates.json");
                report.save_json(&path)?;
                eprintln!("JSON report: {}", path.display());
            }
            "html" => {
                let path = output.join("miss-rates.html");
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "csv" => {
                let path = output.join("miss-rates.csv");
                write_csv_report(&report, &path)?;
                eprintln!("CSV report: {}", path.display());
            }
            "xlsx" => {
                let path = output.join("miss-rates.xlsx");
                write_xlsx_report(&report, &path)?;
                eprintln!("Excel report: {}", path.display());
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_table(report: &MissRateReport) {
    println!("<{}>", report.title);
    for stats in &report.modules {
        println!(
            "{}: {} questions, {} of {} students attempted",
            stats.module, stats.total_questions, stats.attempted_count, report.student_count
        );
    }

    let mut table = Table::new();
    table.set_header(vec!["Question", "Miss rate (%)", "Missed"]);
    for row in report.rows() {
        let cells = vec![
            Cell::new(&row.label),
            Cell::new(report.format_pct(row.miss_rate_pct)),
            Cell::new(row.miss_count),
        ];
        let cells: Vec<Cell> = if row.emphasized {
            cells
                .into_iter()
                .map(|c| c.add_attribute(Attribute::Bold))
                .collect()
        } else {
            cells
        };
        table.add_row(cells);
    }

    println!("{table}");
}
