//! CSV export of the miss-rate table.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use reviewnote_core::report::MissRateReport;

/// Write the combined rows as `question,miss_rate_pct,miss_count`.
pub fn write_csv<W: Write>(report: &MissRateReport, writer: W) -> Result<()> {
    let mut writer = ::csv::Writer::from_writer(writer);
    writer.write_record(["question", "miss_rate_pct", "miss_count"])?;
    for row in report.rows() {
        writer.write_record([
            row.label,
            report.format_pct(row.miss_rate_pct),
            row.miss_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the CSV report to a file.
pub fn write_csv_report(report: &MissRateReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(report, file).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewnote_core::model::{ParsedAnswer, StudentRecord};
    use reviewnote_core::report::ReportOptions;

    #[test]
    fn csv_rows_follow_label_order() {
        let records = vec![
            StudentRecord::new("hong", ParsedAnswer::Missed(vec![2]), ParsedAnswer::Missed(vec![1])),
            StudentRecord::new("kim", ParsedAnswer::AllCorrect, ParsedAnswer::NotAttempted),
            StudentRecord::new("lee", ParsedAnswer::Missed(vec![2]), ParsedAnswer::NotAttempted),
        ];
        let report = MissRateReport::build(
            &records,
            &ReportOptions {
                title: "T".into(),
                total_questions: [2, 1],
                ..Default::default()
            },
        );

        let mut out = Vec::new();
        write_csv(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "question,miss_rate_pct,miss_count\nm1-1,0.0,0\nm1-2,66.7,2\nm2-1,100.0,1\n"
        );
    }

    #[test]
    fn write_to_file() {
        let report = MissRateReport::build(&[], &ReportOptions::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miss-rates.csv");
        write_csv_report(&report, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("question,miss_rate_pct,miss_count\nm1-1,0.0,0\n"));
        assert_eq!(text.lines().count(), 45);
    }
}
