//! Excel workbook of the miss-rate table.
//!
//! Row 1 holds the bracketed title merged across the three columns, row 2
//! the bold centred headers, then one row per question. Rows at or above the
//! emphasis threshold are bold at 15pt.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use reviewnote_core::report::MissRateReport;

pub const SHEET_NAME: &str = "Miss rates";

const HEADERS: [&str; 3] = ["Question", "Miss rate (%)", "Miss count"];
const EMPHASIS_FONT_SIZE: u32 = 15;

/// Build the workbook in memory.
pub fn build_workbook(report: &MissRateReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let title = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let pct_pattern = pct_number_format(report.decimals);
    let plain = Format::new();
    let plain_pct = Format::new().set_num_format(&pct_pattern);
    let hot = Format::new().set_bold().set_font_size(EMPHASIS_FONT_SIZE);
    let hot_pct = hot.clone().set_num_format(&pct_pattern);

    sheet.merge_range(0, 0, 0, 2, &format!("<{}>", report.title), &title)?;
    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(1, col as u16, *name, &header)?;
    }

    for (i, row) in report.rows().iter().enumerate() {
        let r = i as u32 + 2;
        let (text, pct) = if row.emphasized {
            (&hot, &hot_pct)
        } else {
            (&plain, &plain_pct)
        };
        sheet.write_string_with_format(r, 0, &row.label, text)?;
        sheet.write_number_with_format(r, 1, row.miss_rate_pct, pct)?;
        sheet.write_number_with_format(r, 2, row.miss_count, text)?;
    }

    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 12)?;
    Ok(workbook)
}

/// Write the workbook to a file.
pub fn write_xlsx_report(report: &MissRateReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut workbook = build_workbook(report)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn pct_number_format(decimals: u32) -> String {
    if decimals == 0 {
        "0".to_string()
    } else {
        format!("0.{}", "0".repeat(decimals as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use reviewnote_core::model::{ParsedAnswer, StudentRecord};
    use reviewnote_core::report::ReportOptions;

    fn sample_report() -> MissRateReport {
        let records = vec![
            StudentRecord::new("hong", ParsedAnswer::Missed(vec![2]), ParsedAnswer::Missed(vec![1])),
            StudentRecord::new("kim", ParsedAnswer::AllCorrect, ParsedAnswer::NotAttempted),
            StudentRecord::new("lee", ParsedAnswer::Missed(vec![2]), ParsedAnswer::NotAttempted),
        ];
        MissRateReport::build(
            &records,
            &ReportOptions {
                title: "Mock 1".into(),
                total_questions: [2, 1],
                ..Default::default()
            },
        )
    }

    #[test]
    fn number_formats_follow_decimals() {
        assert_eq!(pct_number_format(0), "0");
        assert_eq!(pct_number_format(1), "0.0");
        assert_eq!(pct_number_format(3), "0.000");
    }

    #[test]
    fn workbook_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("miss-rates.xlsx");
        write_xlsx_report(&sample_report(), &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("<Mock 1>".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Miss rate (%)".into())));
        assert_eq!(range.get_value((3, 0)), Some(&Data::String("m1-2".into())));
        assert_eq!(range.get_value((3, 1)), Some(&Data::Float(66.7)));
        assert_eq!(range.get_value((3, 2)), Some(&Data::Float(2.0)));
        assert_eq!(range.get_value((4, 0)), Some(&Data::String("m2-1".into())));
        assert_eq!(range.get_value((4, 1)), Some(&Data::Float(100.0)));
        assert_eq!(range.height(), 5);
    }
}
