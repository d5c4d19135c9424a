//! HTML statistics report.
//!
//! Produces a self-contained HTML page with all CSS inlined, one table row
//! per question label. Rows at or above the emphasis threshold are bold and
//! larger.

use anyhow::Result;
use std::path::Path;

use reviewnote_core::model::Module;
use reviewnote_core::report::MissRateReport;

use crate::html_escape;

/// Generate an HTML page from a miss-rate report.
pub fn generate_html(report: &MissRateReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} miss rates</title>\n",
        html_escape(&report.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>&lt;{}&gt;</h1>\n", html_escape(&report.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} students | {} | emphasis at {}% and above</p>\n",
        report.student_count,
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
        report.format_pct(report.emphasis_threshold)
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"modules\">\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Module</th><th>Questions</th><th>Attempted</th></tr></thead>\n<tbody>\n");
    for module in Module::ALL {
        if let Some(stats) = report.module(module) {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                module, stats.total_questions, stats.attempted_count
            ));
        }
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"rates\">\n");
    html.push_str("<table class=\"rates\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Miss rate (%)</th><th>Missed</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in report.rows() {
        let class = if row.emphasized { " class=\"emphasized\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            html_escape(&row.label),
            report.format_pct(row.miss_rate_pct),
            row.miss_count
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &MissRateReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --hot: #fde2e2; }
body { font-family: 'NanumGothic', 'Malgun Gothic', -apple-system, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 0; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; min-width: 24rem; }
th, td { border: 1px solid var(--border); padding: 0.4rem 1rem; text-align: left; }
th { background: var(--border); }
td:nth-child(2), td:nth-child(3) { text-align: right; }
tr.emphasized td { font-weight: bold; font-size: 15pt; background: var(--hot); }
@media print { body { padding: 0; } tr { break-inside: avoid; } }
"#;
