//! reviewnote-report: presentation of reviewnote results.
//!
//! - [`html`]: the miss-rate statistics page
//! - [`csv`]: the miss-rate table as CSV
//! - [`xlsx`]: the miss-rate table as an Excel workbook
//! - [`note`]: printable per-student review notes

pub mod csv;
pub mod html;
pub mod note;
pub mod xlsx;

pub use note::HtmlNoteRenderer;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
