//! Printable per-student review notes.
//!
//! Each note is a standalone HTML page sized for A4 printing. Images are
//! referenced by their archive path (`assets/m1/7.png`), so the page renders
//! correctly when opened from the extracted note archive.

use anyhow::Result;

use reviewnote_core::selection::{NoteSection, StudentNote};
use reviewnote_core::traits::{DocumentRenderer, DocumentStyle};

use crate::html_escape;

/// Renders notes as printable HTML with a fixed [`DocumentStyle`].
#[derive(Debug, Clone, Default)]
pub struct HtmlNoteRenderer {
    style: DocumentStyle,
}

impl HtmlNoteRenderer {
    pub fn new(style: DocumentStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &DocumentStyle {
        &self.style
    }

    /// Render one note to an HTML string.
    pub fn render_html(&self, note: &StudentNote<'_>) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", html_escape(&note.stem())));
        html.push_str("<style>\n");
        html.push_str(&self.css());
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!(
            "<p class=\"note-title\">&lt;{}&gt;</p>\n",
            html_escape(&note.stem())
        ));

        for section in &note.sections {
            let listed_missing = self.style.list_missing_images && !section.missing.is_empty();
            if section.images.is_empty() && !listed_missing && !self.style.show_empty_sections {
                continue;
            }
            self.push_section(&mut html, section);
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn push_section(&self, html: &mut String, section: &NoteSection<'_>) {
        let heading = format!("<p class=\"module-heading\">&lt;{}&gt;</p>\n", section.module);
        html.push_str(&format!("<section class=\"module {}\">\n", section.module.prefix()));

        let mut images = section.images.iter();
        match images.next() {
            // The heading never ends a page on its own.
            Some(first) => {
                html.push_str("<div class=\"keep-together\">\n");
                html.push_str(&heading);
                html.push_str(&figure(first.archive_path().as_str(), section, &first.key));
                html.push_str("</div>\n");
            }
            None => html.push_str(&heading),
        }
        for image in images {
            html.push_str(&figure(image.archive_path().as_str(), section, &image.key));
        }

        if self.style.list_missing_images && !section.missing.is_empty() {
            let numbers: Vec<String> = section.missing.iter().map(u32::to_string).collect();
            html.push_str(&format!(
                "<p class=\"missing\">No image for question {}</p>\n",
                numbers.join(", ")
            ));
        }
        html.push_str("</section>\n");
    }

    fn css(&self) -> String {
        let s = &self.style;
        format!(
            "@page {{ size: A4; margin: {top}mm {side}mm {bottom}mm {side}mm; }}\n\
             body {{ font-family: {font}; font-size: {size}pt; margin: 0; }}\n\
             .note-title {{ font-weight: bold; margin: 0 0 4mm 0; }}\n\
             .module-heading {{ margin: 0 0 2mm 0; break-after: avoid; page-break-after: avoid; }}\n\
             .module {{ margin-bottom: 8mm; }}\n\
             .keep-together {{ break-inside: avoid; page-break-inside: avoid; }}\n\
             figure {{ margin: 0 0 8mm 0; break-inside: avoid; page-break-inside: avoid; }}\n\
             figure img {{ width: {width}%; height: auto; display: block; }}\n\
             .missing {{ color: #6b7280; }}\n\
             @media screen {{ body {{ max-width: 210mm; margin: 0 auto; padding: {top}mm {side}mm; }} }}\n",
            top = s.margin_top_mm,
            side = s.margin_side_mm,
            bottom = s.margin_bottom_mm,
            font = s.font_family,
            size = s.font_size_pt,
            width = s.image_width_pct.clamp(1, 100),
        )
    }
}

impl DocumentRenderer for HtmlNoteRenderer {
    fn extension(&self) -> &str {
        "html"
    }

    fn render(&self, note: &StudentNote<'_>) -> Result<Vec<u8>> {
        Ok(self.render_html(note).into_bytes())
    }
}

fn figure(path: &str, section: &NoteSection<'_>, key: &str) -> String {
    format!(
        "<figure><img src=\"{}\" alt=\"{} question {}\"></figure>\n",
        html_escape(&encode_path(path)),
        section.module,
        html_escape(key)
    )
}

/// Percent-encode the characters that break a relative URL.
fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            c => out.push(c),
        }
    }
    out
}
