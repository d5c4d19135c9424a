//! Seams to the document-producing collaborators.
//!
//! The core decides *what* goes into each student's note; implementations
//! of [`DocumentRenderer`] (in `reviewnote-report`) decide how it looks.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::selection::StudentNote;

/// Turns an assembled student note into document bytes.
pub trait DocumentRenderer {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &str;

    /// Render one note.
    fn render(&self, note: &StudentNote<'_>) -> anyhow::Result<Vec<u8>>;
}

/// Immutable styling handed to a renderer at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStyle {
    /// CSS font stack.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
    #[serde(default = "default_margin_top")]
    pub margin_top_mm: f32,
    #[serde(default = "default_margin_side")]
    pub margin_side_mm: f32,
    #[serde(default = "default_margin_side")]
    pub margin_bottom_mm: f32,
    /// Image width as a share of the printable width, in percent.
    #[serde(default = "default_image_width")]
    pub image_width_pct: u32,
    /// Print a module heading even when the student missed nothing there.
    #[serde(default = "default_true")]
    pub show_empty_sections: bool,
    /// Add a line naming missed questions that have no image.
    #[serde(default)]
    pub list_missing_images: bool,
}

fn default_font_family() -> String {
    "'NanumGothic', 'Malgun Gothic', sans-serif".to_string()
}
fn default_font_size() -> f32 {
    10.0
}
fn default_margin_top() -> f32 {
    30.0
}
fn default_margin_side() -> f32 {
    25.4
}
fn default_image_width() -> u32 {
    100
}
fn default_true() -> bool {
    true
}

impl DocumentStyle {
    /// Reject values that would escape the generated `<style>` block.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_family.contains(['<', '>']) {
            return Err(ConfigError::FontFamily(self.font_family.clone()));
        }
        Ok(())
    }
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size_pt: default_font_size(),
            margin_top_mm: default_margin_top(),
            margin_side_mm: default_margin_side(),
            margin_bottom_mm: default_margin_side(),
            image_width_pct: default_image_width(),
            show_empty_sections: true,
            list_missing_images: false,
        }
    }
}
