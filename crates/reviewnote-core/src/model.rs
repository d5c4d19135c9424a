//! Core data model types for reviewnote.
//!
//! These are the types that flow between the spreadsheet reader, the cell
//! parser, the aggregator and the document assembler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two scored sections of an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Module1,
    Module2,
}

impl Module {
    /// Both modules, in presentation order.
    pub const ALL: [Module; 2] = [Module::Module1, Module::Module2];

    /// Short prefix used in row labels ("m1-7") and bundle folder names.
    pub fn prefix(self) -> &'static str {
        match self {
            Module::Module1 => "m1",
            Module::Module2 => "m2",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Module::Module1 => 0,
            Module::Module2 => 1,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Module::Module1 => write!(f, "Module1"),
            Module::Module2 => write!(f, "Module2"),
        }
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m1" | "module1" | "1" => Ok(Module::Module1),
            "m2" | "module2" | "2" => Ok(Module::Module2),
            other => Err(format!("unknown module: {other}")),
        }
    }
}

/// A single roster cell as delivered by the spreadsheet reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    /// Text form of the cell, or `None` when the cell is absent.
    ///
    /// Integral non-negative numbers render without a fractional part so a
    /// spreadsheet that stores `7` as `7.0` still reads as question 7.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(s) => Some(s.clone()),
            RawCell::Number(n) => {
                if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 {
                    Some(format!("{}", *n as u64))
                } else {
                    Some(n.to_string())
                }
            }
        }
    }

    /// Whether the cell holds any value at all, whitespace included.
    pub fn is_present(&self) -> bool {
        !matches!(self, RawCell::Empty)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<Option<&str>> for RawCell {
    fn from(s: Option<&str>) -> Self {
        s.map(RawCell::from).unwrap_or(RawCell::Empty)
    }
}

/// Normalized form of a roster cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "questions", rename_all = "snake_case")]
pub enum ParsedAnswer {
    /// The student did not sit this module.
    NotAttempted,
    /// The student sat the module and missed nothing.
    AllCorrect,
    /// The student missed these questions, in listing order, without duplicates.
    Missed(Vec<u32>),
}

impl ParsedAnswer {
    /// Whether this answer counts towards the module's attempted total.
    pub fn is_attempted(&self) -> bool {
        !matches!(self, ParsedAnswer::NotAttempted)
    }

    /// Missed question numbers; empty for the other states.
    pub fn missed(&self) -> &[u32] {
        match self {
            ParsedAnswer::Missed(qs) => qs,
            _ => &[],
        }
    }
}

/// One parsed roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student name as written in the roster.
    pub name: String,
    pub module1: ParsedAnswer,
    pub module2: ParsedAnswer,
    /// Whether each module cell held any value at all, indexed by [`Module::index`].
    pub cells_present: [bool; 2],
}

impl StudentRecord {
    /// Build a record whose presence flags follow the parsed answers.
    pub fn new(name: impl Into<String>, module1: ParsedAnswer, module2: ParsedAnswer) -> Self {
        let cells_present = [module1.is_attempted(), module2.is_attempted()];
        Self {
            name: name.into(),
            module1,
            module2,
            cells_present,
        }
    }

    /// Select this record's answer for a module.
    pub fn answer(&self, module: Module) -> &ParsedAnswer {
        match module {
            Module::Module1 => &self.module1,
            Module::Module2 => &self.module2,
        }
    }

    pub fn cell_present(&self, module: Module) -> bool {
        self.cells_present[module.index()]
    }
}

/// A question image taken from the asset bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionImage {
    pub module: Module,
    /// Question key, the file stem inside the module folder (e.g. "7").
    pub key: String,
    /// Original file name inside the bundle (e.g. "7.png").
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl QuestionImage {
    /// Path of this image inside a generated note archive.
    pub fn archive_path(&self) -> String {
        format!("assets/{}/{}", self.module.prefix(), self.file_name)
    }
}

/// All question images, keyed by module then question key.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    images: [BTreeMap<String, QuestionImage>; 2],
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an image, replacing any earlier image with the same key.
    pub fn insert(&mut self, image: QuestionImage) -> Option<QuestionImage> {
        self.images[image.module.index()].insert(image.key.clone(), image)
    }

    pub fn get(&self, module: Module, key: &str) -> Option<&QuestionImage> {
        self.images[module.index()].get(key)
    }

    pub fn module(&self, module: Module) -> &BTreeMap<String, QuestionImage> {
        &self.images[module.index()]
    }

    pub fn len(&self) -> usize {
        self.images.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
