//! Per-student selection for review-note generation.
//!
//! Decides which students get a note and which question images go into it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{AssetBundle, Module, ParsedAnswer, QuestionImage, StudentRecord};

/// Which students receive a review note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityPolicy {
    /// Both modules parsed as attempted.
    #[default]
    BothAttempted,
    /// Both module cells hold some value, even whitespace.
    BothPresent,
    /// At least one module lists a missed question.
    AnyMissed,
}

impl fmt::Display for EligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityPolicy::BothAttempted => write!(f, "both-attempted"),
            EligibilityPolicy::BothPresent => write!(f, "both-present"),
            EligibilityPolicy::AnyMissed => write!(f, "any-missed"),
        }
    }
}

impl FromStr for EligibilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "both-attempted" => Ok(EligibilityPolicy::BothAttempted),
            "both-present" => Ok(EligibilityPolicy::BothPresent),
            "any-missed" => Ok(EligibilityPolicy::AnyMissed),
            other => Err(format!(
                "unknown eligibility policy: {other} (expected both-attempted, both-present or any-missed)"
            )),
        }
    }
}

/// Whether a student receives a review note under the given policy.
pub fn is_eligible(record: &StudentRecord, policy: EligibilityPolicy) -> bool {
    match policy {
        EligibilityPolicy::BothAttempted => Module::ALL
            .iter()
            .all(|&m| record.answer(m).is_attempted()),
        EligibilityPolicy::BothPresent => Module::ALL.iter().all(|&m| record.cell_present(m)),
        EligibilityPolicy::AnyMissed => Module::ALL
            .iter()
            .any(|&m| !record.answer(m).missed().is_empty()),
    }
}

/// Pick the images for a module answer by exact question-number key.
///
/// Returns the images in listing order and the numbers that had no image.
pub fn select_assets<'a>(
    answer: &ParsedAnswer,
    module: Module,
    bundle: &'a AssetBundle,
) -> (Vec<&'a QuestionImage>, Vec<u32>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for &q in answer.missed() {
        match bundle.get(module, &q.to_string()) {
            Some(image) => found.push(image),
            None => missing.push(q),
        }
    }
    (found, missing)
}

/// One module section of a student's note.
#[derive(Debug, Clone)]
pub struct NoteSection<'a> {
    pub module: Module,
    pub images: Vec<&'a QuestionImage>,
    /// Missed questions for which the bundle has no image.
    pub missing: Vec<u32>,
}

/// Everything a renderer needs to produce one student's document.
#[derive(Debug, Clone)]
pub struct StudentNote<'a> {
    pub name: String,
    pub title: String,
    pub sections: Vec<NoteSection<'a>>,
}

impl StudentNote<'_> {
    /// Document stem, `{name}_{title}`.
    pub fn stem(&self) -> String {
        format!("{}_{}", self.name, self.title)
    }

    pub fn image_count(&self) -> usize {
        self.sections.iter().map(|s| s.images.len()).sum()
    }
}

/// Assemble one student's note.
pub fn build_note<'a>(record: &StudentRecord, title: &str, bundle: &'a AssetBundle) -> StudentNote<'a> {
    let sections = Module::ALL
        .iter()
        .map(|&module| {
            let (images, missing) = select_assets(record.answer(module), module, bundle);
            NoteSection {
                module,
                images,
                missing,
            }
        })
        .collect();
    StudentNote {
        name: record.name.clone(),
        title: title.to_string(),
        sections,
    }
}

/// Assemble notes for every eligible student, in roster order.
pub fn build_notes<'a>(
    records: &[StudentRecord],
    title: &str,
    bundle: &'a AssetBundle,
    policy: EligibilityPolicy,
) -> Vec<StudentNote<'a>> {
    records
        .iter()
        .filter(|r| {
            let eligible = is_eligible(r, policy);
            if !eligible {
                tracing::debug!("no note for {} under {policy}", r.name);
            }
            eligible
        })
        .map(|r| build_note(r, title, bundle))
        .collect()
}
