//! Answer-cell parser.
//!
//! Turns a raw roster cell into a [`ParsedAnswer`]:
//!
//! - absent or blank cell: [`ParsedAnswer::NotAttempted`]
//! - `X` (any case): [`ParsedAnswer::AllCorrect`]
//! - anything else: a list of question numbers separated by `,`, `，` or `;`
//!
//! Full-width and other common Unicode decimal digits count as digits.
//! Parsing is total. Tokens that are not plain decimal numbers are dropped
//! and reported through [`CellParse::dropped_tokens`], never as an error.

use std::collections::HashSet;

use crate::model::{ParsedAnswer, RawCell};

/// Marker for "attempted, nothing missed".
pub const ALL_CORRECT_MARKER: &str = "X";

/// Characters accepted as list separators besides `,`.
const ALTERNATE_SEPARATORS: [char; 2] = ['，', ';'];

/// A parsed cell plus what was discarded on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellParse {
    pub answer: ParsedAnswer,
    /// Tokens that were not plain decimal numbers (or overflowed `u32`).
    pub dropped_tokens: Vec<String>,
    /// Question numbers listed more than once; counted once.
    pub duplicates: Vec<u32>,
}

impl CellParse {
    fn clean(answer: ParsedAnswer) -> Self {
        Self {
            answer,
            dropped_tokens: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// True when the cell had text but yielded no question number at all.
    pub fn is_empty_list(&self) -> bool {
        matches!(&self.answer, ParsedAnswer::Missed(qs) if qs.is_empty())
    }
}

/// Parse a roster cell.
pub fn parse_cell(cell: &RawCell) -> ParsedAnswer {
    parse_cell_detailed(cell).answer
}

/// Parse a roster cell, keeping diagnostics about discarded tokens.
pub fn parse_cell_detailed(cell: &RawCell) -> CellParse {
    let Some(text) = cell.to_text() else {
        return CellParse::clean(ParsedAnswer::NotAttempted);
    };
    let text = text.trim();
    if text.is_empty() {
        return CellParse::clean(ParsedAnswer::NotAttempted);
    }
    if text.eq_ignore_ascii_case(ALL_CORRECT_MARKER) {
        return CellParse::clean(ParsedAnswer::AllCorrect);
    }

    let normalized: String = text
        .chars()
        .map(|c| if ALTERNATE_SEPARATORS.contains(&c) { ',' } else { c })
        .collect();

    let mut seen = HashSet::new();
    let mut questions = Vec::new();
    let mut dropped_tokens = Vec::new();
    let mut duplicates = Vec::new();

    for token in normalized.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_question_number(token) {
            Some(q) if seen.insert(q) => questions.push(q),
            Some(q) => duplicates.push(q),
            None => dropped_tokens.push(token.to_string()),
        }
    }

    CellParse {
        answer: ParsedAnswer::Missed(questions),
        dropped_tokens,
        duplicates,
    }
}

/// Zero code points of the decimal digit runs accepted besides ASCII.
/// Full-width digits come from East Asian input methods.
const DIGIT_ZEROS: [char; 4] = ['\u{FF10}', '\u{0660}', '\u{06F0}', '\u{0966}'];

fn decimal_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    DIGIT_ZEROS.iter().find_map(|&zero| {
        let offset = (c as u32).checked_sub(zero as u32)?;
        (offset < 10).then(|| char::from(b'0' + offset as u8))
    })
}

fn parse_question_number(token: &str) -> Option<u32> {
    let ascii: String = token.chars().map(decimal_digit).collect::<Option<_>>()?;
    ascii.parse().ok()
}

/// Render question numbers back into cell text, ascending.
pub fn format_questions(questions: &[u32]) -> String {
    let mut sorted = questions.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn blank_and_missing_are_not_attempted() {
        assert_eq!(parse_cell(&RawCell::Empty), ParsedAnswer::NotAttempted);
        assert_eq!(parse_cell(&text("")), ParsedAnswer::NotAttempted);
        assert_eq!(parse_cell(&text("   \t")), ParsedAnswer::NotAttempted);
    }

    #[test]
    fn marker_is_case_insensitive() {
        assert_eq!(parse_cell(&text("X")), ParsedAnswer::AllCorrect);
        assert_eq!(parse_cell(&text("x")), ParsedAnswer::AllCorrect);
        assert_eq!(parse_cell(&text("  x ")), ParsedAnswer::AllCorrect);
    }

    #[test]
    fn comma_list() {
        assert_eq!(parse_cell(&text("1,3,5")), ParsedAnswer::Missed(vec![1, 3, 5]));
        assert_eq!(parse_cell(&text("1, 3 ,5")), ParsedAnswer::Missed(vec![1, 3, 5]));
    }

    #[test]
    fn alternate_separators() {
        assert_eq!(parse_cell(&text("2;4")), ParsedAnswer::Missed(vec![2, 4]));
        assert_eq!(parse_cell(&text("2，4, 6")), ParsedAnswer::Missed(vec![2, 4, 6]));
        assert_eq!(parse_cell(&text("2,,4,")), ParsedAnswer::Missed(vec![2, 4]));
    }

    #[test]
    fn malformed_tokens_are_dropped() {
        let parsed = parse_cell_detailed(&text("1,a,5"));
        assert_eq!(parsed.answer, ParsedAnswer::Missed(vec![1, 5]));
        assert_eq!(parsed.dropped_tokens, vec!["a".to_string()]);

        let parsed = parse_cell_detailed(&text("-3, 4.0, 99999999999"));
        assert_eq!(parsed.answer, ParsedAnswer::Missed(vec![]));
        assert_eq!(parsed.dropped_tokens.len(), 3);
        assert!(parsed.is_empty_list());
    }

    #[test]
    fn duplicates_count_once() {
        let parsed = parse_cell_detailed(&text("3,3,1,3"));
        assert_eq!(parsed.answer, ParsedAnswer::Missed(vec![3, 1]));
        assert_eq!(parsed.duplicates, vec![3, 3]);
    }

    #[test]
    fn numeric_cells() {
        assert_eq!(parse_cell(&RawCell::Number(7.0)), ParsedAnswer::Missed(vec![7]));
        assert_eq!(parse_cell(&RawCell::Number(0.0)), ParsedAnswer::Missed(vec![0]));
        assert_eq!(parse_cell(&RawCell::Number(2.5)), ParsedAnswer::Missed(vec![]));
        assert_eq!(parse_cell(&RawCell::Number(f64::NAN)), ParsedAnswer::Missed(vec![]));
    }

    #[test]
    fn total_over_odd_inputs() {
        for input in ["XX", "x,1", "，", ";;;", "🙂", "X X", "0", "①"] {
            let parsed = parse_cell(&text(input));
            assert!(parsed.is_attempted(), "{input:?} should be attempted");
        }
    }

    #[test]
    fn full_width_digits_count() {
        assert_eq!(parse_cell(&text("１２")), ParsedAnswer::Missed(vec![12]));
        assert_eq!(parse_cell(&text("１２, 3")), ParsedAnswer::Missed(vec![12, 3]));
        assert_eq!(parse_cell(&text("1２;٤")), ParsedAnswer::Missed(vec![12, 4]));

        let parsed = parse_cell_detailed(&text("12, １２"));
        assert_eq!(parsed.answer, ParsedAnswer::Missed(vec![12]));
        assert_eq!(parsed.duplicates, vec![12]);
    }

    #[test]
    fn format_then_parse_roundtrip() {
        let original = parse_cell(&text("9; 2, 14，5"));
        let rendered = format_questions(original.missed());
        assert_eq!(rendered, "2,5,9,14");
        let reparsed = parse_cell(&text(&rendered));
        let mut expected = original.missed().to_vec();
        expected.sort_unstable();
        assert_eq!(reparsed.missed(), expected.as_slice());
    }
}
