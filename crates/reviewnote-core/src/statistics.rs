//! Per-question miss-rate aggregation.
//!
//! The miss rate of a question is the share of students who sat the module
//! and listed that question as missed:
//!
//! miss_rate(q) = miss_count(q) / attempted_count
//!
//! Students who did not sit the module are left out of the denominator.
//! Question numbers outside `1..=total_questions` are ignored.

use serde::{Deserialize, Serialize};

use crate::model::{Module, StudentRecord};

/// Miss statistics for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissRateRow {
    pub question_number: u32,
    pub miss_count: u32,
    /// Fraction in `[0, 1]`.
    pub miss_rate: f64,
}

impl MissRateRow {
    /// Miss rate as a percentage rounded to `decimals` places.
    pub fn percent(&self, decimals: u32) -> f64 {
        round_to(self.miss_rate * 100.0, decimals)
    }

    /// Module-prefixed label, e.g. `m1-7`.
    pub fn label(&self, module: Module) -> String {
        format!("{}-{}", module.prefix(), self.question_number)
    }
}

/// Round to a fixed number of decimal places, ties to even (`6.25` gives `6.2`).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Statistics for one module, one row per question in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStatistics {
    pub module: Module,
    pub total_questions: u32,
    /// Students whose answer for this module is not `NotAttempted`.
    pub attempted_count: u32,
    pub rows: Vec<MissRateRow>,
}

impl ModuleStatistics {
    pub fn row(&self, question_number: u32) -> Option<&MissRateRow> {
        question_number
            .checked_sub(1)
            .and_then(|i| self.rows.get(i as usize))
    }
}

/// Aggregate miss rates for one module.
///
/// `module` selects which answer of each record is counted. Rows always
/// cover `1..=total_questions` in ascending order.
pub fn aggregate(records: &[StudentRecord], module: Module, total_questions: u32) -> ModuleStatistics {
    let mut miss_counts = vec![0u32; total_questions as usize];
    let mut attempted_count = 0u32;

    for record in records {
        let answer = record.answer(module);
        if !answer.is_attempted() {
            continue;
        }
        attempted_count += 1;
        // Each question counts once per student.
        let mut counted: Vec<u32> = Vec::with_capacity(answer.missed().len());
        for &q in answer.missed() {
            if q == 0 || q > total_questions || counted.contains(&q) {
                continue;
            }
            counted.push(q);
            miss_counts[(q - 1) as usize] += 1;
        }
    }

    let rows = miss_counts
        .into_iter()
        .enumerate()
        .map(|(i, miss_count)| MissRateRow {
            question_number: i as u32 + 1,
            miss_count,
            miss_rate: if attempted_count > 0 {
                miss_count as f64 / attempted_count as f64
            } else {
                0.0
            },
        })
        .collect();

    ModuleStatistics {
        module,
        total_questions,
        attempted_count,
        rows,
    }
}

/// Question numbers the aggregator ignores because they fall outside `1..=total_questions`.
pub fn out_of_range(records: &[StudentRecord], module: Module, total_questions: u32) -> Vec<(String, u32)> {
    records
        .iter()
        .flat_map(|r| {
            r.answer(module)
                .missed()
                .iter()
                .filter(|&&q| q == 0 || q > total_questions)
                .map(|&q| (r.name.clone(), q))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParsedAnswer;

    fn student(name: &str, m1: ParsedAnswer) -> StudentRecord {
        StudentRecord::new(name, m1, ParsedAnswer::NotAttempted)
    }

    #[test]
    fn mixed_states() {
        let records = vec![
            student("a", ParsedAnswer::Missed(vec![1])),
            student("b", ParsedAnswer::AllCorrect),
            student("c", ParsedAnswer::NotAttempted),
        ];
        let stats = aggregate(&records, Module::Module1, 2);
        assert_eq!(stats.attempted_count, 2);
        assert_eq!(stats.rows[0].miss_count, 1);
        assert_eq!(stats.rows[1].miss_count, 0);
        assert_eq!(stats.rows[0].percent(1), 50.0);
        assert_eq!(stats.rows[1].percent(1), 0.0);
    }

    #[test]
    fn empty_roster_yields_zero_rows() {
        let stats = aggregate(&[], Module::Module2, 22);
        assert_eq!(stats.module, Module::Module2);
        assert_eq!(stats.rows.len(), 22);
        assert!(stats.rows.iter().all(|r| r.miss_count == 0 && r.miss_rate == 0.0));
    }

    #[test]
    fn nobody_attempted() {
        let records = vec![student("a", ParsedAnswer::NotAttempted)];
        let stats = aggregate(&records, Module::Module1, 1);
        assert_eq!(stats.attempted_count, 0);
        assert_eq!(stats.rows.len(), 1);
        assert_eq!(stats.rows[0].miss_rate, 0.0);
    }

    #[test]
    fn zero_questions_yields_no_rows() {
        let records = vec![student("a", ParsedAnswer::Missed(vec![1]))];
        let stats = aggregate(&records, Module::Module1, 0);
        assert!(stats.rows.is_empty());
        assert_eq!(stats.attempted_count, 1);
    }

    #[test]
    fn rows_are_ascending_regardless_of_input_order() {
        let forward = vec![
            student("a", ParsedAnswer::Missed(vec![3, 1])),
            student("b", ParsedAnswer::Missed(vec![2])),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let s1 = aggregate(&forward, Module::Module1, 3);
        let s2 = aggregate(&backward, Module::Module1, 3);
        assert_eq!(s1, s2);
        let numbers: Vec<u32> = s1.rows.iter().map(|r| r.question_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_string(&s1).unwrap(),
            serde_json::to_string(&aggregate(&forward, Module::Module1, 3)).unwrap()
        );
    }

    #[test]
    fn out_of_range_numbers_are_ignored() {
        let records = vec![student("a", ParsedAnswer::Missed(vec![0, 2, 5, 40]))];
        let stats = aggregate(&records, Module::Module1, 3);
        assert_eq!(stats.rows.len(), 3);
        assert_eq!(stats.rows.iter().map(|r| r.miss_count).sum::<u32>(), 1);
        assert_eq!(stats.row(2).unwrap().miss_count, 1);
        assert_eq!(
            out_of_range(&records, Module::Module1, 3),
            vec![("a".to_string(), 0), ("a".to_string(), 5), ("a".to_string(), 40)]
        );
    }

    #[test]
    fn hand_built_duplicates_count_once() {
        let records = vec![student("a", ParsedAnswer::Missed(vec![3, 3]))];
        let stats = aggregate(&records, Module::Module1, 3);
        assert_eq!(stats.row(3).unwrap().miss_count, 1);
        assert_eq!(stats.row(3).unwrap().percent(1), 100.0);
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        let records = vec![
            student("a", ParsedAnswer::Missed(vec![1])),
            student("b", ParsedAnswer::AllCorrect),
            student("c", ParsedAnswer::AllCorrect),
        ];
        let stats = aggregate(&records, Module::Module1, 1);
        assert_eq!(stats.rows[0].percent(1), 33.3);
        assert_eq!(stats.rows[0].percent(2), 33.33);
        assert_eq!(stats.rows[0].label(Module::Module1), "m1-1");
    }

    #[test]
    fn percent_ties_round_to_even() {
        let mut records = vec![student("a", ParsedAnswer::Missed(vec![1]))];
        records.extend((0..15).map(|i| student(&format!("s{i}"), ParsedAnswer::AllCorrect)));
        let stats = aggregate(&records, Module::Module1, 1);
        assert_eq!(stats.rows[0].percent(1), 6.2);
        assert_eq!(round_to(0.75, 1), 0.8);
        assert_eq!(round_to(12.5, 0), 12.0);
    }
}
