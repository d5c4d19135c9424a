//! Miss-rate report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Module, StudentRecord};
use crate::statistics::{aggregate, round_to, ModuleStatistics};

/// Rows at or above this miss rate (in percent) are emphasized.
pub const DEFAULT_EMPHASIS_THRESHOLD: f64 = 30.0;

/// Decimal places used when surfacing percentages.
pub const DEFAULT_DECIMALS: u32 = 1;

/// A complete miss-rate report for one exam administration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissRateReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Exam title, e.g. "August Final Mock 1".
    pub title: String,
    /// Number of parsed roster rows.
    pub student_count: usize,
    /// Module 1 statistics first, then module 2.
    pub modules: Vec<ModuleStatistics>,
    pub emphasis_threshold: f64,
    pub decimals: u32,
}

/// One row of the combined, presentation-ready table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Module-prefixed question label, e.g. `m2-14`.
    pub label: String,
    pub miss_rate_pct: f64,
    pub miss_count: u32,
    pub emphasized: bool,
}

/// Report settings that do not come from the roster.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Question count per module, indexed by [`Module::index`].
    pub total_questions: [u32; 2],
    pub emphasis_threshold: f64,
    pub decimals: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            total_questions: [22, 22],
            emphasis_threshold: DEFAULT_EMPHASIS_THRESHOLD,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl MissRateReport {
    /// Aggregate both modules of a roster.
    pub fn build(records: &[StudentRecord], options: &ReportOptions) -> Self {
        let modules = Module::ALL
            .iter()
            .map(|&m| aggregate(records, m, options.total_questions[m.index()]))
            .collect();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: options.title.clone(),
            student_count: records.len(),
            modules,
            emphasis_threshold: options.emphasis_threshold,
            decimals: options.decimals,
        }
    }

    /// Combined rows: all of module 1 in question order, then module 2.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.modules
            .iter()
            .flat_map(|stats| {
                stats.rows.iter().map(move |row| {
                    let pct = row.percent(self.decimals);
                    ReportRow {
                        label: row.label(stats.module),
                        miss_rate_pct: pct,
                        miss_count: row.miss_count,
                        emphasized: pct >= self.emphasis_threshold,
                    }
                })
            })
            .collect()
    }

    pub fn module(&self, module: Module) -> Option<&ModuleStatistics> {
        self.modules.iter().find(|m| m.module == module)
    }

    /// Format a percentage with the report's precision.
    pub fn format_pct(&self, pct: f64) -> String {
        format!("{:.*}", self.decimals as usize, round_to(pct, self.decimals))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: MissRateReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
