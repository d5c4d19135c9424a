//! reviewnote configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Module;
use crate::report::{ReportOptions, DEFAULT_DECIMALS, DEFAULT_EMPHASIS_THRESHOLD};
use crate::roster::{EmptyListPolicy, RosterOptions};
use crate::schema::ColumnAliases;
use crate::selection::EligibilityPolicy;
use crate::traits::DocumentStyle;

/// Largest question count accepted per module.
pub const MAX_QUESTIONS: u32 = 200;

const MAX_DECIMALS: u32 = 4;

/// Top-level reviewnote configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewnoteConfig {
    /// Exam title used in note file names and report headings.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub questions: QuestionCounts,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub document: DocumentStyle,
    /// Extra header spellings, added to the built-in aliases.
    #[serde(default)]
    pub columns: ColumnAliases,
    /// Upper bound on the uncompressed size of the question-image bundle.
    #[serde(default = "default_max_asset_bytes")]
    pub max_asset_bytes: u64,
}

/// Question count per module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCounts {
    #[serde(default = "default_questions")]
    pub module1: u32,
    #[serde(default = "default_questions")]
    pub module2: u32,
}

impl QuestionCounts {
    pub fn get(&self, module: Module) -> u32 {
        match module {
            Module::Module1 => self.module1,
            Module::Module2 => self.module2,
        }
    }
}

impl Default for QuestionCounts {
    fn default() -> Self {
        Self {
            module1: default_questions(),
            module2: default_questions(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub eligibility: EligibilityPolicy,
    #[serde(default)]
    pub empty_list: EmptyListPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Miss rate (percent) at or above which a row is emphasized.
    #[serde(default = "default_threshold")]
    pub emphasis_threshold: f64,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            emphasis_threshold: default_threshold(),
            decimals: default_decimals(),
        }
    }
}

fn default_title() -> String {
    "Mock Test".to_string()
}
fn default_questions() -> u32 {
    22
}
fn default_threshold() -> f64 {
    DEFAULT_EMPHASIS_THRESHOLD
}
fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}
fn default_max_asset_bytes() -> u64 {
    200 * 1024 * 1024
}

impl Default for ReviewnoteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            questions: QuestionCounts::default(),
            policy: PolicyConfig::default(),
            report: ReportConfig::default(),
            document: DocumentStyle::default(),
            columns: ColumnAliases::default(),
            max_asset_bytes: default_max_asset_bytes(),
        }
    }
}

impl ReviewnoteConfig {
    /// Check numeric bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for module in Module::ALL {
            let value = self.questions.get(module);
            if !(1..=MAX_QUESTIONS).contains(&value) {
                return Err(ConfigError::QuestionCount {
                    module,
                    value,
                    max: MAX_QUESTIONS,
                });
            }
        }
        let threshold = self.report.emphasis_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Threshold(threshold));
        }
        if self.report.decimals > MAX_DECIMALS {
            return Err(ConfigError::Decimals {
                value: self.report.decimals,
                max: MAX_DECIMALS,
            });
        }
        self.document.validate()
    }

    pub fn roster_options(&self) -> RosterOptions {
        RosterOptions {
            aliases: ColumnAliases::with_extra(&self.columns),
            empty_list: self.policy.empty_list,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.title.clone(),
            total_questions: [self.questions.module1, self.questions.module2],
            emphasis_threshold: self.report.emphasis_threshold,
            decimals: self.report.decimals,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `reviewnote.toml` in the current directory
/// 2. `~/.config/reviewnote/config.toml`
///
/// `REVIEWNOTE_TITLE` overrides the title.
pub fn load_config() -> Result<ReviewnoteConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ReviewnoteConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("reviewnote.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ReviewnoteConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ReviewnoteConfig::default(),
    };

    if let Ok(title) = std::env::var("REVIEWNOTE_TITLE") {
        config.title = title;
    }
    config.title = resolve_env_vars(&config.title);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("reviewnote"))
}
