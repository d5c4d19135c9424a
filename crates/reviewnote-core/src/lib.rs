//! reviewnote-core: answer-cell parsing and miss-rate statistics.
//!
//! This crate defines the roster data model, the cell parser, column
//! schema resolution, the miss-rate aggregator and the per-student
//! selection rules that the rest of reviewnote builds on.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod roster;
pub mod schema;
pub mod selection;
pub mod statistics;
pub mod traits;

pub use error::{ConfigError, RosterError};
pub use model::{AssetBundle, Module, ParsedAnswer, QuestionImage, RawCell, StudentRecord};
pub use parser::parse_cell;
pub use statistics::{aggregate, ModuleStatistics, MissRateRow};
