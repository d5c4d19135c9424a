//! reviewnote-io: the input and output collaborators.
//!
//! Reads roster spreadsheets (CSV or Excel) into a [`RosterTable`], reads
//! question images from a ZIP bundle into an [`AssetBundle`], and packages
//! rendered student notes into a single ZIP archive.
//!
//! [`RosterTable`]: reviewnote_core::roster::RosterTable
//! [`AssetBundle`]: reviewnote_core::model::AssetBundle

pub mod archive;
pub mod bundle;
pub mod spreadsheet;

pub use archive::{write_note_archive, write_note_archive_to_path, ArchiveSummary};
pub use bundle::{load_bundle, read_bundle, BundleError};
pub use spreadsheet::{load_roster, read_csv};
