//! Core models and analysis for bwlens.
//!
//! This crate validates BitWarden JSON exports, projects them into
//! credential records and derives the sorted and password-reuse views
//! used by the terminal frontend.

pub mod analysis;
pub mod error;
pub mod export;
pub mod models;
pub mod session;

pub use analysis::{
    group_by_password, reverse, sort_by, sort_by_reuse, sort_by_revision_date, sort_with,
    PasswordGroups, SortField,
};
pub use error::LoadError;
pub use export::{parse_export, parse_export_slice, validate, RawExport};
pub use models::{Credential, CredentialSummary};
pub use session::{Session, SortOrder};
