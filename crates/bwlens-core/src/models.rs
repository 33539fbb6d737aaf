//! Shared data types for the application.

use chrono::{DateTime, FixedOffset};

/// A validated login record projected from an export item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: String,
    /// RFC 3339 timestamp, copied verbatim from the export.
    pub creation_date: String,
    /// RFC 3339 timestamp, copied verbatim from the export.
    pub revision_date: String,
    pub name: String,
    /// Bare URIs in export order; match rules are dropped.
    pub uris: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credential {
    /// Parsed revision timestamp, if the export carried a valid one.
    pub fn revised_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.revision_date).ok()
    }

    /// Parsed creation timestamp, if the export carried a valid one.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.creation_date).ok()
    }

    /// The password, treating an empty string as no password.
    pub fn usable_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            username: self.username.clone(),
        }
    }
}

/// The part of a credential listed in a reuse group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSummary {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
}
