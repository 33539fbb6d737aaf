//! Application state shared by frontends.
//!
//! A `Session` owns the current credential order and the reuse index built
//! from it. Loads replace both only when they succeed.

use crate::analysis::{self, PasswordGroups, SortField};
use crate::error::LoadError;
use crate::export;
use crate::models::Credential;
use std::path::Path;

/// The ordering most recently applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Export order.
    #[default]
    Loaded,
    Name,
    Username,
    Password,
    RevisionDate,
    Reuse,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Loaded => "export order",
            SortOrder::Name => "name",
            SortOrder::Username => "username",
            SortOrder::Password => "password",
            SortOrder::RevisionDate => "last updated",
            SortOrder::Reuse => "reused passwords",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Vec<Credential>,
    groups: PasswordGroups,
    order: SortOrder,
    reversed: bool,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn groups(&self) -> &PasswordGroups {
        &self.groups
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Whether `reverse` has been applied an odd number of times since the last sort.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Read and load an export file. Returns the number of credentials loaded.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            tracing::debug!("Rejected non-JSON file: {}", path.display());
            return Err(LoadError::NotJson {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| {
            tracing::debug!("Failed to read {}: {}", path.display(), source);
            LoadError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let count = self.load_bytes(&bytes)?;
        tracing::debug!("Loaded {} credentials from {}", count, path.display());
        Ok(count)
    }

    /// Load an export from memory. Returns the number of credentials loaded.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<usize, LoadError> {
        let credentials = export::parse_export_slice(bytes).inspect_err(|e| {
            tracing::debug!("Rejected export: {}", e);
        })?;
        self.replace(credentials);
        Ok(self.credentials.len())
    }

    fn replace(&mut self, credentials: Vec<Credential>) {
        self.groups = PasswordGroups::build(&credentials);
        self.credentials = credentials;
        self.order = SortOrder::Loaded;
        self.reversed = false;
        tracing::debug!(
            "Indexed {} distinct passwords, {} reused",
            self.groups.len(),
            self.groups.reused_count()
        );
    }

    fn apply(&mut self, order: SortOrder, sorted: Vec<Credential>) {
        tracing::debug!("Sorted {} credentials by {}", sorted.len(), order.label());
        self.credentials = sorted;
        self.order = order;
        self.reversed = false;
    }

    pub fn sort_by_name(&mut self) {
        let sorted = analysis::sort_by(&self.credentials, SortField::Name);
        self.apply(SortOrder::Name, sorted);
    }

    pub fn sort_by_username(&mut self) {
        let sorted = analysis::sort_by(&self.credentials, SortField::Username);
        self.apply(SortOrder::Username, sorted);
    }

    pub fn sort_by_password(&mut self) {
        let sorted = analysis::sort_by(&self.credentials, SortField::Password);
        self.apply(SortOrder::Password, sorted);
    }

    pub fn sort_by_revision_date(&mut self) {
        let sorted = analysis::sort_by_revision_date(&self.credentials);
        self.apply(SortOrder::RevisionDate, sorted);
    }

    /// Bring reused passwords to the top. Does nothing before the first load.
    pub fn sort_by_reuse(&mut self) {
        if self.credentials.is_empty() {
            return;
        }
        let sorted = analysis::sort_by_reuse(&self.credentials, &self.groups);
        self.apply(SortOrder::Reuse, sorted);
    }

    pub fn reverse(&mut self) {
        self.credentials = analysis::reverse(&self.credentials);
        self.reversed = !self.reversed;
        tracing::debug!("Reversed {} credentials", self.credentials.len());
    }

    /// Whether this credential's password is shared with another one.
    pub fn is_reused(&self, credential: &Credential) -> bool {
        credential
            .usable_password()
            .is_some_and(|p| self.groups.is_reused(p))
    }
}
