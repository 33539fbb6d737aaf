//! Derived views over a credential list.
//!
//! Every function here is pure: it takes the current sequence and returns a
//! new one. All sorts are stable, so equal keys keep their prior order.

use crate::models::{Credential, CredentialSummary};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Text fields a credential list can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Username,
    Password,
}

impl SortField {
    fn key(self, credential: &Credential) -> Option<&str> {
        match self {
            SortField::Name => Some(credential.name.as_str()),
            SortField::Username => credential.username.as_deref(),
            SortField::Password => credential.password.as_deref(),
        }
    }
}

/// Collation order: base letters ignoring accents and case first, then
/// accents, then case, then the exact text.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

/// Present values first, ordered by `compare_text`; absent values last.
fn compare_present_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_text(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of a copy of `credentials` with a caller-supplied comparator.
pub fn sort_with<F>(credentials: &[Credential], compare: F) -> Vec<Credential>
where
    F: FnMut(&Credential, &Credential) -> Ordering,
{
    let mut sorted = credentials.to_vec();
    sorted.sort_by(compare);
    sorted
}

/// Ascending by `field`; credentials without a value go last.
pub fn sort_by(credentials: &[Credential], field: SortField) -> Vec<Credential> {
    sort_with(credentials, |a, b| {
        compare_present_first(field.key(a), field.key(b))
    })
}

/// Most recently revised first. Unparseable timestamps go last.
pub fn sort_by_revision_date(credentials: &[Credential]) -> Vec<Credential> {
    let mut keyed: Vec<_> = credentials.iter().map(|c| (c.revised_at(), c)).collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, c)| c.clone()).collect()
}

/// The same records in exactly the opposite order.
pub fn reverse(credentials: &[Credential]) -> Vec<Credential> {
    credentials.iter().rev().cloned().collect()
}

/// Reverse index from password to every credential using it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordGroups {
    groups: BTreeMap<String, Vec<CredentialSummary>>,
}

impl PasswordGroups {
    /// Build the index from scratch. Credentials without a password are left out.
    pub fn build(credentials: &[Credential]) -> Self {
        let mut groups: BTreeMap<String, Vec<CredentialSummary>> = BTreeMap::new();
        for credential in credentials {
            if let Some(password) = credential.usable_password() {
                groups
                    .entry(password.to_string())
                    .or_default()
                    .push(credential.summary());
            }
        }
        Self { groups }
    }

    pub fn get(&self, password: &str) -> Option<&[CredentialSummary]> {
        self.groups.get(password).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CredentialSummary])> {
        self.groups
            .iter()
            .map(|(password, members)| (password.as_str(), members.as_slice()))
    }

    /// Groups shared by two or more credentials.
    pub fn reused(&self) -> impl Iterator<Item = (&str, &[CredentialSummary])> {
        self.iter().filter(|(_, members)| members.len() > 1)
    }

    pub fn is_reused(&self, password: &str) -> bool {
        self.groups
            .get(password)
            .is_some_and(|members| members.len() > 1)
    }

    pub fn reused_count(&self) -> usize {
        self.reused().count()
    }

    /// Number of distinct passwords.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group_by_password(credentials: &[Credential]) -> PasswordGroups {
    PasswordGroups::build(credentials)
}

/// Reused passwords first, then unique or missing ones; each part ordered by password.
pub fn sort_by_reuse(credentials: &[Credential], groups: &PasswordGroups) -> Vec<Credential> {
    let shared = |c: &Credential| c.password.as_deref().is_some_and(|p| groups.is_reused(p));
    sort_with(credentials, |a, b| {
        shared(b).cmp(&shared(a)).then_with(|| {
            compare_text(
                a.password.as_deref().unwrap_or(""),
                b.password.as_deref().unwrap_or(""),
            )
        })
    })
}
