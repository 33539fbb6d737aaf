//! BitWarden export schema and projection into credentials.
//!
//! Deserialization is the validation pass: every required field must be
//! present with the right JSON type, optional fields may be missing or
//! `null`. Unknown fields are ignored.

use crate::error::LoadError;
use crate::models::Credential;
use serde::Deserialize;
use serde_json::{Number, Value};

/// The top-level unencrypted export document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExport {
    pub encrypted: bool,
    pub folders: Vec<RawFolder>,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFolder {
    pub id: String,
    pub name: String,
}

/// A vault entry of any kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,
    pub creation_date: String,
    pub revision_date: String,
    pub name: String,
    pub notes: Option<String>,
    pub favorite: bool,
    /// Any JSON number; see [`RawItem::kind`].
    #[serde(rename = "type")]
    pub item_type: Number,
    pub reprompt: Number,
    pub deleted_date: Option<String>,
    pub organization_id: Option<String>,
    pub folder_id: Option<String>,
    pub collection_ids: Option<CollectionIds>,
    pub password_history: Option<Vec<PasswordHistoryEntry>>,
    /// Present only on login items.
    pub login: Option<RawLogin>,
}

/// Older exports write a single id, newer ones a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CollectionIds {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordHistoryEntry {
    pub password: String,
    pub last_used_date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogin {
    pub username: Option<String>,
    pub password: Option<String>,
    pub totp: Option<String>,
    pub uris: Vec<RawUri>,
    pub fido2_credentials: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUri {
    pub uri: String,
    #[serde(rename = "match")]
    pub match_rule: Option<String>,
}

/// Kind of vault item, from the numeric `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Login,
    SecureNote,
    Card,
    Identity,
    Other,
}

impl RawItem {
    pub fn kind(&self) -> ItemKind {
        // `1` and `1.0` name the same kind.
        match self.item_type.as_f64() {
            Some(n) if n == 1.0 => ItemKind::Login,
            Some(n) if n == 2.0 => ItemKind::SecureNote,
            Some(n) if n == 3.0 => ItemKind::Card,
            Some(n) if n == 4.0 => ItemKind::Identity,
            _ => ItemKind::Other,
        }
    }

    /// Project a login item into a credential; other items yield `None`.
    pub fn into_credential(self) -> Option<Credential> {
        let login = self.login?;
        Some(Credential {
            id: self.id,
            creation_date: self.creation_date,
            revision_date: self.revision_date,
            name: self.name,
            uris: login.uris.into_iter().map(|u| u.uri).collect(),
            username: login.username,
            password: login.password,
        })
    }
}

impl RawExport {
    /// Credentials for every item carrying a login, in export order.
    pub fn into_credentials(self) -> Vec<Credential> {
        let total = self.items.len();
        let mut skipped = Vec::new();
        let credentials: Vec<Credential> = self
            .items
            .into_iter()
            .filter_map(|item| {
                let kind = item.kind();
                let credential = item.into_credential();
                if credential.is_none() {
                    skipped.push(kind);
                }
                credential
            })
            .collect();

        if !skipped.is_empty() {
            tracing::debug!(
                "Skipped {} of {} items without a login: {:?}",
                skipped.len(),
                total,
                skipped
            );
        }
        credentials
    }
}

/// Check an already-parsed JSON value against the export schema.
pub fn validate(raw: &Value) -> Result<RawExport, LoadError> {
    Ok(RawExport::deserialize(raw)?)
}

/// Validate a parsed JSON value and project it into credentials.
pub fn parse_export(raw: &Value) -> Result<Vec<Credential>, LoadError> {
    Ok(validate(raw)?.into_credentials())
}

/// Parse, validate and project an export held in memory.
pub fn parse_export_slice(bytes: &[u8]) -> Result<Vec<Credential>, LoadError> {
    let export: RawExport = serde_json::from_slice(bytes)?;
    Ok(export.into_credentials())
}
