//! User document model.
//!
//! [`User`] is the stored shape: `{_id, name?, email?}`. Optional fields are
//! skipped when absent so they never reach the collection as `null`.
//! [`UserPatch`] carries the writable fields for inserts and partial updates.

use bson::oid::ObjectId;
use bson::Document;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// A user document as persisted in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier. Never changes after insert.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Hex form of the identifier, as exposed to clients.
    pub fn id_hex(&self) -> String {
        self.id.to_hex()
    }
}

/// Writable user fields. `None` means "leave alone" on update and "omit" on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self { name, email }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// True when the patch would not change any field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Build the BSON document holding only the present fields.
    ///
    /// Used both as the insert body and as the `$set` operand of an update.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(name) = &self.name {
            doc.insert("name", name.as_str());
        }
        if let Some(email) = &self.email {
            doc.insert("email", email.as_str());
        }
        doc
    }

    /// Overwrite the present fields on `user`, leaving the rest untouched.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
    }

    /// Materialize a new user under `id` from this patch.
    pub fn into_user(self, id: ObjectId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Parse a client-supplied hex identifier.
pub fn parse_user_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}
