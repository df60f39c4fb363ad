use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::par::Par;

/// A remembered bucket: a PAR plus what the user told us about it.
///
/// Identity is `id`, allocated once at creation and stable across edits.
///  `bucket_name` is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCredential {
    pub id: Uuid,
    pub bucket_name: String,
    #[serde(rename = "bucketPAR")]
    pub bucket_par: Par,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub read_allowed: bool,
    #[serde(default)]
    pub write_allowed: bool,
    #[serde(default)]
    pub context_folder: Option<String>,
}

/// Input to [`CredentialStore::save`](super::CredentialStore::save).
///
/// With `id: None` (or an id that is not remembered) a new credential is
///  created; with a known `id` the existing entry is updated in place.
#[derive(Debug, Clone)]
pub struct SaveCredential {
    pub bucket_name: String,
    pub bucket_par: Par,
    pub label: String,
    pub description: String,
    pub read_allowed: bool,
    pub write_allowed: bool,
    pub id: Option<Uuid>,
    pub context_folder: Option<String>,
}

impl SaveCredential {
    /// A read/write credential with no label, description or context folder
    pub fn new(bucket_name: impl Into<String>, bucket_par: Par) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            bucket_par,
            label: String::new(),
            description: String::new(),
            read_allowed: true,
            write_allowed: true,
            id: None,
            context_folder: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_permissions(mut self, read_allowed: bool, write_allowed: bool) -> Self {
        self.read_allowed = read_allowed;
        self.write_allowed = write_allowed;
        self
    }

    pub fn with_context_folder(mut self, context_folder: Option<String>) -> Self {
        self.context_folder = context_folder;
        self
    }
}

impl BucketCredential {
    /// Label if one was given, otherwise the bucket name
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.bucket_name
        } else {
            &self.label
        }
    }

    // Apply the mutable fields of a save request.
    //  `id` and `bucket_name` are fixed at creation.
    pub(crate) fn apply(&mut self, update: SaveCredential) {
        self.bucket_par = update.bucket_par;
        self.label = update.label;
        self.description = update.description;
        self.read_allowed = update.read_allowed;
        self.write_allowed = update.write_allowed;
        self.context_folder = update.context_folder;
    }
}
