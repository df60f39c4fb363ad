//! Remembered bucket credentials
//!
//! A [`CredentialStore`] keeps named PARs across sessions. It is plain CRUD
//! over a list keyed by id, persisted through an injected
//! [`KeyValueStore`](crate::kv::KeyValueStore) so it can be exercised
//! without a real storage backend.

mod credential;
mod store;

pub use credential::{BucketCredential, SaveCredential};
pub use store::{CredentialStore, CredentialStoreError, REMEMBERED_BUCKETS_KEY};
