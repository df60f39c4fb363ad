use std::fmt::{Debug, Display};

use uuid::Uuid;

use super::credential::{BucketCredential, SaveCredential};
use crate::kv::KeyValueStore;
use crate::tree::normalize_context_folder;

/// Fixed storage key for the remembered-bucket snapshot
pub const REMEMBERED_BUCKETS_KEY: &str = "rememberedBuckets";

#[derive(thiserror::Error, Debug)]
pub enum CredentialStoreError<T: Display + Debug> {
    #[error("unhandled storage error: {0}")]
    Storage(T),
    #[error("failed to serialize remembered buckets: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The set of remembered bucket credentials.
///
/// Loaded once from durable storage, then written back wholesale after
///  every mutation. In-memory state only changes once the write succeeded.
#[derive(Debug)]
pub struct CredentialStore<S: KeyValueStore> {
    storage: S,
    remembered: Vec<BucketCredential>,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Read the persisted snapshot.
    ///
    /// Absent or corrupt storage yields an empty set, never an error.
    pub fn load(storage: S) -> Self {
        let remembered = match storage.get(REMEMBERED_BUCKETS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<BucketCredential>>(&raw) {
                Ok(remembered) => remembered,
                Err(e) => {
                    tracing::warn!("discarding corrupt remembered buckets: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read remembered buckets: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("loaded {} remembered bucket(s)", remembered.len());

        Self {
            storage,
            remembered,
        }
    }

    pub fn remembered(&self) -> &[BucketCredential] {
        &self.remembered
    }

    pub fn get(&self, id: Uuid) -> Option<&BucketCredential> {
        self.remembered.iter().find(|c| c.id == id)
    }

    /// First credential with the given bucket name
    pub fn find_by_name(&self, bucket_name: &str) -> Option<&BucketCredential> {
        self.remembered.iter().find(|c| c.bucket_name == bucket_name)
    }

    /// Resolve either a credential id or a bucket name
    pub fn resolve(&self, id_or_name: &str) -> Option<&BucketCredential> {
        match Uuid::parse_str(id_or_name) {
            Ok(id) => self.get(id),
            Err(_) => self.find_by_name(id_or_name),
        }
    }

    /// Create or update a credential and persist the full set.
    ///
    /// A known `id` updates that entry in place (the id and bucket name are
    ///  kept); anything else appends a new entry under a freshly allocated id.
    pub fn save(
        &mut self,
        mut request: SaveCredential,
    ) -> Result<BucketCredential, CredentialStoreError<S::Error>> {
        request.context_folder = request
            .context_folder
            .as_deref()
            .and_then(normalize_context_folder);

        let mut next = self.remembered.clone();
        let existing = request
            .id
            .and_then(|id| next.iter_mut().find(|c| c.id == id));

        let saved = match existing {
            Some(credential) => {
                credential.apply(request);
                tracing::info!("updated remembered bucket {}", credential.id);
                credential.clone()
            }
            None => {
                let credential = BucketCredential {
                    id: Uuid::new_v4(),
                    bucket_name: request.bucket_name,
                    bucket_par: request.bucket_par,
                    label: request.label,
                    description: request.description,
                    read_allowed: request.read_allowed,
                    write_allowed: request.write_allowed,
                    context_folder: request.context_folder,
                };
                tracing::info!(
                    "remembered new bucket {} ({})",
                    credential.bucket_name,
                    credential.id
                );
                next.push(credential.clone());
                credential
            }
        };

        self.persist(&next)?;
        self.remembered = next;
        Ok(saved)
    }

    /// Forget every credential with the given bucket name.
    ///
    /// NOTE: this matches on `bucket_name`, not `id`, so it drops all
    ///  credentials sharing the name. Returns how many were removed.
    pub fn remove(&mut self, bucket_name: &str) -> Result<usize, CredentialStoreError<S::Error>> {
        let next: Vec<_> = self
            .remembered
            .iter()
            .filter(|c| c.bucket_name != bucket_name)
            .cloned()
            .collect();
        let removed = self.remembered.len() - next.len();
        if removed > 1 {
            tracing::warn!(
                "removing {} credentials that share bucket name {}",
                removed,
                bucket_name
            );
        }

        self.persist(&next)?;
        self.remembered = next;
        Ok(removed)
    }

    fn persist(&self, snapshot: &[BucketCredential]) -> Result<(), CredentialStoreError<S::Error>> {
        let raw = serde_json::to_string(snapshot)?;
        self.storage
            .set(REMEMBERED_BUCKETS_KEY, &raw)
            .map_err(CredentialStoreError::Storage)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kv::MemoryKeyValueStore;
    use crate::par::Par;

    fn par(bucket: &str) -> Par {
        Par::parse(&format!(
            "https://objectstorage.example.com/p/token/n/ns/b/{}/o/",
            bucket
        ))
        .unwrap()
    }

    #[test]
    fn test_round_trip_across_restart() {
        let storage = MemoryKeyValueStore::new();
        let mut store = CredentialStore::load(storage.clone());

        let saved = store
            .save(
                SaveCredential::new("photos", par("photos"))
                    .with_label("Family photos")
                    .with_description("shared with grandma")
                    .with_permissions(true, false)
                    .with_context_folder(Some("/2024/".to_string())),
            )
            .unwrap();
        assert_eq!(saved.context_folder.as_deref(), Some("2024"));

        let reloaded = CredentialStore::load(storage);
        assert_eq!(reloaded.remembered(), &[saved.clone()]);
        assert_eq!(reloaded.get(saved.id), Some(&saved));
    }

    #[test]
    fn test_resave_updates_in_place() {
        let mut store = CredentialStore::load(MemoryKeyValueStore::new());
        let first = store.save(SaveCredential::new("docs", par("docs"))).unwrap();

        let updated = store
            .save(
                SaveCredential::new("renamed", par("docs2"))
                    .with_id(first.id)
                    .with_label("Docs"),
            )
            .unwrap();

        assert_eq!(store.remembered().len(), 1);
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.bucket_name, "docs");
        assert_eq!(updated.bucket_par, par("docs2"));
        assert_eq!(updated.label, "Docs");
    }

    #[test]
    fn test_unknown_id_allocates_new() {
        let mut store = CredentialStore::load(MemoryKeyValueStore::new());
        let stray = Uuid::new_v4();
        let saved = store
            .save(SaveCredential::new("docs", par("docs")).with_id(stray))
            .unwrap();

        assert_ne!(saved.id, stray);
        assert_eq!(store.remembered().len(), 1);
    }

    #[test]
    fn test_remove_by_name_drops_all_matches() {
        let storage = MemoryKeyValueStore::new();
        let mut store = CredentialStore::load(storage.clone());
        store.save(SaveCredential::new("shared", par("a"))).unwrap();
        store.save(SaveCredential::new("shared", par("b"))).unwrap();
        let kept = store.save(SaveCredential::new("other", par("c"))).unwrap();

        assert_eq!(store.remove("shared").unwrap(), 2);
        assert_eq!(store.remove("missing").unwrap(), 0);

        let reloaded = CredentialStore::load(storage);
        assert!(reloaded.find_by_name("shared").is_none());
        assert_eq!(reloaded.remembered(), &[kept]);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = MemoryKeyValueStore::new();
        storage.set(REMEMBERED_BUCKETS_KEY, "{not json").unwrap();

        let store = CredentialStore::load(storage);
        assert!(store.remembered().is_empty());
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let mut store = CredentialStore::load(MemoryKeyValueStore::new());
        let saved = store.save(SaveCredential::new("docs", par("docs"))).unwrap();

        assert_eq!(store.resolve("docs").map(|c| c.id), Some(saved.id));
        assert_eq!(
            store.resolve(&saved.id.to_string()).map(|c| c.id),
            Some(saved.id)
        );
        assert!(store.resolve("nope").is_none());
    }

    #[test]
    fn test_persisted_field_names() {
        let storage = MemoryKeyValueStore::new();
        let mut store = CredentialStore::load(storage.clone());
        store.save(SaveCredential::new("docs", par("docs"))).unwrap();

        let raw = storage.get(REMEMBERED_BUCKETS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["bucketName"], "docs");
        assert!(json[0]["bucketPAR"].as_str().unwrap().ends_with("/b/docs/o/"));
        assert_eq!(json[0]["readAllowed"], true);
        assert!(json[0]["contextFolder"].is_null());
    }
}
