use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::credentials::BucketCredential;
use crate::par::Par;
use crate::transfer::{TransferTracker, UploadErrorRecord};
use crate::tree::{
    normalize_context_folder, qualify, scope_keys, strip_context, FileTree, FileTreeNode,
};

use super::client::{ObjectSummary, ParClient};
use super::error::SessionError;
use super::status::{SessionState, SessionStatus};

/// Where and how [`BucketSession::submit_blob`] writes
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Upload through this PAR instead of the active one
    pub target_par: Option<Par>,
    /// Prefix the object name with the current context folder
    pub include_context_folder: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            target_par: None,
            include_context_folder: true,
        }
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    par: Option<Par>,
    context_folder: Option<String>,
    // listing records in scope at the time they were listed
    objects: Vec<ObjectSummary>,
    // tree relative to `context_folder` at the time it was listed
    tree: FileTree,
    // listings currently awaiting a response
    in_flight: usize,
    // bumped whenever the PAR or the context folder changes, so a
    //  listing started under the old scope is never applied to the new one
    epoch: u64,
    generation: u64,
    last_error: Option<String>,
}

impl SessionInner {
    fn status(&self) -> SessionStatus {
        let stale = self.last_error.is_some();
        let state = if self.par.is_none() {
            SessionState::NoPar { stale: false }
        } else if self.in_flight > 0 {
            SessionState::Listing
        } else if self.generation == 0 {
            SessionState::NoPar { stale }
        } else {
            SessionState::Ready { stale }
        };
        SessionStatus {
            state,
            generation: self.generation,
            last_error: self.last_error.clone(),
        }
    }
}

struct Shared {
    inner: Mutex<SessionInner>,
    status: watch::Sender<SessionStatus>,
    client: ParClient,
}

/// The active bucket: one PAR, an optional context folder, and the file
///  tree from its most recent successful listing.
///
/// Cheap to clone; clones share the same session. Operations that trigger
///  a background refresh (`set_par`, a successful `submit_blob`) must be
///  called from within a tokio runtime.
#[derive(Clone)]
pub struct BucketSession(Arc<Shared>);

impl std::fmt::Debug for BucketSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.inner.lock();
        f.debug_struct("BucketSession")
            .field("has_par", &inner.par.is_some())
            .field("context_folder", &inner.context_folder)
            .field("objects", &inner.objects.len())
            .field("generation", &inner.generation)
            .finish()
    }
}

impl BucketSession {
    pub fn new(client: ParClient) -> Self {
        let (status, _) = watch::channel(SessionStatus::default());
        Self(Arc::new(Shared {
            inner: Mutex::new(SessionInner::default()),
            status,
            client,
        }))
    }

    /// Watch the session state. Completion of a background refresh is
    ///  observed here, never through a return value.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.0.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.0.inner.lock().status()
    }

    pub fn par(&self) -> Option<Par> {
        self.0.inner.lock().par.clone()
    }

    pub fn context_folder(&self) -> Option<String> {
        self.0.inner.lock().context_folder.clone()
    }

    /// Replace the active PAR and kick off a refresh.
    ///
    /// The session reads `Listing` as soon as this returns. The previous
    ///  tree is kept until the new listing succeeds.
    pub fn set_par(&self, par: Par) {
        let claimed = {
            let mut inner = self.0.inner.lock();
            inner.par = Some(par);
            inner.epoch += 1;
            inner.last_error = None;
            self.claim_listing(&mut inner)
        };
        if let Ok(claimed) = claimed {
            self.spawn_listing(claimed);
        }
    }

    /// Scope the session to a sub-folder, or clear the scope with `None`.
    ///
    /// Does not re-list: call [`refresh`](Self::refresh) to see the new scope.
    pub fn set_context_folder(&self, context_folder: Option<&str>) {
        let mut inner = self.0.inner.lock();
        inner.context_folder = context_folder.and_then(normalize_context_folder);
        inner.epoch += 1;
    }

    /// Make a remembered credential the active bucket
    pub fn activate(&self, credential: &BucketCredential) {
        tracing::info!("activating bucket {}", credential.display_name());
        self.set_context_folder(credential.context_folder.as_deref());
        self.set_par(credential.bucket_par.clone());
    }

    /// List the whole bucket and rebuild the tree for the current scope.
    ///
    /// On failure the previous tree is left untouched. A listing whose PAR
    ///  or scope was replaced while it was in flight is dropped, and so is
    ///  one whose future is dropped before it settles.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let claimed = {
            let mut inner = self.0.inner.lock();
            self.claim_listing(&mut inner)?
        };
        self.run_listing(claimed).await
    }

    // Take a listing slot under the same lock that captures the scope,
    //  so observers see `Listing` before any request goes out
    fn claim_listing(
        &self,
        inner: &mut SessionInner,
    ) -> Result<(ListingSlot, ListingScope), SessionError> {
        let par = inner.par.clone().ok_or(SessionError::NoPar)?;
        inner.in_flight += 1;
        self.publish(inner);
        let scope = ListingScope {
            par,
            context_folder: inner.context_folder.clone(),
            epoch: inner.epoch,
        };
        Ok((ListingSlot::new(self.clone()), scope))
    }

    async fn run_listing(
        &self,
        (slot, scope): (ListingSlot, ListingScope),
    ) -> Result<(), SessionError> {
        let result = self.0.client.list(&scope.par).await;

        let mut inner = self.0.inner.lock();
        slot.settle(&mut inner);
        let outcome = match result {
            Ok(_) if inner.epoch != scope.epoch => {
                tracing::debug!("dropping superseded listing");
                Ok(())
            }
            Ok(listing) => {
                if listing.next_start_with.is_some() {
                    tracing::warn!(
                        "listing truncated after {} objects",
                        listing.objects.len()
                    );
                }
                let context_folder = scope.context_folder.as_deref();
                let keys = listing.objects.iter().map(|o| o.name.as_str());
                let tree = FileTree::from_scoped(scope_keys(keys, context_folder));
                tracing::debug!(
                    "listed {} objects, {} in scope",
                    listing.objects.len(),
                    tree.file_count()
                );
                inner.tree = tree;
                inner.objects = listing
                    .objects
                    .into_iter()
                    .filter(|o| in_scope(&o.name, context_folder))
                    .collect();
                inner.generation += 1;
                inner.last_error = None;
                Ok(())
            }
            Err(e) if inner.epoch != scope.epoch => {
                tracing::debug!("dropping superseded listing failure: {}", e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("listing failed: {}", e);
                inner.last_error = Some(e.to_string());
                Err(SessionError::Listing(e))
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Fetch an object by its scope-relative name
    pub async fn get_file(&self, filename: &str) -> Result<Bytes, SessionError> {
        let (par, name) = {
            let inner = self.0.inner.lock();
            let par = inner.par.clone().ok_or(SessionError::NoPar)?;
            (par, qualify(inner.context_folder.as_deref(), filename))
        };

        self.0
            .client
            .get(par.object_url(&name))
            .await
            .map_err(|source| SessionError::Fetch { name, source })
    }

    /// Upload `blob` as `filename`, overwriting whatever is there.
    ///
    /// The outcome is recorded into `tracker` either way. Success also
    ///  triggers a background refresh; failure does not.
    pub async fn submit_blob(
        &self,
        blob: Bytes,
        filename: &str,
        tracker: &TransferTracker,
        options: SubmitOptions,
    ) -> Result<(), SessionError> {
        let (par, name) = {
            let inner = self.0.inner.lock();
            let par = options.target_par.or_else(|| inner.par.clone());
            let context_folder = if options.include_context_folder {
                inner.context_folder.as_deref()
            } else {
                None
            };
            (par, qualify(context_folder, filename))
        };

        let Some(par) = par else {
            tracker.record_failure(UploadErrorRecord {
                object_name: name,
                status: None,
                detail: SessionError::NoPar.to_string(),
            });
            return Err(SessionError::NoPar);
        };

        let size = blob.len() as u64;
        let content_type = mime_guess::from_path(&name).first_or_octet_stream();
        match self
            .0
            .client
            .put(par.object_url(&name), blob, content_type.essence_str())
            .await
        {
            Ok(()) => {
                tracker.record_success(size);
                tracing::info!("uploaded {} ({} bytes)", name, size);
                self.spawn_refresh();
                Ok(())
            }
            Err(source) => {
                tracing::warn!("upload of {} failed: {}", name, source);
                tracker.record_failure(UploadErrorRecord {
                    object_name: name.clone(),
                    status: source.status().map(|s| s.as_u16()),
                    detail: source.detail(),
                });
                Err(SessionError::Upload { name, source })
            }
        }
    }

    /// Presentation-ready projection of the current tree
    pub fn get_files_tree(&self) -> Vec<FileTreeNode> {
        self.0.inner.lock().tree.to_nodes()
    }

    /// The current tree, relative to the context folder
    pub fn tree(&self) -> FileTree {
        self.0.inner.lock().tree.clone()
    }

    /// Every folder path of the current tree, sorted
    pub fn folders_in_bucket(&self) -> Vec<String> {
        self.0
            .inner
            .lock()
            .tree
            .folder_paths()
            .iter()
            .cloned()
            .collect()
    }

    /// Listing records of the objects in scope, under their full object keys
    pub fn objects(&self) -> Vec<ObjectSummary> {
        self.0.inner.lock().objects.clone()
    }

    fn publish(&self, inner: &SessionInner) {
        self.0.status.send_replace(inner.status());
    }

    // Fire-and-forget: failures are logged and published by `run_listing`
    fn spawn_refresh(&self) {
        let claimed = {
            let mut inner = self.0.inner.lock();
            self.claim_listing(&mut inner)
        };
        if let Ok(claimed) = claimed {
            self.spawn_listing(claimed);
        }
    }

    // The lock must not be held here: without a runtime the slot is
    //  released on the spot
    fn spawn_listing(&self, claimed: (ListingSlot, ListingScope)) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available, refresh not scheduled");
            return;
        };
        let session = self.clone();
        handle.spawn(async move {
            let _ = session.run_listing(claimed).await;
        });
    }
}

fn in_scope(key: &str, context_folder: Option<&str>) -> bool {
    match context_folder {
        Some(context) => strip_context(key, context).is_some(),
        None => true,
    }
}

// What a listing was started against
struct ListingScope {
    par: Par,
    context_folder: Option<String>,
    epoch: u64,
}

// One unit of `in_flight`. Settled under the session lock when the
//  listing completes; if the owning future is dropped first, the slot
//  gives its unit back and republishes.
struct ListingSlot {
    session: BucketSession,
    settled: bool,
}

impl ListingSlot {
    fn new(session: BucketSession) -> Self {
        Self {
            session,
            settled: false,
        }
    }

    fn settle(mut self, inner: &mut SessionInner) {
        inner.in_flight = inner.in_flight.saturating_sub(1);
        self.settled = true;
    }
}

impl Drop for ListingSlot {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.session.0.inner.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        self.session.publish(&inner);
    }
}
