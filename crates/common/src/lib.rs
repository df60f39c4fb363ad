/**
 * Remembered bucket credentials.
 *  - Named PARs with permissions and an optional context folder
 *  - Persisted wholesale on every mutation
 */
pub mod credentials;
/**
 * Durable key-value storage backing the
 *  credential store. In-memory and
 *  file-per-key implementations.
 */
pub mod kv;
/**
 * Pre-authenticated request urls and
 *  object addressing below them.
 */
pub mod par;
/**
 * The active bucket: listing, fetch and
 *  upload against one PAR, scoped to an
 *  optional context folder.
 */
pub mod session;
/**
 * Upload accounting shared across a batch
 *  of concurrent transfers.
 */
pub mod transfer;
/**
 * Flat object keys to folder/file trees.
 */
pub mod tree;

pub mod prelude {
    pub use crate::credentials::{BucketCredential, CredentialStore, SaveCredential};
    pub use crate::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
    pub use crate::par::{Par, ParError};
    pub use crate::session::{BucketSession, ParClient, SessionError, SubmitOptions};
    pub use crate::transfer::{TransferOutcome, TransferTracker};
    pub use crate::tree::{FileTree, FileTreeNode};
}
