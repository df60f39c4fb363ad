//! Path tree construction
//!
//! Converts the flat object keys returned by a bucket listing into a
//! hierarchical folder/file tree:
//!
//! - **[`FileTree`]**: the built tree plus the flat set of distinct folder paths
//! - **[`Folder`]** / **[`File`]**: the owned nodes of the tree
//! - **[`ScopedKey`]**: a key paired with its context-relative path
//! - **[`FileTreeNode`]**: ordered, serializable projection for presentation
//!
//! ```text
//! ["docs/readme.txt", "docs/img/logo.png", "other.txt"]
//!
//!   (root)
//!     +-- docs/
//!     |     +-- img/
//!     |     |     +-- logo.png
//!     |     +-- readme.txt
//!     +-- other.txt
//! ```
//!
//! Building is pure and order independent. Scoping to a context folder is a
//! separate filter-then-strip step ([`scope_keys`]) applied before building.

mod builder;
mod node;
mod projection;
mod scope;

pub use builder::FileTree;
pub use node::{File, Folder, TreeNode};
pub use projection::{FileTreeNode, NodeType};
pub use scope::{normalize_context_folder, qualify, scope_keys, strip_context, ScopedKey};
