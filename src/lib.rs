//! vecoh - element-level version control for html and xml
//!
//! tracks individual files like a per-file git, but stores them one element
//! at a time: every element is hashed as its own fragment, so unchanged
//! subtrees are shared between revisions and between files.
//!
//! # Core concepts
//!
//! - **Fragment**: one element serialized with its tail text, its child
//!   elements replaced by placeholders naming their hashes
//! - **Commit**: root fragment hash, parent commit, file mtime, document kind
//!   and message, as five newline-joined fields
//! - **Pointer**: per tracked path, the hash of its newest commit
//!
//! # Hash format
//!
//! every blob is stored under SHA256(bytes). a placeholder is an empty
//! element named `sha256_<hex>`.
//!
//! # Example usage
//!
//! ```no_run
//! use vecoh::{ops, Repo};
//! use std::path::Path;
//!
//! // initialize a repository
//! let repo = Repo::init(Path::new("/path/to/site")).unwrap();
//!
//! // save a file
//! let hash = ops::save(&repo, Path::new("/path/to/site/index.html"), None, "first").unwrap();
//!
//! // restore it later
//! ops::checkout(
//!     &repo,
//!     Path::new("/path/to/site/index.html"),
//!     &hash.to_hex()[..8],
//!     ops::CheckoutOptions::default(),
//! )
//! .unwrap();
//! ```

mod config;
mod error;
mod hash;
mod object;
mod pointers;
mod repo;

pub mod document;
pub mod engine;
pub mod fs;
pub mod ops;
pub mod store;
pub mod types;

pub use config::{Config, DocumentConfig};
pub use error::{Error, Result};
pub use hash::{compute_hash, Hash};
pub use object::{
    fragment_exists, read_commit, read_fragment, resolve_revision, write_commit, write_fragment,
};
pub use pointers::{
    is_tracked, list_pointers, list_pointers_matching, read_pointer, require_pointer,
    write_pointer,
};
pub use repo::{Repo, RepoLock, MARKER_DIR};
pub use types::{Commit, DocumentKind, Mtime};
