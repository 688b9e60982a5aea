//! storage backends
//!
//! a backend is two things: an immutable blob namespace keyed by content
//! hash, and a small mutable table mapping tracked paths to their latest
//! commit. the backend is chosen when a [`Repo`](crate::Repo) is built.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::hash::Hash;

/// content-addressed blob storage
///
/// fragments and commits share one namespace. the store never interprets
/// blob contents; callers guarantee `key == digest(bytes)`.
pub trait ObjectStore: Send + Sync {
    /// store a blob; writing an existing key is a no-op
    fn put(&self, key: &Hash, bytes: &[u8]) -> Result<()>;

    /// fetch a blob, failing with `ObjectNotFound` if absent
    fn get(&self, key: &Hash) -> Result<Vec<u8>>;

    fn contains(&self, key: &Hash) -> Result<bool>;

    /// all keys whose hex form starts with `prefix`, sorted
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<Hash>>;
}

/// per-path pointers to the newest commit
///
/// pointers are overwritten in place and never historized; history lives
/// in the commit chain.
pub trait PointerStore: Send + Sync {
    fn read_pointer(&self, path: &str) -> Result<Option<Hash>>;

    fn write_pointer(&self, path: &str, commit: &Hash) -> Result<()>;

    /// every tracked path, sorted
    fn pointers(&self) -> Result<Vec<String>>;
}

/// a complete backend
pub trait Store: ObjectStore + PointerStore {}

impl<T: ObjectStore + PointerStore> Store for T {}
