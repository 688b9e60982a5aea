use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::store::{ObjectStore, PointerStore};

/// in-memory store
///
/// intended for tests and embedding. contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<Hash, Vec<u8>>>,
    pointers: RwLock<BTreeMap<String, Hash>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of stored blobs
    pub fn len(&self) -> usize {
        read(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// mutations are single inserts, so a poisoned map is still consistent
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &Hash, bytes: &[u8]) -> Result<()> {
        let mut map = write(&self.objects);
        map.entry(*key).or_insert_with(|| bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &Hash) -> Result<Vec<u8>> {
        let map = read(&self.objects);
        map.get(key).cloned().ok_or(Error::ObjectNotFound(*key))
    }

    fn contains(&self, key: &Hash) -> Result<bool> {
        Ok(read(&self.objects).contains_key(key))
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<Hash>> {
        let map = read(&self.objects);
        Ok(map.keys().filter(|k| k.matches_prefix(prefix)).copied().collect())
    }
}

impl PointerStore for MemoryStore {
    fn read_pointer(&self, path: &str) -> Result<Option<Hash>> {
        Ok(read(&self.pointers).get(path).copied())
    }

    fn write_pointer(&self, path: &str, commit: &Hash) -> Result<()> {
        write(&self.pointers).insert(path.to_string(), *commit);
        Ok(())
    }

    fn pointers(&self) -> Result<Vec<String>> {
        Ok(read(&self.pointers).keys().cloned().collect())
    }
}
