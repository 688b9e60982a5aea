use crate::engine::Fragment;
use crate::error::{Error, Result};
use crate::hash::{compute_hash, Hash};
use crate::repo::Repo;

/// write a fragment to the object store
///
/// the key is the digest of the bytes, so rewriting a known fragment is a no-op.
pub fn write_fragment(repo: &Repo, fragment: &Fragment) -> Result<()> {
    repo.store().put(&fragment.hash, &fragment.bytes)
}

/// read a fragment from the object store
pub fn read_fragment(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let bytes = repo.store().get(hash).map_err(|e| match e {
        Error::ObjectNotFound(h) => Error::FragmentNotFound(h),
        other => other,
    })?;

    // verify hash
    if compute_hash(&bytes) != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(bytes)
}

/// check if a fragment exists in the object store
pub fn fragment_exists(repo: &Repo, hash: &Hash) -> Result<bool> {
    repo.store().contains(hash)
}
