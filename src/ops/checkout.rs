use std::path::Path;

use crate::engine::reconstruct;
use crate::error::{Error, Result};
use crate::fs::{modification_time_if_exists, set_modification_time, write_file_atomic};
use crate::hash::Hash;
use crate::object::{read_commit, read_fragment, resolve_revision};
use crate::pointers::read_pointer;
use crate::repo::Repo;

/// checkout options
#[derive(Clone, Debug, Default)]
pub struct CheckoutOptions {
    /// overwrite the working file even if it has unsaved changes
    pub force: bool,
}

/// rewrite a working file with the content of a historical commit
///
/// the pointer is left where it is; only the working file changes. its
/// modification time is set to the one recorded in the commit, so checking
/// out the newest commit leaves the file clean. returns the resolved hash.
pub fn checkout(repo: &Repo, path: &Path, prefix: &str, opts: CheckoutOptions) -> Result<Hash> {
    let tracked = repo.tracked_path(path)?;

    let commit_hash = resolve_revision(repo, prefix)?;

    if opts.force {
        tracing::warn!(path = %tracked, "forced checkout, local changes may be lost");
    } else {
        ensure_saved(repo, path, &tracked)?;
    }

    let commit = read_commit(repo, &commit_hash)?;
    let content = reconstruct(&commit.root, commit.kind, |hash: &Hash| {
        read_fragment(repo, hash)
    })?;

    write_file_atomic(path, &content)?;
    set_modification_time(path, commit.mtime)?;

    tracing::info!(path = %tracked, commit = %commit_hash, "checked out");
    Ok(commit_hash)
}

/// fail unless the working file matches the newest commit's mtime
///
/// a missing working file has nothing to lose.
fn ensure_saved(repo: &Repo, path: &Path, tracked: &str) -> Result<()> {
    let Some(current) = modification_time_if_exists(path)? else {
        return Ok(());
    };

    let head = read_pointer(repo, tracked)?.ok_or_else(|| Error::NoMatchingPath(tracked.to_string()))?;
    let latest = read_commit(repo, &head)?;

    if latest.mtime != current {
        return Err(Error::UnsavedChanges(path.to_path_buf()));
    }
    Ok(())
}
