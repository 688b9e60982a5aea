use std::path::Path;

use crate::document::Document;
use crate::engine::decompose;
use crate::error::{Error, Result};
use crate::fs::{modification_time, read_file};
use crate::hash::Hash;
use crate::object::{write_commit, write_fragment};
use crate::pointers::{read_pointer, write_pointer};
use crate::repo::Repo;
use crate::types::{Commit, DocumentKind};

/// save the current content of a working file as a new commit
///
/// fragments and the commit blob are written before the pointer moves, so
/// a failure part way through leaves only unreferenced blobs behind.
pub fn save(
    repo: &Repo,
    path: &Path,
    kind_override: Option<DocumentKind>,
    message: &str,
) -> Result<Hash> {
    let _lock = repo.lock()?;

    let tracked = repo.tracked_path(path)?;
    let kind = repo.config().document_kind(path, kind_override);

    // mtime first: a write racing the read shows up as unsaved later
    let mtime = modification_time(path)?;
    let content = read_file(path)?;
    let document = Document::parse(&content, kind)?;

    let mut root = None;
    let mut stored = 0usize;
    for fragment in decompose(document) {
        write_fragment(repo, &fragment)?;
        root = Some(fragment.hash);
        stored += 1;
    }
    let root = root.ok_or_else(|| Error::parse(kind, "document produced no fragments"))?;

    tracing::debug!(path = %tracked, fragments = stored, root = %root, "stored fragments");

    let parent = read_pointer(repo, &tracked)?;
    let commit = Commit::new(root, mtime, parent, kind, message);
    let commit_hash = write_commit(repo, &commit)?;

    // pointer last
    write_pointer(repo, &tracked, &commit_hash)?;

    tracing::info!(path = %tracked, commit = %commit_hash, "saved");
    Ok(commit_hash)
}
