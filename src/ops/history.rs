use std::collections::HashSet;
use std::fmt;
use std::iter::FusedIterator;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::pointers::require_pointer;
use crate::repo::Repo;
use crate::types::Commit;

/// commit with its hash for history output
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// lazy walk of one path's commit chain, newest first
///
/// each step decodes one commit. a decode failure is yielded once and ends
/// the walk; so does revisiting a hash.
pub struct History<'r> {
    repo: &'r Repo,
    next: Option<Hash>,
    visited: HashSet<Hash>,
}

/// history of a working file
pub fn history<'r>(repo: &'r Repo, path: &Path) -> Result<History<'r>> {
    let tracked = repo.tracked_path(path)?;
    history_of(repo, &tracked)
}

/// history of a tracked path given by name
pub fn history_of<'r>(repo: &'r Repo, tracked: &str) -> Result<History<'r>> {
    let head = require_pointer(repo, tracked)?;
    Ok(History {
        repo,
        next: Some(head),
        visited: HashSet::new(),
    })
}

impl Iterator for History<'_> {
    type Item = Result<HistoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next.take()?;

        if !self.visited.insert(hash) {
            return Some(Err(Error::CorruptCommit(format!(
                "commit chain revisits {}",
                hash
            ))));
        }

        match read_commit(self.repo, &hash) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok(HistoryEntry { hash, commit }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl FusedIterator for History<'_> {}

/// format a history entry for display
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commit:       {}", self.hash)?;
        match DateTime::from_timestamp(self.commit.mtime.secs(), self.commit.mtime.nanos()) {
            Some(utc) => writeln!(
                f,
                "datetime:     {}",
                utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S%.6f")
            )?,
            None => writeln!(f, "datetime:     {}", self.commit.mtime)?,
        }
        writeln!(f, "root element: {}", self.commit.root)?;
        writeln!(f, "type:         {}", self.commit.kind)?;
        write!(f, "message:      {}", self.commit.message)
    }
}
