use crate::error::{Error, Result};
use crate::hash::{compute_hash, Hash};
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the object store
///
/// commits share the blob namespace with fragments; the hash is the digest
/// of the encoded text.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let (hash, bytes) = commit.encode();
    repo.store().put(&hash, &bytes)?;
    Ok(hash)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let bytes = repo.store().get(hash)?;

    // verify hash
    if compute_hash(&bytes) != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Commit::decode(&bytes).map_err(|e| match e {
        Error::CorruptCommit(msg) => Error::CorruptCommit(format!("{}: {}", hash, msg)),
        other => other,
    })
}

/// resolve a hex prefix to the single stored object it names
///
/// matches over every object key, fragments included; callers that need a
/// commit find out when decoding.
pub fn resolve_revision(repo: &Repo, prefix: &str) -> Result<Hash> {
    let mut matches = repo.store().keys_with_prefix(prefix)?;

    match matches.len() {
        0 => Err(Error::NoMatchingRevision(prefix.to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(Error::AmbiguousRevision {
            prefix: prefix.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::Fragment;
    use crate::object::write_fragment;
    use crate::store::MemoryStore;
    use crate::types::{DocumentKind, Mtime};
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn memory_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo =
            Repo::with_store(dir.path(), Config::default(), Box::new(MemoryStore::new())).unwrap();
        (dir, repo)
    }

    fn root() -> Hash {
        compute_hash(b"<root/>")
    }

    #[test]
    fn test_write_and_read_commit() {
        let (_dir, repo) = test_repo();
        let commit = Commit::new(root(), Mtime::new(1_700_000_000, 5), None, DocumentKind::Xml, "first");

        let hash = write_commit(&repo, &commit).unwrap();
        assert_eq!(read_commit(&repo, &hash).unwrap(), commit);
    }

    #[test]
    fn test_commit_deduplication() {
        let (_dir, repo) = memory_repo();
        let commit = Commit::new(root(), Mtime::new(1, 0), None, DocumentKind::Html, "same");

        let h1 = write_commit(&repo, &commit).unwrap();
        let h2 = write_commit(&repo, &commit).unwrap();

        assert_eq!(h1, h2);
        assert_eq!(repo.store().keys_with_prefix("").unwrap().len(), 1);
    }

    #[test]
    fn test_commit_with_parent() {
        let (_dir, repo) = memory_repo();
        let first = Commit::new(root(), Mtime::new(1, 0), None, DocumentKind::Xml, "a");
        let parent = write_commit(&repo, &first).unwrap();

        let second = Commit::new(root(), Mtime::new(2, 0), Some(parent), DocumentKind::Xml, "b");
        let hash = write_commit(&repo, &second).unwrap();

        assert_eq!(read_commit(&repo, &hash).unwrap().parent, Some(parent));
    }

    #[test]
    fn test_read_nonexistent_commit() {
        let (_dir, repo) = test_repo();
        let result = read_commit(&repo, &compute_hash(b"nope"));
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_read_fragment_as_commit() {
        let (_dir, repo) = memory_repo();
        let fragment = Fragment::new(b"<b>bold</b>".to_vec());
        write_fragment(&repo, &fragment).unwrap();

        assert!(matches!(
            read_commit(&repo, &fragment.hash),
            Err(Error::CorruptCommit(msg)) if msg.starts_with(&fragment.hash.to_hex())
        ));
    }

    #[test]
    fn test_resolve_revision() {
        let (_dir, repo) = memory_repo();
        let commit = Commit::new(root(), Mtime::new(1, 0), None, DocumentKind::Xml, "x");
        let hash = write_commit(&repo, &commit).unwrap();

        assert_eq!(resolve_revision(&repo, &hash.to_hex()[..8]).unwrap(), hash);
        assert_eq!(resolve_revision(&repo, &hash.to_hex()).unwrap(), hash);
    }

    #[test]
    fn test_resolve_revision_no_match() {
        let (_dir, repo) = memory_repo();
        let commit = Commit::new(root(), Mtime::new(1, 0), None, DocumentKind::Xml, "x");
        let hash = write_commit(&repo, &commit).unwrap();

        // flip the first nibble so the prefix cannot match
        let first = hash.to_hex().chars().next().unwrap();
        let other = if first == '0' { "1" } else { "0" };
        assert!(matches!(
            resolve_revision(&repo, other),
            Err(Error::NoMatchingRevision(_))
        ));
        assert!(matches!(
            resolve_revision(&repo, "not-hex"),
            Err(Error::NoMatchingRevision(_))
        ));
    }

    #[test]
    fn test_resolve_revision_ambiguous() {
        let (_dir, repo) = memory_repo();
        write_fragment(&repo, &Fragment::new(b"<a/>".to_vec())).unwrap();
        write_fragment(&repo, &Fragment::new(b"<b/>".to_vec())).unwrap();

        assert!(matches!(
            resolve_revision(&repo, ""),
            Err(Error::AmbiguousRevision { count: 2, .. })
        ));
    }
}
