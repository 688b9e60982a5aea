use std::collections::HashSet;

use crate::engine::reconstruct;
use crate::error::{Error, Result};
use crate::hash::{compute_hash, Hash};
use crate::object::read_fragment;
use crate::ops::history_of;
use crate::pointers::list_pointers;
use crate::repo::Repo;

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// commits walked across all chains
    pub commits_checked: usize,
    /// corrupt objects (hash mismatch)
    pub corrupt_objects: Vec<CorruptObject>,
    /// missing objects referenced by commits
    pub missing_objects: Vec<MissingObject>,
    /// chains that stop at an undecodable commit or unparsable fragment
    pub broken_chains: Vec<BrokenChain>,
    /// objects not reachable from any pointer
    pub dangling_objects: Vec<Hash>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty()
            && self.missing_objects.is_empty()
            && self.broken_chains.is_empty()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub hash: Hash,
    pub message: String,
}

#[derive(Debug)]
pub struct MissingObject {
    pub hash: Hash,
    pub object_type: ObjectType,
    pub referenced_by: String,
}

#[derive(Debug)]
pub struct BrokenChain {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Fragment,
    Commit,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Fragment => write!(f, "fragment"),
            ObjectType::Commit => write!(f, "commit"),
        }
    }
}

/// verify repository integrity
///
/// walks every pointer's chain, reconstructs every commit it reaches and
/// re-hashes every stored object.
pub fn fsck(repo: &Repo) -> Result<FsckReport> {
    let mut report = FsckReport::default();
    let mut reachable = HashSet::new();
    let mut verified_roots = HashSet::new();

    for path in list_pointers(repo)? {
        check_chain(repo, &path, &mut reachable, &mut verified_roots, &mut report)?;
    }

    for hash in repo.store().keys_with_prefix("")? {
        report.objects_checked += 1;

        let bytes = repo.store().get(&hash)?;
        let actual = compute_hash(&bytes);
        if actual != hash {
            report.corrupt_objects.push(CorruptObject {
                hash,
                message: format!("hash mismatch: expected {}, found {}", hash, actual),
            });
        }

        if !reachable.contains(&hash) {
            report.dangling_objects.push(hash);
        }
    }

    tracing::info!(
        objects = report.objects_checked,
        commits = report.commits_checked,
        ok = report.is_ok(),
        "fsck finished"
    );
    Ok(report)
}

fn check_chain(
    repo: &Repo,
    path: &str,
    reachable: &mut HashSet<Hash>,
    verified_roots: &mut HashSet<Hash>,
    report: &mut FsckReport,
) -> Result<()> {
    let mut referenced_by = format!("pointer {}", path);

    let walk = match history_of(repo, path) {
        Ok(walk) => walk,
        Err(e @ (Error::InvalidHashHex(_) | Error::InvalidPath(_))) => {
            report.broken_chains.push(BrokenChain {
                path: path.to_string(),
                message: format!("unreadable pointer: {}", e),
            });
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(Error::ObjectNotFound(hash)) => {
                report.missing_objects.push(MissingObject {
                    hash,
                    object_type: ObjectType::Commit,
                    referenced_by,
                });
                return Ok(());
            }
            // reported by the object scan
            Err(Error::CorruptObject(hash)) => {
                reachable.insert(hash);
                return Ok(());
            }
            Err(Error::CorruptCommit(message)) => {
                report.broken_chains.push(BrokenChain {
                    path: path.to_string(),
                    message,
                });
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        report.commits_checked += 1;
        reachable.insert(entry.hash);
        referenced_by = format!("commit {}", entry.hash);

        if !verified_roots.insert(entry.commit.root) {
            continue;
        }

        let result = reconstruct(&entry.commit.root, entry.commit.kind, |hash: &Hash| {
            reachable.insert(*hash);
            read_fragment(repo, hash)
        });

        match result {
            Ok(_) => {}
            Err(Error::FragmentNotFound(hash)) => report.missing_objects.push(MissingObject {
                hash,
                object_type: ObjectType::Fragment,
                referenced_by: referenced_by.clone(),
            }),
            Err(Error::CorruptObject(_)) => {}
            Err(e @ Error::Parse { .. }) => report.broken_chains.push(BrokenChain {
                path: path.to_string(),
                message: format!("{}: {}", referenced_by, e),
            }),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::read_commit;
    use crate::ops::save;
    use crate::ops::testutil::{set_mtime, test_repo};
    use crate::pointers::write_pointer;
    use std::fs;

    #[test]
    fn test_fsck_healthy_repo() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a><b>x</b><c/></a>").unwrap();
        save(&repo, &file, None, "one").unwrap();
        set_mtime(&file, 77);
        save(&repo, &file, None, "two").unwrap();

        let report = fsck(&repo).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.commits_checked, 2);
        // three fragments shared by both commits, plus two commits
        assert_eq!(report.objects_checked, 5);
        assert!(report.dangling_objects.is_empty());
    }

    #[test]
    fn test_fsck_corrupt_object() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a><b>x</b></a>").unwrap();
        let hash = save(&repo, &file, None, "").unwrap();
        let root = read_commit(&repo, &hash).unwrap().root;

        let path = repo.marker_path().join("objects").join(root.to_hex());
        fs::write(&path, b"<a>garbage</a>").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].hash, root);
    }

    #[test]
    fn test_fsck_missing_fragment() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a><b>x</b></a>").unwrap();
        let hash = save(&repo, &file, None, "").unwrap();
        let root = read_commit(&repo, &hash).unwrap().root;

        let objects = repo.marker_path().join("objects");
        for key in repo.store().keys_with_prefix("").unwrap() {
            if key != hash && key != root {
                fs::remove_file(objects.join(key.to_hex())).unwrap();
            }
        }

        let report = fsck(&repo).unwrap();
        assert_eq!(report.missing_objects.len(), 1);
        assert_eq!(report.missing_objects[0].object_type, ObjectType::Fragment);
    }

    #[test]
    fn test_fsck_missing_commit() {
        let (_dir, repo) = test_repo();
        write_pointer(&repo, "a.xml", &compute_hash(b"no such commit")).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.missing_objects.len(), 1);
        assert_eq!(report.missing_objects[0].object_type, ObjectType::Commit);
        assert_eq!(report.missing_objects[0].referenced_by, "pointer a.xml");
    }

    #[test]
    fn test_fsck_pointer_at_fragment() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a/>").unwrap();
        let hash = save(&repo, &file, None, "").unwrap();
        let root = read_commit(&repo, &hash).unwrap().root;
        write_pointer(&repo, "a.xml", &root).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.broken_chains.len(), 1);
        assert_eq!(report.broken_chains[0].path, "a.xml");
    }

    #[test]
    fn test_fsck_garbage_pointer() {
        let (dir, repo) = test_repo();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a><b/></a>").unwrap();
        save(&repo, &file, None, "").unwrap();
        fs::write(repo.marker_path().join("pointers/bad.xml"), "not a hash\n").unwrap();

        let report = fsck(&repo).unwrap();

        assert!(!report.is_ok());
        assert_eq!(report.broken_chains.len(), 1);
        assert_eq!(report.broken_chains[0].path, "bad.xml");
        // the healthy chain is still walked
        assert_eq!(report.commits_checked, 1);
        assert!(report.dangling_objects.is_empty());
    }

    #[test]
    fn test_fsck_dangling() {
        let (_dir, repo) = test_repo();
        let orphan = crate::engine::Fragment::new(b"<lost/>".to_vec());
        crate::object::write_fragment(&repo, &orphan).unwrap();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.dangling_objects, vec![orphan.hash]);
    }
}
