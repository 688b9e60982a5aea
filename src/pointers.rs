use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::{Repo, MARKER_DIR};

/// point a tracked path at its newest commit (create or update)
///
/// tracked paths are root-relative and `/`-separated, like "docs/index.html"
pub fn write_pointer(repo: &Repo, path: &str, commit: &Hash) -> Result<()> {
    validate_tracked_path(path)?;
    repo.store().write_pointer(path, commit)
}

/// newest commit for a tracked path, `None` if never saved
pub fn read_pointer(repo: &Repo, path: &str) -> Result<Option<Hash>> {
    validate_tracked_path(path)?;
    repo.store().read_pointer(path)
}

/// newest commit for a tracked path, failing if it was never saved
pub fn require_pointer(repo: &Repo, path: &str) -> Result<Hash> {
    read_pointer(repo, path)?.ok_or_else(|| Error::NoMatchingPath(path.to_string()))
}

/// check if a path has ever been saved
pub fn is_tracked(repo: &Repo, path: &str) -> Result<bool> {
    Ok(read_pointer(repo, path)?.is_some())
}

/// list all tracked paths
pub fn list_pointers(repo: &Repo) -> Result<Vec<String>> {
    repo.store().pointers()
}

/// list tracked paths matching a glob pattern
pub fn list_pointers_matching(repo: &Repo, pattern: &str) -> Result<Vec<String>> {
    let all = list_pointers(repo)?;
    let glob = glob::Pattern::new(pattern).map_err(|e| Error::InvalidPath(e.to_string()))?;

    Ok(all.into_iter().filter(|p| glob.matches(p)).collect())
}

/// validate a tracked path
pub fn validate_tracked_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::InvalidPath("empty path".to_string()));
    }

    if path.starts_with('/') || path.ends_with('/') {
        return Err(Error::InvalidPath(format!(
            "path cannot start or end with '/': {}",
            path
        )));
    }

    if path.contains("//") {
        return Err(Error::InvalidPath(format!(
            "path cannot contain '//': {}",
            path
        )));
    }

    if path.contains('\0') {
        return Err(Error::InvalidPath(format!(
            "path cannot contain null byte: {}",
            path
        )));
    }

    for (i, component) in path.split('/').enumerate() {
        if component == "." || component == ".." {
            return Err(Error::InvalidPath(format!(
                "path cannot contain '.' or '..': {}",
                path
            )));
        }
        if i == 0 && component == MARKER_DIR {
            return Err(Error::InvalidPath(format!(
                "path lies inside the repository metadata: {}",
                path
            )));
        }
    }

    Ok(())
}
