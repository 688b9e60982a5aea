use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};
use crate::types::Mtime;

/// replace a file's content atomically
///
/// the temp file is staged next to the target so the final rename never
/// crosses a filesystem boundary.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let tmp_path = staging_path(path);

    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(content).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_path(path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// pin a file's modification time
pub fn set_modification_time(path: &Path, mtime: Mtime) -> Result<()> {
    let file = File::options().write(true).open(path).with_path(path)?;
    file.set_modified(mtime.to_system_time()).with_path(path)?;
    Ok(())
}

/// fsync a directory
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::modification_time;
    use tempfile::tempdir;

    #[test]
    fn test_write_file_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.html");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, b"<p>new</p>").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<p>new</p>");
        // no staging leftovers
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_set_modification_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        fs::write(&path, "<a/>").unwrap();

        let mtime = Mtime::new(1_234_567_890, 500);
        set_modification_time(&path, mtime).unwrap();

        assert_eq!(modification_time(&path).unwrap(), mtime);
    }
}
