use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::types::Mtime;

/// last modification time of a working file
pub fn modification_time(path: &Path) -> Result<Mtime> {
    let meta = fs::metadata(path).with_path(path)?;
    let modified = meta.modified().with_path(path)?;
    Ok(Mtime::from_system_time(modified))
}

/// like [`modification_time`], but a missing file yields `None`
pub fn modification_time_if_exists(path: &Path) -> Result<Option<Mtime>> {
    match fs::metadata(path) {
        Ok(meta) => {
            let modified = meta.modified().with_path(path)?;
            Ok(Some(Mtime::from_system_time(modified)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_path(path),
    }
}

/// read a working file's full content
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    #[test]
    fn test_modification_time_matches_set_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        fs::write(&path, "<a/>").unwrap();

        let when = UNIX_EPOCH + Duration::new(1_500_000_000, 123_000_000);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(when)
            .unwrap();

        assert_eq!(modification_time(&path).unwrap(), Mtime::from_system_time(when));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.xml");

        assert!(modification_time_if_exists(&path).unwrap().is_none());
        assert!(matches!(modification_time(&path), Err(Error::Io { .. })));
        assert!(matches!(read_file(&path), Err(Error::Io { .. })));
    }
}
