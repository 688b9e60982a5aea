use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::fsync_dir;
use crate::hash::{Hash, HASH_HEX_LEN};
use crate::store::{ObjectStore, PointerStore};

/// directory-backed store
///
/// ```text
/// objects/<64 hex>      blob content
/// pointers/<rel/path>   hex of the newest commit, one file per tracked path
/// tmp/                  staging for atomic writes
/// ```
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// create the directory structure under `root`
    pub fn create(root: &Path) -> Result<Self> {
        let store = Self::open(root);
        for dir in [store.objects_path(), store.pointers_path(), store.tmp_path()] {
            fs::create_dir_all(&dir).with_path(&dir)?;
        }
        Ok(store)
    }

    /// use an existing directory structure
    pub fn open(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn objects_path(&self) -> PathBuf {
        self.root.join("objects")
    }

    pub fn pointers_path(&self) -> PathBuf {
        self.root.join("pointers")
    }

    pub fn tmp_path(&self) -> PathBuf {
        self.root.join("tmp")
    }

    pub fn object_path(&self, key: &Hash) -> PathBuf {
        self.objects_path().join(key.to_hex())
    }

    fn pointer_path(&self, path: &str) -> PathBuf {
        self.pointers_path().join(path)
    }

    /// atomic write: temp -> fsync -> rename -> fsync dir
    fn write_atomic(&self, target: &Path, content: &[u8]) -> Result<()> {
        let tmp_path = self.tmp_path().join(uuid::Uuid::new_v4().to_string());
        {
            let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
            tmp_file.write_all(content).with_path(&tmp_path)?;
            tmp_file.sync_all().with_path(&tmp_path)?;
        }

        fs::rename(&tmp_path, target).with_path(target)?;

        if let Some(parent) = target.parent() {
            fsync_dir(parent)?;
        }
        Ok(())
    }
}

impl ObjectStore for FileStore {
    fn put(&self, key: &Hash, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);

        // deduplication: same key, same content
        if path.exists() {
            return Ok(());
        }

        self.write_atomic(&path, bytes)
    }

    fn get(&self, key: &Hash) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ObjectNotFound(*key)
            } else {
                Error::Io { path, source: e }
            }
        })
    }

    fn contains(&self, key: &Hash) -> Result<bool> {
        Ok(self.object_path(key).is_file())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<Hash>> {
        let dir = self.objects_path();
        let prefix = prefix.to_ascii_lowercase();
        let mut keys = Vec::new();

        for entry in fs::read_dir(&dir).with_path(&dir)? {
            let entry = entry.with_path(&dir)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.len() != HASH_HEX_LEN || !name.starts_with(&prefix) {
                continue;
            }
            // stray files in objects/ are not objects
            if let Ok(hash) = Hash::from_hex(name) {
                keys.push(hash);
            }
        }

        keys.sort();
        Ok(keys)
    }
}

impl PointerStore for FileStore {
    fn read_pointer(&self, path: &str) -> Result<Option<Hash>> {
        let pointer_path = self.pointer_path(path);

        let content = match fs::read_to_string(&pointer_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Io {
                    path: pointer_path,
                    source: e,
                })
            }
        };

        Hash::from_hex(content.trim()).map(Some)
    }

    fn write_pointer(&self, path: &str, commit: &Hash) -> Result<()> {
        let pointer_path = self.pointer_path(path);

        if let Some(parent) = pointer_path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }

        self.write_atomic(&pointer_path, commit.to_hex().as_bytes())
    }

    fn pointers(&self) -> Result<Vec<String>> {
        let base = self.pointers_path();
        let mut paths = Vec::new();

        if !base.exists() {
            return Ok(paths);
        }

        for entry in WalkDir::new(&base).min_depth(1) {
            let entry = entry.map_err(|e| Error::Io {
                path: base.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&base) {
                let components: Vec<_> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect();
                paths.push(components.join("/"));
            }
        }

        paths.sort();
        Ok(paths)
    }
}
