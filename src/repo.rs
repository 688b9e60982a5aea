use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::pointers::validate_tracked_path;
use crate::store::{FileStore, Store};

/// name of the directory that marks a repository root
pub const MARKER_DIR: &str = ".vecoh";

/// a resolved repository: its working-tree root, configuration and backend
///
/// resolved once and passed to every operation; nothing about the
/// repository location is cached elsewhere.
pub struct Repo {
    root: PathBuf,
    config: Config,
    store: Box<dyn Store>,
}

impl Repo {
    /// initialize a new repository with `path` as its working-tree root
    ///
    /// fails if `path` or any of its ancestors already holds a repository.
    pub fn init(path: &Path) -> Result<Self> {
        fs::create_dir_all(path).with_path(path)?;
        let root = path.canonicalize().with_path(path)?;

        if let Some(existing) = find_root(&root)? {
            return Err(Error::AlreadyInitialized(existing));
        }

        let marker = root.join(MARKER_DIR);
        fs::create_dir(&marker).with_path(&marker)?;
        let store = FileStore::create(&marker)?;

        let config = Config::default();
        config.save(&marker.join("config.toml"))?;

        tracing::info!(root = %root.display(), "initialized repository");

        Ok(Self {
            root,
            config,
            store: Box::new(store),
        })
    }

    /// open the repository rooted exactly at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let marker = path.join(MARKER_DIR);
        if !marker.is_dir() {
            return Err(Error::NotInitialized(path.to_path_buf()));
        }

        let root = path.canonicalize().with_path(path)?;
        let config = Config::load(&marker.join("config.toml"))?;

        Ok(Self {
            store: Box::new(FileStore::open(&root.join(MARKER_DIR))),
            root,
            config,
        })
    }

    /// open the nearest repository at or above `start`
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start.canonicalize().with_path(start)?;
        match find_root(&start)? {
            Some(root) => Self::open(&root),
            None => Err(Error::NotInitialized(start)),
        }
    }

    /// build a repository over an explicit backend
    pub fn with_store(root: &Path, config: Config, store: Box<dyn Store>) -> Result<Self> {
        let root = root.canonicalize().with_path(root)?;
        Ok(Self {
            root,
            config,
            store,
        })
    }

    /// working-tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// path to the marker directory
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// path to lock file
    pub fn lock_path(&self) -> PathBuf {
        self.marker_path().join("lock")
    }

    /// tracked name of a working file: root-relative, `/`-separated
    pub fn tracked_path(&self, file: &Path) -> Result<String> {
        let absolute = absolute_path(file)?;
        let relative = absolute
            .strip_prefix(&self.root)
            .map_err(|_| Error::PathOutsideRepo(absolute.clone()))?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
                _ => return Err(Error::InvalidPath(relative.display().to_string())),
            }
        }

        let tracked = parts.join("/");
        validate_tracked_path(&tracked)?;
        Ok(tracked)
    }

    /// on-disk location of a tracked path
    pub fn working_path(&self, tracked: &str) -> PathBuf {
        tracked.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }

    /// acquire exclusive lock on repository
    /// returns a guard that releases the lock on drop
    pub fn lock(&self) -> Result<RepoLock> {
        let marker = self.marker_path();
        fs::create_dir_all(&marker).with_path(&marker)?;

        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        let flock = Flock::lock(file, FlockArg::LockExclusiveNonblock)
            .map_err(|_| Error::LockContention)?;

        Ok(RepoLock { flock })
    }
}

/// guard that holds repository lock until dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}

/// nearest ancestor of `start` (inclusive) that holds a marker directory
pub fn find_root(start: &Path) -> Result<Option<PathBuf>> {
    Ok(start
        .ancestors()
        .find(|dir| dir.join(MARKER_DIR).is_dir())
        .map(Path::to_path_buf))
}

/// absolute, symlink-resolved path; the file itself need not exist
fn absolute_path(file: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = file.canonicalize() {
        return Ok(resolved);
    }

    let name = file
        .file_name()
        .ok_or_else(|| Error::InvalidPath(file.display().to_string()))?;
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let parent = parent.canonicalize().with_path(&parent)?;
    Ok(parent.join(name))
}
