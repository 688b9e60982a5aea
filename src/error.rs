use std::path::PathBuf;

use crate::types::DocumentKind;
use crate::Hash;

/// error type for vecoh operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vecoh already initialized in {0}")]
    AlreadyInitialized(PathBuf),

    #[error("vecoh not initialized in {0} or any parent directory")]
    NotInitialized(PathBuf),

    #[error("no matching path: {0}")]
    NoMatchingPath(String),

    #[error("path is outside the repository: {0}")]
    PathOutsideRepo(PathBuf),

    #[error("invalid tracked path: {0}")]
    InvalidPath(String),

    #[error("fragment not found: {0}")]
    FragmentNotFound(Hash),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("corrupt commit: {0}")]
    CorruptCommit(String),

    #[error("no matching revision: {0}")]
    NoMatchingRevision(String),

    #[error("more than one matching revision for '{prefix}' ({count} candidates)")]
    AmbiguousRevision { prefix: String, count: usize },

    #[error("current version of {0} not saved (use --force to check out anyway)")]
    UnsavedChanges(PathBuf),

    #[error("{kind} parse error: {message}")]
    Parse { kind: DocumentKind, message: String },

    #[error("invalid document kind: {0}")]
    InvalidDocumentKind(String),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("lock contention on repository")]
    LockContention,

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// build a parse error for the given document kind
    pub(crate) fn parse(kind: DocumentKind, message: impl std::fmt::Display) -> Self {
        Error::Parse {
            kind,
            message: message.to_string(),
        }
    }
}

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
