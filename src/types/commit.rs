use crate::error::{Error, Result};
use crate::hash::{compute_hash, Hash};
use crate::types::{DocumentKind, Mtime};

/// number of newline-delimited fields in an encoded commit
const FIELD_COUNT: usize = 5;

/// a saved revision of one tracked path
///
/// encoded as five newline-joined fields, in order:
/// `mtime`, `root`, `parent` (empty for the first commit), `html`|`xml`, `message`.
/// the message is last so it may itself contain newlines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// modification time of the working file when it was saved
    pub mtime: Mtime,
    /// hash of the flattened root fragment
    pub root: Hash,
    /// previous commit for the same path
    pub parent: Option<Hash>,
    pub kind: DocumentKind,
    pub message: String,
}

impl Commit {
    pub fn new(
        root: Hash,
        mtime: Mtime,
        parent: Option<Hash>,
        kind: DocumentKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            mtime,
            root,
            parent,
            kind,
            message: message.into(),
        }
    }

    /// is this the first commit of its chain
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// canonical bytes and their digest
    pub fn encode(&self) -> (Hash, Vec<u8>) {
        let parent = self.parent.map(|p| p.to_hex()).unwrap_or_default();
        let fields = [
            self.mtime.to_string(),
            self.root.to_hex(),
            parent,
            self.kind.as_str().to_string(),
            self.message.clone(),
        ];
        let bytes = fields.join("\n").into_bytes();
        (compute_hash(&bytes), bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::CorruptCommit("commit is not valid utf-8".to_string()))?;

        let fields: Vec<&str> = text.splitn(FIELD_COUNT, '\n').collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::CorruptCommit(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let mtime = fields[0].parse::<Mtime>().map_err(Error::CorruptCommit)?;
        let root = Hash::from_hex(fields[1])
            .map_err(|_| Error::CorruptCommit(format!("invalid root hash {:?}", fields[1])))?;
        let parent = match fields[2] {
            "" => None,
            hex => Some(
                Hash::from_hex(hex)
                    .map_err(|_| Error::CorruptCommit(format!("invalid parent hash {:?}", hex)))?,
            ),
        };
        let kind = fields[3]
            .parse::<DocumentKind>()
            .map_err(|_| Error::CorruptCommit(format!("invalid document kind {:?}", fields[3])))?;

        Ok(Self {
            mtime,
            root,
            parent,
            kind,
            message: fields[4].to_string(),
        })
    }
}
