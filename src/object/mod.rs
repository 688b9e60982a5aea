pub mod commit;
pub mod fragment;

pub use commit::{read_commit, resolve_revision, write_commit};
pub use fragment::{fragment_exists, read_fragment, write_fragment};
