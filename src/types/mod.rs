mod commit;
mod kind;
mod mtime;

pub use commit::Commit;
pub use kind::DocumentKind;
pub use mtime::Mtime;
