//! working-file access: the clock/metadata source and atomic overwrite

pub mod read;
pub mod write;

pub use read::{modification_time, modification_time_if_exists, read_file};
pub use write::{fsync_dir, set_modification_time, write_file_atomic};
