//! high-level operations on vecoh repositories

mod checkout;
mod fsck;
mod history;
mod save;

pub use checkout::{checkout, CheckoutOptions};
pub use fsck::{fsck, BrokenChain, CorruptObject, FsckReport, MissingObject, ObjectType};
pub use history::{history, history_of, History, HistoryEntry};
pub use save::save;
