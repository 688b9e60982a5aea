//! fragment decomposition and reconstruction
//!
//! decomposition turns a document into content-addressed fragments: every
//! non-root element is serialized (tail included) after its own children were
//! already replaced by references, so a fragment names its descendants only by
//! hash. reconstruction walks the references back, depth first.

mod decompose;
mod reconstruct;

pub use decompose::{decompose, Decomposition, Fragment};
pub use reconstruct::{reconstruct, reconstruct_document};
