//! DocStore - a small document store with field-level merge semantics
//!
//! Documents are JSON objects keyed by `(user_id, doc_id)` within a named
//! collection. Writes are merge-writes: each write carries a set of per-field
//! patches, and fields not mentioned are left untouched. Deleting a field is
//! an explicit operation, distinct from writing JSON `null`.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] - in-memory, for tests and embedded use
//! - [`FileStore`] - one JSON file per document under a base directory
//!
//! Concurrency model: merges are last-writer-wins at the field level. The
//! store does not synchronize concurrent merges to the same document beyond
//! making each merge atomic.

mod file;
mod memory;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{DocKey, DocStore, Document, Patch, StoreError, StoreResult, apply_patches};
