//! Phonetic full-text search on top of an ordered key-value store.
//!
//! Text is split into word runs, stripped of stop words, stemmed and mapped
//! to phonetic codes. Each code is stored twice: a forward entry
//! (code, id) used by queries and a reverse entry (id, code) used by removal.

pub mod analyzer;
pub mod error;
pub mod index;
pub mod keys;
pub mod phonetic;
pub mod query;
pub mod setops;
pub mod store;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use error::{Error, Result, StoreError};
pub use index::{create_index, Index, IndexBuilder};
pub use query::{Combinator, Query};
pub use store::{MemoryStore, OrderedStore, SledStore, WriteOp};

/// Caller-supplied document identifier.
pub type DocId = u64;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
