//! # subdex - Common-Substring Dictionary Search
//!
//! subdex retrieves every dictionary entry sharing a substring of at least a
//! given length with a query word. The dictionary's key suffixes are packed
//! into a double-array trie; each distinct suffix carries an inverted list
//! of the words containing it, sorted by word length so length bounds cost a
//! binary search. The whole index serializes to a single binary database
//! built once and loaded (memory-mapped) for repeated lookup.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`engine`] - The engine facade: build, load, query, configuration
//! - [`index`] - Index construction, the suffix trie, and the DB format
//! - [`query`] - Common-substring query execution
//! - [`utils`] - Little-endian encoding helpers
//!
//! ## Quick Start
//!
//! ```ignore
//! use subdex::{Engine, Query};
//! use std::path::Path;
//!
//! // Build from a `key \t value` dictionary file and persist the DB.
//! let mut engine = Engine::new();
//! engine.build(Path::new("words.tsv"), Some(Path::new("words.db")))?;
//!
//! // Later: load and search.
//! let mut engine = Engine::new();
//! engine.read(Path::new("words.db"))?;
//!
//! let query = Query {
//!     min_common_len: 4,
//!     max_dword_len: 20,
//!     limit: 10,
//!     ..Query::new(&b"youthe"[..])
//! };
//! for hit in engine.search(&query) {
//!     println!(
//!         "{} (match at {}, {} bytes)",
//!         String::from_utf8_lossy(hit.dword),
//!         hit.start_pos,
//!         hit.common_len
//!     );
//! }
//! ```

pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod utils;

pub use engine::Engine;
pub use error::{Error, Result};
pub use index::types::EngineConfig;
pub use query::{Query, SearchHit};
