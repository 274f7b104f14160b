//! Double-array suffix trie
//!
//! A compact, array-backed trie over the indexed dictionary suffixes.
//! Transitions cost one array probe; unique trailing bytes live in a shared
//! tail buffer together with each record's value.
//!
//! - `builder`: constructs BASE/CHECK/tail from sorted records
//! - `reader`: transition and terminal decoding used by searches
//! - `writer`: payload serialization
//! - `types`: node ids, magic, the tail buffer and its cursor

pub mod builder;
pub mod reader;
pub mod types;
pub mod writer;

pub use builder::{TrieBuilder, TrieRecord};
pub use reader::Trie;
pub use types::{NodeId, Tail, TailCursor, INITIAL_NODE, INVALID_NODE};
pub use writer::write_trie;
