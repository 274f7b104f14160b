use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a dictionary word: its index in the word array
pub type DwordId = u32;

/// Dense identifier of a distinct indexed suffix
pub type SuffixId = u32;

/// Block tag for the dictionary word pool
pub const DWORDS_POOL_TAG: &[u8; 4] = b"DWDP";

/// Block tag for the dictionary word array
pub const DWORDS_ARRAY_TAG: &[u8; 4] = b"DWAR";

/// Block tag for the word-id pool backing the inverted lists
pub const DWORDID_POOL_TAG: &[u8; 4] = b"IDAR";

/// Block tag for the per-suffix inverted list descriptors
pub const SUFFIX_IINDEX_TAG: &[u8; 4] = b"IIND";

/// Descriptor of one dictionary word inside the pool.
///
/// The pool stores `key 0x00 value 0x00` per word; `offset` points at the
/// key and `key_len` excludes the NUL. The word array is sorted by `key_len`
/// ascending, stable over input order, so a word's id also orders it by
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwordEntry {
    pub offset: u32,
    pub key_len: u32,
}

impl DwordEntry {
    /// Serialized size: two u32 fields
    pub const SIZE: usize = 8;
}

/// Descriptor of one suffix's inverted list inside the word-id pool.
///
/// The slice `dwordid_pool[offset..offset + size]` holds the ids of every
/// word containing the suffix, sorted ascending; because word ids are
/// length-ordered, the slice is sorted by key length and supports binary
/// search on length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixList {
    pub offset: u32,
    pub size: u32,
}

impl SuffixList {
    pub const SIZE: usize = 8;
}

/// Build-time tuning of the suffix set.
///
/// For a word of length `L`, every suffix of length at least
/// `max(min_suffix, floor(suffix_ratio * L))` is inserted into the trie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of the word length below which suffixes are not indexed;
    /// must lie in `(0, 1]`.
    pub suffix_ratio: f64,
    /// Global floor on indexed suffix length; must be ≥ 1.
    pub min_suffix: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suffix_ratio: 0.5,
            min_suffix: 2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.suffix_ratio > 0.0 && self.suffix_ratio <= 1.0) {
            return Err(Error::Config(format!(
                "suffix_ratio must lie in (0, 1], got {}",
                self.suffix_ratio
            )));
        }
        if self.min_suffix < 1 {
            return Err(Error::Config(
                "min_suffix must be at least 1; zero-length suffixes would \
                 collide with the pool's NUL delimiters"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Minimum indexed suffix length for a word of `key_len` bytes.
    pub(crate) fn min_suffix_len(&self, key_len: usize) -> usize {
        let scaled = (self.suffix_ratio * key_len as f64) as usize;
        scaled.max(self.min_suffix as usize)
    }
}
