//! Loading and serving the binary database
//!
//! A database is parsed into [`IndexData`]: the trie and the fixed-width
//! arrays are materialized (endianness-safe), while the word pool stays a
//! zero-copy range into the backing bytes, which are a memory map when
//! loaded from disk and the builder's own buffer when built in memory.

use crate::error::{Error, Result};
use crate::index::trie::Trie;
use crate::index::types::*;
use crate::utils::encoding::ByteCursor;
use memmap2::Mmap;
use std::fs::File;
use std::ops::{Deref, Range};
use std::path::Path;

/// Backing storage for a loaded database.
pub(crate) enum DbBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for DbBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            DbBytes::Owned(bytes) => bytes,
            DbBytes::Mapped(map) => map,
        }
    }
}

/// An immutable, fully loaded search database.
pub struct IndexData {
    bytes: DbBytes,
    pool: Range<usize>,
    pub(crate) dwords: Vec<DwordEntry>,
    pub(crate) dwordid_pool: Vec<DwordId>,
    pub(crate) iindex: Vec<SuffixList>,
    trie: Trie,
}

impl IndexData {
    /// Assemble a database from freshly built parts.
    pub(crate) fn from_parts(
        pool: Vec<u8>,
        dwords: Vec<DwordEntry>,
        dwordid_pool: Vec<DwordId>,
        iindex: Vec<SuffixList>,
        trie: Trie,
    ) -> Self {
        let range = 0..pool.len();
        Self {
            bytes: DbBytes::Owned(pool),
            pool: range,
            dwords,
            dwordid_pool,
            iindex,
            trie,
        }
    }

    /// Memory-map and parse a database file. Returns the loaded index and
    /// the number of bytes consumed (trailing bytes are ignored, matching
    /// the write format's lack of a footer).
    pub fn open(path: &Path) -> Result<(Self, usize)> {
        let file = File::open(path)?;
        let map = unsafe { Mmap::map(&file)? };
        Self::parse(DbBytes::Mapped(map))
    }

    fn parse(bytes: DbBytes) -> Result<(Self, usize)> {
        let (trie, pool, dwords, dwordid_pool, iindex, used) = {
            let mut cur = ByteCursor::new(&bytes);

            let trie = Trie::read_from(&mut cur)?;

            // DWDP: raw pool bytes stay in place, only the range is kept.
            cur.expect_tag(DWORDS_POOL_TAG)?;
            let pool_size = cur.read_u32_le()? as usize;
            let pool_start = cur.position();
            cur.read_bytes(pool_size)?;
            let pool = pool_start..pool_start + pool_size;

            // DWAR: (offset, key_len) pairs.
            cur.expect_tag(DWORDS_ARRAY_TAG)?;
            let block_size = cur.read_u32_le()? as usize;
            if block_size % DwordEntry::SIZE != 0 {
                return Err(Error::Format(format!(
                    "word array block size {block_size} is not a multiple of {}",
                    DwordEntry::SIZE
                )));
            }
            let mut dwords = Vec::with_capacity(block_size / DwordEntry::SIZE);
            for _ in 0..block_size / DwordEntry::SIZE {
                let offset = cur.read_u32_le()?;
                let key_len = cur.read_u32_le()?;
                // Each word needs its key, the key NUL, and at least the
                // value NUL inside the pool.
                if offset as usize + key_len as usize + 2 > pool_size {
                    return Err(Error::Format(format!(
                        "word entry ({offset}, {key_len}) exceeds pool of {pool_size} bytes"
                    )));
                }
                dwords.push(DwordEntry { offset, key_len });
            }

            // IDAR: the word-id pool.
            cur.expect_tag(DWORDID_POOL_TAG)?;
            let block_size = cur.read_u32_le()? as usize;
            if block_size % 4 != 0 {
                return Err(Error::Format(format!(
                    "word-id pool block size {block_size} is not a multiple of 4"
                )));
            }
            let mut dwordid_pool = Vec::with_capacity(block_size / 4);
            for _ in 0..block_size / 4 {
                let id = cur.read_u32_le()?;
                if id as usize >= dwords.len() {
                    return Err(Error::Format(format!(
                        "word id {id} out of range ({} words)",
                        dwords.len()
                    )));
                }
                dwordid_pool.push(id);
            }

            // IIND: per-suffix list descriptors.
            cur.expect_tag(SUFFIX_IINDEX_TAG)?;
            let block_size = cur.read_u32_le()? as usize;
            if block_size % SuffixList::SIZE != 0 {
                return Err(Error::Format(format!(
                    "inverted index block size {block_size} is not a multiple of {}",
                    SuffixList::SIZE
                )));
            }
            let mut iindex = Vec::with_capacity(block_size / SuffixList::SIZE);
            for _ in 0..block_size / SuffixList::SIZE {
                let offset = cur.read_u32_le()?;
                let size = cur.read_u32_le()?;
                if offset as usize + size as usize > dwordid_pool.len() {
                    return Err(Error::Format(format!(
                        "inverted list ({offset}, {size}) exceeds id pool of {} entries",
                        dwordid_pool.len()
                    )));
                }
                iindex.push(SuffixList { offset, size });
            }

            (trie, pool, dwords, dwordid_pool, iindex, cur.position())
        };

        Ok((
            Self {
                bytes,
                pool,
                dwords,
                dwordid_pool,
                iindex,
                trie,
            },
            used,
        ))
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// The raw `key 0x00 value 0x00` pool bytes.
    pub fn pool(&self) -> &[u8] {
        &self.bytes[self.pool.clone()]
    }

    pub fn dwords_num(&self) -> u32 {
        self.dwords.len() as u32
    }

    pub fn suffix_count(&self) -> u32 {
        self.iindex.len() as u32
    }

    pub fn key_len(&self, id: DwordId) -> u32 {
        self.dwords[id as usize].key_len
    }

    /// Key bytes of word `id`.
    pub fn key(&self, id: DwordId) -> &[u8] {
        let entry = self.dwords[id as usize];
        let start = entry.offset as usize;
        &self.pool()[start..start + entry.key_len as usize]
    }

    /// Value bytes of word `id` (up to the terminating NUL).
    pub fn value(&self, id: DwordId) -> &[u8] {
        let entry = self.dwords[id as usize];
        let pool = self.pool();
        let start = entry.offset as usize + entry.key_len as usize + 1;
        let len = pool[start..]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(pool.len() - start);
        &pool[start..start + len]
    }

    /// The inverted list of `suffix_id`, sorted ascending by key length.
    pub fn suffix_list(&self, suffix_id: SuffixId) -> Option<&[DwordId]> {
        let list = self.iindex.get(suffix_id as usize)?;
        let start = list.offset as usize;
        Some(&self.dwordid_pool[start..start + list.size as usize])
    }
}
