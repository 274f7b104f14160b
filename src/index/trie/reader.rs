//! Query-side double-array trie
//!
//! Transitions follow the classic double-array scheme: the child of `node`
//! via byte `b` sits at `BASE[node] + b`, and the move is valid only when
//! `CHECK[child] == node`. Interior nodes carry a positive BASE; terminal
//! nodes carry a negative BASE pointing into the tail buffer.

use super::types::{NodeId, Tail, TailCursor, INVALID_NODE, TRIE_MAGIC, TRIE_VERSION};
use crate::error::{Error, Result};
use crate::utils::encoding::ByteCursor;

/// A static double-array trie with a tail buffer.
#[derive(Debug, Clone)]
pub struct Trie {
    pub(crate) base: Vec<i32>,
    pub(crate) check: Vec<i32>,
    pub(crate) tail: Tail,
}

impl Trie {
    /// A trie containing no records. Every `descend` returns
    /// [`INVALID_NODE`].
    pub fn empty() -> Self {
        Self {
            base: vec![0, 0],
            check: vec![-1, -1],
            tail: Tail::new(),
        }
    }

    /// BASE value of `node`. Negative values mark terminals; `-base` is the
    /// tail offset of the terminal record.
    pub fn get_base(&self, node: NodeId) -> i32 {
        self.base[node as usize]
    }

    /// Child of `node` via `label`, or [`INVALID_NODE`].
    pub fn descend(&self, node: NodeId, label: u8) -> NodeId {
        let base = self.base[node as usize];
        if base <= 0 {
            // Terminal, or a root that never received edges.
            return INVALID_NODE;
        }
        let next = base as usize + label as usize;
        if next < self.check.len() && self.check[next] == node as i32 {
            next as NodeId
        } else {
            INVALID_NODE
        }
    }

    /// Cursor over the tail record at `offset`.
    pub fn tail_at(&self, offset: usize) -> TailCursor<'_> {
        self.tail.cursor(offset)
    }

    /// Number of slots in the BASE/CHECK arrays.
    pub fn node_count(&self) -> usize {
        self.base.len()
    }

    /// Size of the tail buffer in bytes.
    pub fn tail_len(&self) -> usize {
        self.tail.len()
    }

    /// Decode a trie payload, consuming exactly the bytes its writer
    /// emitted.
    pub fn read_from(cur: &mut ByteCursor) -> Result<Self> {
        cur.expect_tag(TRIE_MAGIC)?;
        let version = cur.read_u32_le()?;
        if version != TRIE_VERSION {
            return Err(Error::Format(format!(
                "unsupported trie version {version}"
            )));
        }
        let node_count = cur.read_u32_le()? as usize;
        let tail_len = cur.read_u32_le()? as usize;
        if node_count < 2 {
            return Err(Error::Format(format!(
                "trie node count {node_count} below the reserved minimum"
            )));
        }
        // Validate up front so a lying header cannot trigger a huge
        // allocation before the cursor runs dry.
        let need = node_count
            .checked_mul(8)
            .and_then(|n| n.checked_add(tail_len))
            .ok_or_else(|| Error::Format("trie payload size overflows".into()))?;
        if need > cur.remaining() {
            return Err(Error::Format(format!(
                "trie payload truncated: need {} bytes, {} left",
                need,
                cur.remaining()
            )));
        }

        let mut base = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            base.push(cur.read_i32_le()?);
        }
        let mut check = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            check.push(cur.read_i32_le()?);
        }
        let tail = Tail::from_bytes(cur.read_bytes(tail_len)?.to_vec());

        Ok(Self { base, check, tail })
    }
}
