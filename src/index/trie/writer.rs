//! Trie payload serialization
//!
//! Layout (little-endian): magic `SDAT`, u32 version, u32 node count,
//! u32 tail length, BASE array, CHECK array, tail bytes. `Trie::read_from`
//! consumes exactly these bytes.

use super::reader::Trie;
use super::types::{TRIE_MAGIC, TRIE_VERSION};
use crate::utils::encoding::{write_i32_le, write_u32_le};
use std::io::{self, Write};

/// Serialize `trie`, returning the number of bytes written.
pub fn write_trie<W: Write>(trie: &Trie, writer: &mut W) -> io::Result<usize> {
    writer.write_all(TRIE_MAGIC)?;
    write_u32_le(writer, TRIE_VERSION)?;
    write_u32_le(writer, trie.base.len() as u32)?;
    write_u32_le(writer, trie.tail.len() as u32)?;
    for &value in &trie.base {
        write_i32_le(writer, value)?;
    }
    for &value in &trie.check {
        write_i32_le(writer, value)?;
    }
    writer.write_all(trie.tail.as_bytes())?;

    Ok(16 + trie.base.len() * 8 + trie.tail.len())
}

#[cfg(test)]
mod tests {
    use super::super::builder::{TrieBuilder, TrieRecord};
    use super::super::types::{INITIAL_NODE, INVALID_NODE};
    use super::*;
    use crate::utils::encoding::ByteCursor;

    #[test]
    fn test_roundtrip() {
        let records = [
            TrieRecord {
                key: b"alpha",
                value: 10,
            },
            TrieRecord {
                key: b"alphabet",
                value: 20,
            },
            TrieRecord {
                key: b"beta",
                value: 30,
            },
        ];
        let trie = TrieBuilder::build(&records);

        let mut buf = Vec::new();
        let written = write_trie(&trie, &mut buf).unwrap();
        assert_eq!(written, buf.len());

        let mut cur = ByteCursor::new(&buf);
        let loaded = Trie::read_from(&mut cur).unwrap();
        assert_eq!(cur.remaining(), 0);
        assert_eq!(loaded.node_count(), trie.node_count());
        assert_eq!(loaded.tail_len(), trie.tail_len());

        let mut node = INITIAL_NODE;
        for &b in b"alpha" {
            node = loaded.descend(node, b);
            assert_ne!(node, INVALID_NODE);
        }
        let end = loaded.descend(node, 0);
        let base = loaded.get_base(end);
        assert!(base < 0);
        assert_eq!(loaded.tail_at(-base as usize).value(), 10);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let trie = TrieBuilder::build(&[]);
        let mut buf = Vec::new();
        write_trie(&trie, &mut buf).unwrap();
        buf[0] = b'X';

        let mut cur = ByteCursor::new(&buf);
        assert!(Trie::read_from(&mut cur).is_err());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let trie = TrieBuilder::build(&[TrieRecord {
            key: b"word",
            value: 1,
        }]);
        let mut buf = Vec::new();
        write_trie(&trie, &mut buf).unwrap();
        buf.truncate(buf.len() - 3);

        let mut cur = ByteCursor::new(&buf);
        assert!(Trie::read_from(&mut cur).is_err());
    }
}
