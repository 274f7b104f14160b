//! Binary database writer
//!
//! File layout: the trie payload, then four tagged blocks in fixed order:
//! `DWDP` (word pool), `DWAR` (word array), `IDAR` (word-id pool), `IIND`
//! (inverted list descriptors). Each block is `tag(4) size:u32le payload`.
//! Everything is little-endian; there is no footer or checksum.

use crate::error::{Error, Result};
use crate::index::reader::IndexData;
use crate::index::trie::write_trie;
use crate::index::types::*;
use crate::utils::encoding::write_u32_le;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `data` to `path`, returning the number of bytes written.
pub fn write_db(data: &IndexData, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(65536, file);

    let mut written = write_trie(data.trie(), &mut writer)?;
    written += write_block(&mut writer, DWORDS_POOL_TAG, data.pool())?;

    let mut buf = Vec::with_capacity(data.dwords.len() * DwordEntry::SIZE);
    for entry in &data.dwords {
        buf.extend_from_slice(&entry.offset.to_le_bytes());
        buf.extend_from_slice(&entry.key_len.to_le_bytes());
    }
    written += write_block(&mut writer, DWORDS_ARRAY_TAG, &buf)?;

    buf.clear();
    for &id in &data.dwordid_pool {
        buf.extend_from_slice(&id.to_le_bytes());
    }
    written += write_block(&mut writer, DWORDID_POOL_TAG, &buf)?;

    buf.clear();
    for list in &data.iindex {
        buf.extend_from_slice(&list.offset.to_le_bytes());
        buf.extend_from_slice(&list.size.to_le_bytes());
    }
    written += write_block(&mut writer, SUFFIX_IINDEX_TAG, &buf)?;

    writer.flush()?;
    Ok(written)
}

fn write_block<W: Write>(writer: &mut W, tag: &[u8; 4], payload: &[u8]) -> Result<usize> {
    let size = u32::try_from(payload.len()).map_err(|_| {
        Error::Format(format!(
            "block {:?} exceeds the u32 size field",
            String::from_utf8_lossy(tag)
        ))
    })?;
    writer.write_all(tag)?;
    write_u32_le(writer, size)?;
    writer.write_all(payload)?;
    Ok(8 + payload.len())
}
