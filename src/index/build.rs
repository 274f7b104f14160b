//! Database construction from a dictionary text file
//!
//! One record per line, `key \t value`; the first tab separates key from
//! value and lines without a tab are dropped. All bytes are copied verbatim
//! into the word pool as `key 0x00 value 0x00`. Words are sorted by key
//! length, every sufficiently long suffix of every key is generated, and the
//! deduplicated suffix set becomes the trie together with one inverted list
//! of owning words per distinct suffix.

use crate::error::{Error, Result};
use crate::index::reader::IndexData;
use crate::index::trie::{TrieBuilder, TrieRecord};
use crate::index::types::*;
use std::fs;
use std::path::Path;

/// One generated suffix occurrence before deduplication.
struct SuffixCandidate {
    /// Start of the suffix bytes in the pool
    start: u32,
    /// End of the owning key in the pool (its NUL position)
    end: u32,
    /// Owning word
    word: DwordId,
}

/// Build a search database from the dictionary file at `dict_path`.
pub fn build_index(dict_path: &Path, config: &EngineConfig) -> Result<IndexData> {
    let raw = fs::read(dict_path)?;
    build_from_bytes(&raw, config)
}

/// Build a search database from in-memory dictionary bytes.
pub(crate) fn build_from_bytes(raw: &[u8], config: &EngineConfig) -> Result<IndexData> {
    config.validate()?;

    // Phase 1: copy records into the pool and collect word descriptors.
    let mut pool: Vec<u8> = Vec::with_capacity(raw.len() + 2);
    let mut dwords: Vec<DwordEntry> = Vec::new();
    for line in raw.split(|&b| b == b'\n') {
        let Some(tab) = line.iter().position(|&b| b == b'\t') else {
            continue;
        };
        // The pool and the tail are NUL-delimited; a line carrying NUL
        // bytes cannot be represented and is dropped like a tab-less one.
        if line.contains(&0) {
            continue;
        }
        let offset = to_u32(pool.len())?;
        let key_len = to_u32(tab)?;
        pool.extend_from_slice(&line[..tab]);
        pool.push(0);
        pool.extend_from_slice(&line[tab + 1..]);
        pool.push(0);
        dwords.push(DwordEntry { offset, key_len });
    }
    to_u32(pool.len())?;

    // Word ids must order words by key length; stable sort keeps input
    // order among equal lengths deterministic.
    dwords.sort_by_key(|entry| entry.key_len);

    // Phase 2: emit every sufficiently long suffix of every key.
    let mut candidates: Vec<SuffixCandidate> = Vec::new();
    for (id, entry) in dwords.iter().enumerate() {
        let key_len = entry.key_len as usize;
        let min_len = config.min_suffix_len(key_len);
        if key_len < min_len {
            continue;
        }
        let end = entry.offset + entry.key_len;
        for j in 0..=(key_len - min_len) as u32 {
            candidates.push(SuffixCandidate {
                start: entry.offset + j,
                end,
                word: id as DwordId,
            });
        }
    }

    // Phase 3: order candidates by suffix bytes so equal suffixes are
    // adjacent and the deduplicated sequence is trie build order.
    candidates.sort_unstable_by(|a, b| {
        pool[a.start as usize..a.end as usize].cmp(&pool[b.start as usize..b.end as usize])
    });

    // Phase 4: deduplicate into trie records with dense suffix ids and
    // pack each suffix's owners into the shared id pool.
    let mut dwordid_pool: Vec<DwordId> = Vec::with_capacity(candidates.len());
    let mut iindex: Vec<SuffixList> = Vec::new();
    let mut records: Vec<TrieRecord> = Vec::new();
    for candidate in &candidates {
        let key = &pool[candidate.start as usize..candidate.end as usize];
        if records.last().map(|record| record.key) != Some(key) {
            iindex.push(SuffixList {
                offset: dwordid_pool.len() as u32,
                size: 0,
            });
            records.push(TrieRecord {
                key,
                value: records.len() as u32,
            });
        }
        dwordid_pool.push(candidate.word);
        if let Some(list) = iindex.last_mut() {
            list.size += 1;
        }
    }

    // Word ids were assigned in key-length order, so sorting each list by
    // id also sorts it by key length, as retrieval's binary search expects.
    for list in &iindex {
        let start = list.offset as usize;
        dwordid_pool[start..start + list.size as usize].sort_unstable();
    }

    // Phase 5: the trie maps each distinct suffix to its dense id.
    let trie = TrieBuilder::build(&records);

    Ok(IndexData::from_parts(pool, dwords, dwordid_pool, iindex, trie))
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::Format("dictionary exceeds the 4 GiB pool limit".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &[u8]) -> IndexData {
        build_from_bytes(raw, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let data = build(b"good\t1\nno-tab-here\nalso good\t2\n\nwith\0nul\t3\n");
        assert_eq!(data.dwords_num(), 2);
    }

    #[test]
    fn test_words_sorted_by_length() {
        let data = build(b"lengthy\t1\nab\t2\nmid\t3\n");
        assert_eq!(data.key(0), b"ab");
        assert_eq!(data.key(1), b"mid");
        assert_eq!(data.key(2), b"lengthy");
        assert_eq!(data.value(2), b"1");
    }

    #[test]
    fn test_length_ties_keep_input_order() {
        let data = build(b"bbb\t1\naaa\t2\nccc\t3\n");
        assert_eq!(data.key(0), b"bbb");
        assert_eq!(data.key(1), b"aaa");
        assert_eq!(data.key(2), b"ccc");
    }

    #[test]
    fn test_suffix_dedup_and_inverted_lists() {
        // ratio 0.5, min_suffix 2: "abc" (len 3) indexes "abc" and "bc";
        // "xbc" indexes "xbc" and "bc". "bc" is shared.
        let data = build(b"abc\t1\nxbc\t2\n");
        assert_eq!(data.suffix_count(), 3);

        let mut shared = None;
        for sid in 0..data.suffix_count() {
            let list = data.suffix_list(sid).unwrap();
            match list.len() {
                1 => {}
                2 => {
                    assert!(shared.is_none(), "only one suffix is shared");
                    shared = Some(list.to_vec());
                }
                n => panic!("unexpected list length {n}"),
            }
        }
        assert_eq!(shared, Some(vec![0, 1]));
    }

    #[test]
    fn test_inverted_lists_sorted_by_key_len() {
        let data = build(b"hopefully\t20\nhopeful\t10\n");
        for sid in 0..data.suffix_count() {
            let list = data.suffix_list(sid).unwrap();
            for pair in list.windows(2) {
                assert!(data.key_len(pair[0]) <= data.key_len(pair[1]));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let data = build(b"");
        assert_eq!(data.dwords_num(), 0);
        assert_eq!(data.suffix_count(), 0);
    }

    #[test]
    fn test_trailing_newline_optional() {
        let with = build(b"word\t1\n");
        let without = build(b"word\t1");
        assert_eq!(with.dwords_num(), 1);
        assert_eq!(without.dwords_num(), 1);
        assert_eq!(with.suffix_count(), without.suffix_count());
    }

    #[test]
    fn test_first_tab_wins() {
        let data = build(b"key\tvalue\twith\ttabs\n");
        assert_eq!(data.key(0), b"key");
        assert_eq!(data.value(0), b"value\twith\ttabs");
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let config = EngineConfig {
            suffix_ratio: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            build_from_bytes(b"a\t1\n", &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_all_suffix_ids_resolve_in_trie() {
        use crate::index::trie::{INITIAL_NODE, INVALID_NODE};

        let data = build(b"youthful\t1\nyouthfully\t2\nyouthfulness\t3\n");
        let trie = data.trie();

        // Every suffix id must be reachable: walk each indexed suffix and
        // confirm the stored id matches an existing inverted list.
        let mut seen = vec![false; data.suffix_count() as usize];
        for id in 0..data.dwords_num() {
            let key = data.key(id);
            let min_len = EngineConfig::default().min_suffix_len(key.len());
            for j in 0..=(key.len() - min_len) {
                let suffix = &key[j..];
                let sid = walk(trie, suffix).expect("indexed suffix must be in the trie");
                assert!(data.suffix_list(sid).unwrap().contains(&id));
                seen[sid as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "every suffix id must be owned");

        fn walk(trie: &crate::index::trie::Trie, key: &[u8]) -> Option<u32> {
            let mut node = INITIAL_NODE;
            let mut depth = 0;
            loop {
                let base = trie.get_base(node);
                if base < 0 {
                    let tail = trie.tail_at(-base as usize);
                    let rest = &key[depth..];
                    if tail.strlen() == rest.len() && tail.match_prefix(rest) == rest.len() {
                        return Some(tail.value());
                    }
                    return None;
                }
                let label = if depth == key.len() { 0 } else { key[depth] };
                node = trie.descend(node, label);
                if node == INVALID_NODE {
                    return None;
                }
                if label != 0 {
                    depth += 1;
                }
            }
        }
    }
}
