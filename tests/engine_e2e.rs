//! End-to-end scenarios: build a database from a dictionary file, load it,
//! and check exact search outcomes.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use subdex::{Engine, EngineConfig, Query};
use tempfile::{tempdir, TempDir};

fn write_dict(lines: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dict.tsv");
    fs::write(&path, lines).unwrap();
    (dir, path)
}

fn built_engine(lines: &[u8]) -> (TempDir, Engine) {
    let (dir, dict) = write_dict(lines);
    let mut engine = Engine::new();
    engine.build(&dict, None).unwrap();
    (dir, engine)
}

fn dword_set(engine: &Engine, query: &Query) -> BTreeSet<Vec<u8>> {
    engine
        .search(query)
        .iter()
        .map(|hit| hit.dword.to_vec())
        .collect()
}

fn youth_query() -> Query {
    Query {
        min_common_len: 4,
        min_dword_len: 0,
        max_dword_len: 20,
        limit: 10,
        ..Query::new(&b"youthe"[..])
    }
}

const YOUTH_DICT: &[u8] = b"youthful\t1\nyouthfully\t2\nyouthfulness\t3\n";

#[test]
fn scenario_substring_search() {
    let (_dir, engine) = built_engine(YOUTH_DICT);
    assert_eq!(engine.dwords_num(), 3);

    let hits = engine.search(&youth_query());
    let expected: BTreeSet<Vec<u8>> = [
        b"youthful".to_vec(),
        b"youthfully".to_vec(),
        b"youthfulness".to_vec(),
    ]
    .into();
    assert_eq!(dword_set(&engine, &youth_query()), expected);

    // The match against "youth" is found at the start of every word.
    let at_start: Vec<_> = hits.iter().filter(|h| h.start_pos == 0).collect();
    assert_eq!(at_start.len(), 3);
    for hit in at_start {
        assert_eq!(hit.common_len, 5);
    }
}

#[test]
fn scenario_prefix_only() {
    let (_dir, engine) = built_engine(YOUTH_DICT);

    let query = Query {
        com_prefix_only: true,
        ..youth_query()
    };
    let hits = engine.search(&query);

    assert_eq!(hits.len(), 3);
    for hit in &hits {
        assert_eq!(hit.start_pos, 0);
        assert_eq!(hit.common_len, 5);
    }
}

#[test]
fn scenario_min_common_len_excludes_short_overlaps() {
    let (_dir, engine) = built_engine(b"hopeful\t10\nhopefully\t20\nnope\t30\n");

    let query = Query {
        min_common_len: 4,
        min_dword_len: 0,
        max_dword_len: 20,
        limit: 100,
        ..Query::new(&b"hopeful"[..])
    };
    // "nope" shares only "ope" (3 bytes) with the query.
    let expected: BTreeSet<Vec<u8>> = [b"hopeful".to_vec(), b"hopefully".to_vec()].into();
    assert_eq!(dword_set(&engine, &query), expected);

    for hit in engine.search(&query) {
        if hit.start_pos == 0 {
            assert!(hit.common_len >= 7);
        }
        assert_ne!(hit.dword, b"nope");
    }
}

#[test]
fn scenario_empty_dictionary() {
    let (_dir, engine) = built_engine(b"");
    assert_eq!(engine.dwords_num(), 0);

    for word in [&b"anything"[..], b"a", b""] {
        let query = Query {
            min_common_len: 1,
            ..Query::new(word)
        };
        assert!(engine.search(&query).is_empty());
    }
}

#[test]
fn scenario_zero_limit() {
    let (_dir, engine) = built_engine(YOUTH_DICT);
    let query = Query {
        limit: 0,
        ..youth_query()
    };
    assert!(engine.search(&query).is_empty());
}

#[test]
fn scenario_query_shorter_than_min_common() {
    let (_dir, engine) = built_engine(YOUTH_DICT);
    let query = Query {
        min_common_len: 7,
        ..youth_query()
    };
    assert!(engine.search(&query).is_empty());
}

#[test]
fn scenario_build_write_read_roundtrip() {
    let (dir, dict) = write_dict(YOUTH_DICT);
    let db = dir.path().join("words.db");

    let mut builder = Engine::new();
    builder.build(&dict, Some(&db)).unwrap();

    let mut loaded = Engine::new();
    let used = loaded.read(&db).unwrap();
    assert!(used > 0);
    assert_eq!(used as u64, fs::metadata(&db).unwrap().len());
    assert_eq!(loaded.dwords_num(), 3);

    let query = youth_query();
    let from_build = builder.search(&query);
    let from_disk = loaded.search(&query);
    assert_eq!(from_build.len(), from_disk.len());
    for (a, b) in from_build.iter().zip(&from_disk) {
        assert_eq!(a.dword, b.dword);
        assert_eq!(a.value, b.value);
        assert_eq!(a.start_pos, b.start_pos);
        assert_eq!(a.common_len, b.common_len);
    }
}

#[test]
fn scenario_corrupted_db_stays_unloaded() {
    let (dir, dict) = write_dict(YOUTH_DICT);
    let db = dir.path().join("words.db");

    let mut engine = Engine::new();
    engine.build(&dict, Some(&db)).unwrap();

    let mut bytes = fs::read(&db).unwrap();
    bytes[0] ^= 0xff;
    fs::write(&db, &bytes).unwrap();

    let mut engine = Engine::new();
    assert!(engine.read(&db).is_err());
    assert!(!engine.is_loaded());
    assert!(engine.search(&youth_query()).is_empty());
}

#[test]
fn scenario_custom_suffix_ratio() {
    // ratio 1.0 indexes only whole words, so interior matches disappear.
    let (_dir, dict) = write_dict(b"hopeful\t10\nhopefully\t20\n");
    let mut engine = Engine::with_config(EngineConfig {
        suffix_ratio: 1.0,
        min_suffix: 2,
    })
    .unwrap();
    engine.build(&dict, None).unwrap();

    let query = Query {
        min_common_len: 4,
        min_dword_len: 0,
        max_dword_len: 20,
        limit: 100,
        ..Query::new(&b"opeful"[..])
    };
    // "opeful" only matches one byte into the words, but those offsets are
    // no longer indexed.
    assert!(engine.search(&query).is_empty());

    let query = Query {
        word: b"hopeful".to_vec(),
        ..query
    };
    let expected: BTreeSet<Vec<u8>> = [b"hopeful".to_vec(), b"hopefully".to_vec()].into();
    assert_eq!(dword_set(&engine, &query), expected);
}

#[test]
fn scenario_restricted_char_table() {
    let (_dir, dict) = write_dict(b"ab\t1\nad\t2\n");
    let mut engine = Engine::new();
    engine.build(&dict, None).unwrap();

    let query = Query {
        min_common_len: 1,
        min_dword_len: 0,
        max_dword_len: 20,
        limit: 10,
        ..Query::new(&b"a"[..])
    };
    let expected: BTreeSet<Vec<u8>> = [b"ab".to_vec(), b"ad".to_vec()].into();
    assert_eq!(dword_set(&engine, &query), expected);

    let mut table: Vec<u8> = (0..=255).filter(|&b| b != b'd').collect();
    engine.set_char_table(&table).unwrap();
    let expected: BTreeSet<Vec<u8>> = [b"ab".to_vec()].into();
    assert_eq!(dword_set(&engine, &query), expected);

    // Tables without the NUL edge are rejected outright.
    table.retain(|&b| b != 0);
    assert!(engine.set_char_table(&table).is_err());
}
