//! Common-substring query execution
//!
//! A query word is matched against the suffix trie once per starting offset:
//! each query suffix is walked through the trie to its deepest reachable
//! node, then every visited node at least `min_common_len` deep is revisited
//! and its subtree enumerated (skipping the branch already covered) to
//! collect all indexed dictionary suffixes sharing that prefix. Each suffix's
//! inverted list yields the owning words, filtered by length bounds and
//! capped by the result limit.
//!
//! All traversal state lives in locals, so one loaded index serves any
//! number of concurrent searches.

use crate::index::reader::IndexData;
use crate::index::trie::{NodeId, INITIAL_NODE, INVALID_NODE};
use crate::index::types::SuffixId;
use std::collections::VecDeque;

/// A common-substring search request.
#[derive(Debug, Clone)]
pub struct Query {
    /// The query word, as raw bytes.
    pub word: Vec<u8>,
    /// Minimum common substring length required.
    pub min_common_len: u32,
    /// Dictionary words shorter than this are dropped (inclusive bound).
    pub min_dword_len: u32,
    /// Dictionary words longer than this are dropped (inclusive bound).
    pub max_dword_len: u32,
    /// Maximum number of results collected.
    pub limit: u32,
    /// Enumerate subtrees depth-first instead of breadth-first.
    pub depth_first_search: bool,
    /// Match only against the start of the query (single starting offset).
    pub com_prefix_only: bool,
    /// Grant each starting offset up to `limit` fresh results instead of
    /// one cumulative cap that lets early offsets starve later ones.
    pub average_limit: bool,
}

impl Query {
    /// A query with permissive defaults: no length bounds, no limit,
    /// breadth-first, all starting offsets.
    pub fn new(word: impl Into<Vec<u8>>) -> Self {
        Self {
            word: word.into(),
            min_common_len: 1,
            min_dword_len: 0,
            max_dword_len: u32::MAX,
            limit: u32::MAX,
            depth_first_search: false,
            com_prefix_only: false,
            average_limit: false,
        }
    }
}

/// One search result, borrowing the loaded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// The matched dictionary word.
    pub dword: &'a [u8],
    /// The word's associated value.
    pub value: &'a [u8],
    /// Offset in `dword` where the common substring starts.
    pub start_pos: u32,
    /// Length of the common substring.
    pub common_len: u32,
}

/// Executes queries against a loaded index.
pub struct SearchExecutor<'a> {
    data: &'a IndexData,
    char_table: &'a [u8],
}

/// Label set used when the enumerated suffix has reached `max_dword_len`:
/// only the word-terminating edge may still produce results.
const NUL_EDGE: [u8; 1] = [0];

impl<'a> SearchExecutor<'a> {
    pub fn new(data: &'a IndexData, char_table: &'a [u8]) -> Self {
        Self { data, char_table }
    }

    /// Run `query`, returning all hits.
    pub fn execute(&self, query: &Query) -> Vec<SearchHit<'a>> {
        let mut results = Vec::new();
        if query.word.len() < query.min_common_len as usize || query.limit == 0 {
            return results;
        }

        if query.com_prefix_only {
            self.compre_search(query, &query.word, query.limit as usize, &mut results);
        } else {
            let last_offset = query.word.len() - query.min_common_len as usize;
            for offset in 0..=last_offset {
                let cap = if query.average_limit {
                    results.len().saturating_add(query.limit as usize)
                } else {
                    query.limit as usize
                };
                self.compre_search(query, &query.word[offset..], cap, &mut results);
            }
        }
        results
    }

    /// Match one query suffix against the trie and collect everything under
    /// the common prefixes of length ≥ `min_common_len`.
    fn compre_search(
        &self,
        query: &Query,
        word: &[u8],
        limit: usize,
        results: &mut Vec<SearchHit<'a>>,
    ) -> usize {
        let min_common = query.min_common_len as usize;
        let max_dword = query.max_dword_len as usize;
        if min_common > word.len() || query.min_common_len > query.max_dword_len {
            return 0;
        }

        let trie = self.data.trie();
        let mut found = 0;
        let mut node = INITIAL_NODE;
        let mut match_len: usize = 0;
        // Visited interior nodes deep enough to be worth enumerating.
        let mut walked: Vec<NodeId> = Vec::new();

        while match_len < word.len() && match_len <= max_dword {
            node = trie.descend(node, word[match_len]);
            if node == INVALID_NODE {
                break;
            }
            match_len += 1;
            let base = trie.get_base(node);
            if base < 0 {
                // Terminal record: the stored suffix continues in the tail.
                // Extend the match against it, then fall back to the last
                // interior node for backtracking.
                let tail = trie.tail_at(-base as usize);
                let tail_len = tail.strlen();
                let suffix_len = match_len + tail_len;
                let walked_len = match_len;
                match_len += tail.match_prefix(&word[match_len..]);
                if match_len >= min_common {
                    found += self.retrieve_dword(
                        query,
                        match_len,
                        tail.value(),
                        suffix_len,
                        limit,
                        results,
                    );
                }
                match_len = walked_len - 1;
                break;
            }
            if match_len >= min_common {
                walked.push(node);
            }
        }

        // Backtrack: enumerate each walked node's subtree, excluding the
        // branch the previous (deeper) iteration already covered.
        let mut except = INVALID_NODE;
        while let Some(start) = walked.pop() {
            found += self.enumerate_subtree(query, start, match_len, except, limit, results);
            except = start;
            match_len -= 1;
        }
        found
    }

    /// Collect every indexed suffix in the subtree under `start`, whose
    /// common prefix with the query is `match_len` bytes long.
    fn enumerate_subtree(
        &self,
        query: &Query,
        start: NodeId,
        match_len: usize,
        except: NodeId,
        limit: usize,
        results: &mut Vec<SearchHit<'a>>,
    ) -> usize {
        let max_dword = query.max_dword_len as usize;
        if match_len > max_dword || results.len() >= limit {
            return 0;
        }

        let trie = self.data.trie();
        let mut found = 0;
        // (node, suffix length so far); drained as a queue for BFS, as a
        // stack for DFS.
        let mut pending: VecDeque<(NodeId, usize)> = VecDeque::new();
        pending.push_back((start, match_len));

        while results.len() < limit {
            let popped = if query.depth_first_search {
                pending.pop_back()
            } else {
                pending.pop_front()
            };
            let Some((node, suffix_len)) = popped else {
                break;
            };

            let base = trie.get_base(node);
            if base < 0 {
                let tail = trie.tail_at(-base as usize);
                let full_len = suffix_len + tail.strlen();
                if full_len <= max_dword {
                    found += self.retrieve_dword(
                        query,
                        match_len,
                        tail.value(),
                        full_len,
                        limit,
                        results,
                    );
                }
            } else if suffix_len <= max_dword {
                let labels: &[u8] = if suffix_len == max_dword {
                    &NUL_EDGE
                } else {
                    self.char_table
                };
                if query.depth_first_search {
                    // Reverse push order so the stack pops in table order.
                    for &label in labels.iter().rev() {
                        self.push_child(&mut pending, node, suffix_len, label, except);
                    }
                } else {
                    for &label in labels {
                        self.push_child(&mut pending, node, suffix_len, label, except);
                    }
                }
            }
        }
        found
    }

    fn push_child(
        &self,
        pending: &mut VecDeque<(NodeId, usize)>,
        node: NodeId,
        suffix_len: usize,
        label: u8,
        except: NodeId,
    ) {
        let child = self.data.trie().descend(node, label);
        if child == except || child == INVALID_NODE {
            return;
        }
        // The NUL edge marks "a word ends here"; it consumes no byte.
        let child_len = if label == 0 { suffix_len } else { suffix_len + 1 };
        pending.push_back((child, child_len));
    }

    /// Pull words from the inverted list of `suffix_id`, skipping those
    /// outside the query's length bounds.
    fn retrieve_dword(
        &self,
        query: &Query,
        match_len: usize,
        suffix_id: SuffixId,
        suffix_len: usize,
        limit: usize,
        results: &mut Vec<SearchHit<'a>>,
    ) -> usize {
        let data = self.data;
        let Some(list) = data.suffix_list(suffix_id) else {
            // The id came out of our own tail records; failing to resolve
            // it means the database is inconsistent with itself.
            panic!(
                "suffix id {} out of range ({} inverted lists)",
                suffix_id,
                data.suffix_count()
            );
        };
        if results.len() >= limit {
            return 0;
        }

        let mut found = 0;
        let from = list.partition_point(|&id| data.key_len(id) < query.min_dword_len);
        for &id in &list[from..] {
            // The list is ordered by key length.
            if data.key_len(id) > query.max_dword_len {
                break;
            }
            results.push(SearchHit {
                dword: data.key(id),
                value: data.value(id),
                start_pos: data.key_len(id) - suffix_len as u32,
                common_len: match_len as u32,
            });
            found += 1;
            if results.len() >= limit {
                break;
            }
        }
        found
    }
}
