//! The engine facade
//!
//! An [`Engine`] is either Unloaded or Loaded. `build` and `read` move it to
//! Loaded; `clear` moves it back. Searching an Unloaded engine returns zero
//! results without error. Once Loaded, the index is immutable: `search`
//! takes `&self` and keeps all per-query state on the call stack, so any
//! number of readers may query one engine concurrently.

use crate::error::{Error, Result};
use crate::index::build::build_index;
use crate::index::reader::IndexData;
use crate::index::types::EngineConfig;
use crate::index::writer::write_db;
use crate::query::executor::{Query, SearchExecutor, SearchHit};
use std::path::Path;

/// A common-substring dictionary search engine.
pub struct Engine {
    config: EngineConfig,
    char_table: Vec<u8>,
    data: Option<IndexData>,
}

impl Engine {
    /// An unloaded engine with the default configuration
    /// (`suffix_ratio = 0.5`, `min_suffix = 2`) and the full byte alphabet.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            char_table: (0..=255).collect(),
            data: None,
        }
    }

    /// An unloaded engine with a custom build configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            char_table: (0..=255).collect(),
            data: None,
        })
    }

    /// Build the index from the dictionary file at `dict_path`; when
    /// `db_path` is given, also persist it. The engine is Loaded afterwards.
    pub fn build(&mut self, dict_path: &Path, db_path: Option<&Path>) -> Result<()> {
        let data = build_index(dict_path, &self.config)?;
        if let Some(path) = db_path {
            write_db(&data, path)?;
        }
        self.data = Some(data);
        Ok(())
    }

    /// Load a database file, returning the number of bytes consumed. On any
    /// failure the engine stays Unloaded.
    pub fn read(&mut self, db_path: &Path) -> Result<usize> {
        self.data = None;
        let (data, used) = IndexData::open(db_path)?;
        self.data = Some(data);
        Ok(used)
    }

    /// Drop the loaded index, returning to Unloaded.
    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Run a query. Unloaded engines, empty queries and zero limits all
    /// yield an empty result set without error.
    pub fn search(&self, query: &Query) -> Vec<SearchHit<'_>> {
        match &self.data {
            Some(data) => SearchExecutor::new(data, &self.char_table).execute(query),
            None => Vec::new(),
        }
    }

    /// Install the byte alphabet used when enumerating trie subtrees: the
    /// table defines which bytes are visible and their visit order. It must
    /// contain the NUL terminator edge and hold at most 256 entries; a
    /// rejected table leaves the previous one installed.
    pub fn set_char_table(&mut self, table: &[u8]) -> Result<()> {
        if table.len() > 256 {
            return Err(Error::Config(format!(
                "char table holds {} entries, at most 256 allowed",
                table.len()
            )));
        }
        if !table.contains(&0) {
            return Err(Error::Config(
                "char table must contain the NUL terminator byte".into(),
            ));
        }
        self.char_table = table.to_vec();
        Ok(())
    }

    pub fn char_table(&self) -> &[u8] {
        &self.char_table
    }

    /// Number of dictionary words in the loaded index (0 when Unloaded).
    pub fn dwords_num(&self) -> u32 {
        self.data.as_ref().map_or(0, |data| data.dwords_num())
    }

    pub fn min_suffix(&self) -> u32 {
        self.config.min_suffix
    }

    pub fn suffix_ratio(&self) -> f64 {
        self.config.suffix_ratio
    }

    /// The loaded index, if any.
    pub fn index(&self) -> Option<&IndexData> {
        self.data.as_ref()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
