use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine.
///
/// Internal invariant violations (e.g. a suffix id stored in the trie that
/// has no inverted list) are not represented here; they panic, because they
/// can only be produced by a bug in the builder.
#[derive(Debug, Error)]
pub enum Error {
    /// The dictionary or database file could not be opened or read.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The database bytes do not match the expected layout: wrong magic,
    /// unknown version, misaligned or truncated block.
    #[error("malformed database: {0}")]
    Format(String),

    /// A caller-supplied setting was rejected; engine state is unchanged.
    #[error("invalid configuration: {0}")]
    Config(String),
}
