//! Crate error types
//!
//! Loaders return these instead of panicking; callers decide whether a
//! failure skips a level or aborts the tool.

use thiserror::Error;

use crate::sim::property::PropertyFlag;

/// Errors raised while loading, saving or querying game data.
#[derive(Error, Debug)]
pub enum Error {
    /// A file, archive element or named record does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// Human-readable description of what was looked up.
        what: String,
    },

    /// A property flag was requested from a description that lacks it.
    #[error("missing property {0:?}")]
    MissingProperty(PropertyFlag),

    /// Corrupt or truncated data.
    #[error("format error: {0}")]
    Format(String),

    /// Archive header carries flags this reader does not understand.
    #[error("unsupported archive flags {0:#x}")]
    UnsupportedFlags(u32),

    /// Entity set has more distinct names than the one-byte string table holds.
    #[error("entity set has {0} distinct names, the format holds at most 255")]
    TooManyNames(usize),

    /// Attempted to replace an owned property with a borrowed handle or vice versa.
    #[error("property {0:?} cannot change between owned bytes and a borrowed handle")]
    OwnershipMismatch(PropertyFlag),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Settings file could not be (de)serialized.
    #[error(transparent)]
    Settings(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
