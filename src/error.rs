//! Error types.
//!
//! Only malformed input is an error. "No match" is an empty result list and an
//! ambiguous mention is a [`Resolution::Ambiguous`](crate::Resolution) value.

use std::path::PathBuf;
use thiserror::Error;

/// A raw reference that cannot be resolved at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("raw ref has no parts")]
    EmptyRawRef,

    #[error("part span {start}..{end} lies outside the document ({len} chars)")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid mention notation '{0}'")]
    InvalidNotation(String),
}

/// Failures of the corpus layer: loading, lookup and ref parsing.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read library file at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse library data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not parse ref '{0}'")]
    InvalidRef(String),
}

/// Failures of the legacy ref mapping fallback.
#[derive(Debug, Error)]
pub enum LegacyRefError {
    /// The legacy string is absent from the mapping table; callers usually retry
    /// with the live resolver.
    #[error("legacy ref '{0}' is not in the mapping table")]
    MappingKey(String),

    #[error("no legacy parser registered for index '{0}'")]
    NoParser(String),

    #[error(transparent)]
    Library(#[from] LibraryError),
}
