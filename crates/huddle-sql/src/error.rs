//! Error types for query building

use thiserror::Error;

/// Errors raised when checking field paths against a record schema
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path does not name a selectable field
    #[error("unknown field path `{path}` on record `{record}`")]
    Unknown { path: String, record: String },

    /// An empty entry in a field list
    #[error("empty field path on record `{record}`")]
    Empty { record: String },
}
