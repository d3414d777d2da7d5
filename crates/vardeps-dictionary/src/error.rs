//! Dictionary error types

use vardeps_core::{Source, TextEncoding};

/// Errors raised while reading a dictionary file
///
/// The public loader absorbs these into an empty table; they surface only
/// through `try_load_table` and the logs.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read dictionary file {0}: {1}")]
    IoError(String, String),

    #[error("Unrecognized dictionary format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to open spreadsheet {0}: {1}")]
    SpreadsheetError(String, String),

    #[error("Spreadsheet {0} has no sheets")]
    NoSheet(String),

    #[error("Invalid {encoding} byte 0x{byte:02X} at offset {offset}")]
    DecodeError {
        encoding: TextEncoding,
        byte: u8,
        offset: usize,
    },

    #[error("Malformed delimited text at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Failed to load {0} with any attempted encoding")]
    EncodingsExhausted(String),
}

/// Data-integrity errors in the dictionary content
///
/// These are never absorbed: a malformed dependency would silently corrupt
/// the graph.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Malformed parent_dependency for variable '{variable}': {message}")]
    MalformedDependency { variable: String, message: String },

    #[error("parent_dependency for variable '{variable}' must be a JSON object, found {found}")]
    NotAnObject { variable: String, found: String },

    #[error("Dependency of variable '{variable}' under {data_source} must be a name or a list of names, found {found}")]
    InvalidDependencyShape {
        variable: String,
        data_source: Source,
        found: String,
    },
}
