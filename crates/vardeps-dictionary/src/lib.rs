//! Variable dictionary parsing
//!
//! This crate handles:
//! - Loading the dictionary table (spreadsheet or `;`-separated text)
//! - Normalizing it into a [`Catalog`]
//! - Extracting per-source direct dependencies
//! - Filtering dependencies to a selected variable

pub mod table;
pub mod encoding;
pub mod delimited;
pub mod loader;
pub mod catalog;
pub mod extract;
pub mod filter;
pub mod error;

pub use table::Table;
pub use loader::{load_table, try_load_table, DictionaryFormat};
pub use catalog::{normalize, Catalog, DictionaryRow, VariableEntry};
pub use extract::{extract, DependencyRow, DependencyTable};
pub use filter::filter;
pub use error::{DictionaryError, LoadError};
