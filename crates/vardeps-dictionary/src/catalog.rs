//! Variable dictionary normalization
//!
//! Turns raw dictionary rows into a [`Catalog`]: every entry has a canonical
//! `output_name` and trimmed identifiers. The catalog is built once and then
//! shared read-only by every selection.

use serde::{Deserialize, Serialize};
use crate::table::Table;

/// Dictionary column names (exact, case-sensitive)
pub mod columns {
    pub const V1: &str = "v1";
    pub const V2: &str = "v2";
    pub const MXD: &str = "mxd";
    pub const KILL: &str = "Kill";
    pub const OUTPUT_NAME: &str = "output_name";
    pub const PARENT_DEPENDENCY: &str = "parent_dependency";
}

/// One raw dictionary row, as read from the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryRow {
    /// Identifier under TRAUMABASE-V1
    pub v1: Option<String>,

    /// Identifier under TRAUMABASE-V2
    pub v2: Option<String>,

    /// Identifier under MEDIAXTEND
    pub mxd: Option<String>,

    /// Opaque flag
    #[serde(rename = "Kill")]
    pub kill: Option<String>,

    /// Canonical display name, if already filled in
    pub output_name: Option<String>,

    /// Serialized JSON object: source key -> name or list of names
    pub parent_dependency: Option<String>,
}

impl DictionaryRow {
    /// Read dictionary rows from a table
    ///
    /// Columns are looked up by exact name; a missing column reads as null.
    pub fn from_table(table: &Table) -> Vec<Self> {
        let index = |name: &str| table.column_index(name);
        let (v1, v2, mxd, kill, output_name, parent_dependency) = (
            index(columns::V1),
            index(columns::V2),
            index(columns::MXD),
            index(columns::KILL),
            index(columns::OUTPUT_NAME),
            index(columns::PARENT_DEPENDENCY),
        );

        table
            .rows()
            .map(|row| {
                let get = |col: Option<usize>| col.and_then(|i| row.get(i).cloned().flatten());
                Self {
                    v1: get(v1),
                    v2: get(v2),
                    mxd: get(mxd),
                    kill: get(kill),
                    output_name: get(output_name),
                    parent_dependency: get(parent_dependency),
                }
            })
            .collect()
    }
}

/// A normalized dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableEntry {
    /// Canonical display name (never null)
    pub output_name: String,

    /// Identifier under TRAUMABASE-V1
    pub v1: Option<String>,

    /// Identifier under TRAUMABASE-V2
    pub v2: Option<String>,

    /// Identifier under MEDIAXTEND
    pub mxd: Option<String>,

    /// Opaque flag
    pub kill: Option<String>,

    /// Serialized dependency mapping, untouched
    pub parent_dependency: Option<String>,
}

/// The normalized variable dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<VariableEntry>,
}

impl Catalog {
    /// Read and normalize a loaded table
    pub fn from_table(table: &Table) -> Self {
        normalize(DictionaryRow::from_table(table))
    }

    /// All entries in dictionary order
    pub fn entries(&self) -> &[VariableEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the first entry with the given output name
    pub fn get(&self, output_name: &str) -> Option<&VariableEntry> {
        self.entries.iter().find(|e| e.output_name == output_name)
    }

    /// Selectable variable names, in dictionary order
    pub fn variable_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.output_name.as_str()).collect()
    }
}

/// Normalize raw rows into a catalog
///
/// `output_name` falls back to `v2`, then `v1`, then `mxd`, before any
/// trimming. Non-null identifiers are then trimmed; nulls stay null. A row
/// with none of the four names has no identity and is skipped.
pub fn normalize(rows: Vec<DictionaryRow>) -> Catalog {
    let entries = rows
        .into_iter()
        .filter_map(|row| {
            let output_name = row
                .output_name
                .or_else(|| row.v2.clone())
                .or_else(|| row.v1.clone())
                .or_else(|| row.mxd.clone())?;

            Some(VariableEntry {
                output_name: trim(output_name),
                v1: row.v1.map(trim),
                v2: row.v2.map(trim),
                mxd: row.mxd.map(trim),
                kill: row.kill.map(trim),
                parent_dependency: row.parent_dependency,
            })
        })
        .collect();

    Catalog { entries }
}

fn trim(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}
