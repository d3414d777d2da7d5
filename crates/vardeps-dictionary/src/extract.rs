//! Per-source dependency extraction
//!
//! Resolves each variable's `parent_dependency` mapping for one source into a
//! plain list of parent names.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vardeps_core::Source;

use crate::catalog::Catalog;
use crate::error::DictionaryError;

/// One variable and its direct parents under a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRow {
    /// Variable name (`output_name`)
    pub variable: String,

    /// Direct parents in recorded order; empty when none are recorded
    pub dependency: Vec<String>,
}

impl DependencyRow {
    /// Create a new row
    pub fn new<I, S>(variable: impl Into<String>, dependency: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variable: variable.into(),
            dependency: dependency.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this variable directly depends on `name`
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependency.iter().any(|d| d == name)
    }
}

/// `(variable, dependency)` rows for one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTable {
    rows: Vec<DependencyRow>,
}

impl DependencyTable {
    /// Create a table from rows
    pub fn new(rows: Vec<DependencyRow>) -> Self {
        Self { rows }
    }

    /// All rows
    pub fn rows(&self) -> &[DependencyRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append the rows of another table (duplicates are kept)
    pub fn append(&mut self, other: DependencyTable) {
        self.rows.extend(other.rows);
    }

    /// Get the row of a variable
    pub fn get(&self, variable: &str) -> Option<&DependencyRow> {
        self.rows.iter().find(|r| r.variable == variable)
    }
}

impl FromIterator<DependencyRow> for DependencyTable {
    fn from_iter<T: IntoIterator<Item = DependencyRow>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for DependencyTable {
    type Item = DependencyRow;
    type IntoIter = std::vec::IntoIter<DependencyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Extract the direct dependencies of every catalog variable for a source
///
/// Yields one row per distinct `output_name`, in catalog order; for a
/// duplicated name the first entry wins.
pub fn extract(catalog: &Catalog, source: Source) -> Result<DependencyTable, DictionaryError> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(catalog.len());

    for entry in catalog.entries() {
        if !seen.insert(entry.output_name.as_str()) {
            continue;
        }

        let dependency = match &entry.parent_dependency {
            Some(raw) => parse_dependency(&entry.output_name, raw, source)?,
            None => Vec::new(),
        };

        rows.push(DependencyRow {
            variable: entry.output_name.clone(),
            dependency,
        });
    }

    Ok(DependencyTable::new(rows))
}

/// Resolve one serialized mapping for a source
fn parse_dependency(variable: &str, raw: &str, source: Source) -> Result<Vec<String>, DictionaryError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| DictionaryError::MalformedDependency {
        variable: variable.to_string(),
        message: e.to_string(),
    })?;

    let mapping = match value {
        Value::Object(mapping) => mapping,
        other => {
            return Err(DictionaryError::NotAnObject {
                variable: variable.to_string(),
                found: json_kind(&other).to_string(),
            })
        }
    };

    let invalid = |found: &Value| DictionaryError::InvalidDependencyShape {
        variable: variable.to_string(),
        data_source: source,
        found: json_kind(found).to_string(),
    };

    match mapping.get(source.as_str()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(name)) => Ok(vec![name.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
            .collect(),
        Some(other) => Err(invalid(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
