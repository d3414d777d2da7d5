//! Scope filtering of extracted dependencies

use crate::extract::DependencyTable;

/// Narrow a dependency table to one variable's scope
///
/// With no variable the table is returned unchanged. Otherwise the result
/// holds the rows of variables that directly depend on `variable`; if there
/// are none, it holds the row of `variable` itself so a leaf still shows up.
pub fn filter(table: &DependencyTable, variable: Option<&str>) -> DependencyTable {
    let Some(name) = variable else {
        return table.clone();
    };

    let dependents: DependencyTable = table
        .rows()
        .iter()
        .filter(|row| row.depends_on(name))
        .cloned()
        .collect();

    if !dependents.is_empty() {
        return dependents;
    }

    table
        .rows()
        .iter()
        .filter(|row| row.variable == name)
        .cloned()
        .collect()
}
