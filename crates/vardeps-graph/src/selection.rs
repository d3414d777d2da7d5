//! Selection pipeline
//!
//! Runs extract -> filter -> build for one user selection against an
//! already normalized [`Catalog`]. Nothing is cached between selections.

use vardeps_core::{GraphReport, RenderConfig, ReportScope, Source};
use vardeps_dictionary::{extract, filter, Catalog, DependencyTable, DictionaryError};

use crate::dag::DependencyGraph;

/// Which variables a selection covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every variable of the dictionary
    All,

    /// Each listed variable, filtered independently and concatenated
    Variables(Vec<String>),
}

impl From<&Scope> for ReportScope {
    fn from(scope: &Scope) -> Self {
        match scope {
            Scope::All => ReportScope::All,
            Scope::Variables(vars) => ReportScope::Variables(vars.clone()),
        }
    }
}

/// Raw user choices, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Chosen source, if any
    pub source: Option<Source>,

    /// "Show all variables" answer, if given
    pub show_all: Option<bool>,

    /// Chosen variables
    pub variables: Vec<String>,
}

/// Why a selection cannot be run yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionGuidance {
    #[error("Choose at least 1 source to start")]
    MissingSource,

    #[error("Choose to visualize one variable or all")]
    MissingScope,

    #[error("Choose at least 1 variable to start")]
    MissingVariable,
}

impl Selection {
    /// Check the selection and resolve it into a source and a scope
    pub fn validate(&self) -> Result<(Source, Scope), SelectionGuidance> {
        let source = self.source.ok_or(SelectionGuidance::MissingSource)?;

        match self.show_all {
            None => Err(SelectionGuidance::MissingScope),
            Some(true) => Ok((source, Scope::All)),
            Some(false) if self.variables.is_empty() => Err(SelectionGuidance::MissingVariable),
            Some(false) => Ok((source, Scope::Variables(self.variables.clone()))),
        }
    }
}

/// Extract and filter the dependency rows of a selection
///
/// For a variable list the filtered rows are concatenated in order;
/// duplicates are kept and collapse later in the graph.
pub fn scoped_dependencies(
    catalog: &Catalog,
    source: Source,
    scope: &Scope,
) -> Result<DependencyTable, DictionaryError> {
    let extracted = extract(catalog, source)?;

    let scoped = match scope {
        Scope::All => filter(&extracted, None),
        Scope::Variables(vars) => {
            let mut combined = DependencyTable::default();
            for var in vars {
                combined.append(filter(&extracted, Some(var)));
            }
            combined
        }
    };

    tracing::debug!(
        %source,
        extracted = extracted.len(),
        scoped = scoped.len(),
        "Scoped dependency rows"
    );

    Ok(scoped)
}

/// Build the dependency graph of a selection
pub fn build_graph(catalog: &Catalog, source: Source, scope: &Scope) -> Result<DependencyGraph, DictionaryError> {
    let scoped = scoped_dependencies(catalog, source, scope)?;
    Ok(DependencyGraph::from_dependency_table(&scoped))
}

/// Build the renderer hand-off for a selection
pub fn build_report(
    catalog: &Catalog,
    source: Source,
    scope: &Scope,
    render: &RenderConfig,
) -> Result<GraphReport, DictionaryError> {
    let scoped = scoped_dependencies(catalog, source, scope)?;
    let graph = DependencyGraph::from_dependency_table(&scoped);

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built dependency graph"
    );

    Ok(GraphReport::new(
        source,
        scope.into(),
        render.clone(),
        scoped.len(),
        graph.nodes().to_vec(),
        graph.edges().to_vec(),
    ))
}
