//! Graph report schema (stable v1)
//!
//! This is the plain-data hand-off to a renderer: node list, edge list and
//! render settings. Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::config::RenderConfig;
use crate::source::Source;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A direct dependency: `child` cannot be computed without `parent`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Required variable
    pub parent: String,

    /// Dependent variable
    pub child: String,
}

impl DependencyEdge {
    /// Create a new edge `parent -> child`
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

impl std::fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.parent, self.child)
    }
}

/// Variables covered by a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "variables", rename_all = "lowercase")]
pub enum ReportScope {
    /// Every variable of the dictionary
    All,

    /// Only the listed variables and their direct dependents
    Variables(Vec<String>),
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of nodes
    pub nodes: usize,

    /// Number of edges
    pub edges: usize,

    /// Number of dependency rows that fed the graph
    pub rows: usize,
}

/// Graph report (graph.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Source the dependencies were read from
    pub source: Source,

    /// Selected scope
    pub scope: ReportScope,

    /// Renderer settings
    pub render: RenderConfig,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Node names, in first-seen order
    pub nodes: Vec<String>,

    /// Edges, in first-seen order
    pub edges: Vec<DependencyEdge>,
}

impl GraphReport {
    /// Create a report from a node and edge set
    pub fn new(
        source: Source,
        scope: ReportScope,
        render: RenderConfig,
        rows: usize,
        nodes: Vec<String>,
        edges: Vec<DependencyEdge>,
    ) -> Self {
        let summary = ReportSummary {
            nodes: nodes.len(),
            edges: edges.len(),
            rows,
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source,
            scope,
            render,
            summary,
            nodes,
            edges,
        }
    }

    /// Check if the report has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> GraphReport {
        GraphReport::new(
            Source::TraumabaseV1,
            ReportScope::Variables(vec!["AGE".to_string()]),
            RenderConfig::default(),
            1,
            vec!["HR".to_string(), "AGE".to_string(), "WEIGHT".to_string()],
            vec![DependencyEdge::new("AGE", "HR"), DependencyEdge::new("WEIGHT", "HR")],
        )
    }

    #[test]
    fn summary_counts() {
        let report = sample_report();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.nodes, 3);
        assert_eq!(report.summary.edges, 2);
        assert_eq!(report.summary.rows, 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn report_serialization() {
        let json = sample_report().to_json().unwrap();
        assert!(json.contains("\"TRAUMABASE-V1\""));
        assert!(json.contains("\"kind\": \"variables\""));
        assert!(json.contains("\"parent\": \"AGE\""));
        assert!(json.contains("\"height\": \"700px\""));

        let parsed: GraphReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.edges[1], DependencyEdge::new("WEIGHT", "HR"));
    }

    #[test]
    fn all_scope_serialization() {
        let json = serde_json::to_string(&ReportScope::All).unwrap();
        assert_eq!(json, r#"{"kind":"all"}"#);
    }

    #[test]
    fn edge_display() {
        assert_eq!(DependencyEdge::new("AGE", "HR").to_string(), "AGE -> HR");
    }
}
