//! Dependency graph (DAG) construction and traversal
//!
//! Builds forward and reverse dependency edges from a scoped dependency table.
//! Edges point from a required variable to the variable computed from it.

use std::collections::{HashMap, HashSet, VecDeque};

use vardeps_core::DependencyEdge;
use vardeps_dictionary::DependencyTable;

/// Node identifier (variable name)
pub type NodeId = String;

/// Directed dependency graph with forward and reverse edges
///
/// Adding a node or an edge that already exists is a no-op. Nodes and edges
/// keep first-seen order so exports are deterministic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Forward edges: node -> list of nodes it depends on (parents)
    parents: HashMap<NodeId, Vec<NodeId>>,

    /// Reverse edges: node -> list of nodes that depend on it (children)
    children: HashMap<NodeId, Vec<NodeId>>,

    /// All nodes, in insertion order
    nodes: Vec<NodeId>,

    /// Membership index over `nodes`
    node_index: HashSet<NodeId>,

    /// All edges, in insertion order
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dependency graph from `(variable, dependency)` rows
    pub fn from_dependency_table(table: &DependencyTable) -> Self {
        let mut graph = Self::new();
        graph.extend_from_table(table);
        graph
    }

    /// Add every row of a table to this graph
    pub fn extend_from_table(&mut self, table: &DependencyTable) {
        for row in table.rows() {
            self.add_node(&row.variable);

            for dep in &row.dependency {
                self.add_node(dep);
                self.add_edge(dep, &row.variable);
            }
        }
    }

    /// Add a node; returns false if it was already present
    pub fn add_node(&mut self, node_id: &str) -> bool {
        if self.node_index.contains(node_id) {
            return false;
        }

        self.node_index.insert(node_id.to_string());
        self.nodes.push(node_id.to_string());
        true
    }

    /// Add the edge `parent -> child`, adding missing endpoints
    ///
    /// Returns false if the edge was already present. Self-loops are allowed.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> bool {
        if self.has_edge(parent, child) {
            return false;
        }

        self.add_node(parent);
        self.add_node(child);

        self.parents
            .entry(child.to_string())
            .or_default()
            .push(parent.to_string());
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
        self.edges.push(DependencyEdge::new(parent, child));
        true
    }

    /// Get all nodes in the graph
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Get all edges in the graph
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a node exists
    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node_index.contains(node_id)
    }

    /// Check if the edge `parent -> child` exists
    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        self.parents
            .get(child)
            .is_some_and(|deps| deps.iter().any(|p| p == parent))
    }

    /// Get immediate parents (dependencies) of a node
    pub fn parents(&self, node_id: &str) -> Vec<&NodeId> {
        self.parents
            .get(node_id)
            .map(|deps| deps.iter().collect())
            .unwrap_or_default()
    }

    /// Get immediate children (dependents) of a node
    pub fn children(&self, node_id: &str) -> Vec<&NodeId> {
        self.children
            .get(node_id)
            .map(|deps| deps.iter().collect())
            .unwrap_or_default()
    }

    /// Get all downstream nodes (transitive closure of children)
    ///
    /// These are the variables that can no longer be computed if `node_id`
    /// is missing.
    pub fn downstream(&self, node_id: &str) -> Vec<NodeId> {
        Self::reachable(&self.children, node_id)
    }

    /// Get all upstream nodes (transitive closure of parents)
    pub fn upstream(&self, node_id: &str) -> Vec<NodeId> {
        Self::reachable(&self.parents, node_id)
    }

    /// BFS over one edge direction, excluding the start unless a cycle leads back
    fn reachable(adjacency: &HashMap<NodeId, Vec<NodeId>>, node_id: &str) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        if let Some(next) = adjacency.get(node_id) {
            queue.extend(next.iter().cloned());
        }

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            if let Some(next) = adjacency.get(&current) {
                queue.extend(next.iter().filter(|n| !visited.contains(*n)).cloned());
            }

            result.push(current);
        }

        result
    }

    /// Check if there's a path from source to target
    pub fn has_path(&self, source: &str, target: &str) -> bool {
        self.downstream(source).iter().any(|n| n == target)
    }

    /// Get topological sort of all nodes (parents before children)
    ///
    /// Returns `None` if the graph has a cycle.
    pub fn topological_sort(&self) -> Option<Vec<NodeId>> {
        let mut in_degree: HashMap<&str, usize> = self
            .nodes
            .iter()
            .map(|node| (node.as_str(), self.parents.get(node).map_or(0, Vec::len)))
            .collect();

        // Find nodes with no dependencies, in insertion order
        let mut queue: VecDeque<&str> = self
            .nodes
            .iter()
            .map(String::as_str)
            .filter(|node| in_degree.get(node) == Some(&0))
            .collect();

        let mut result = Vec::with_capacity(self.nodes.len());

        // Kahn's algorithm
        while let Some(node) = queue.pop_front() {
            result.push(node.to_string());

            for child in self.children.get(node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(child.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child.as_str());
                    }
                }
            }
        }

        // Check if all nodes were visited (no cycles)
        if result.len() == self.nodes.len() {
            Some(result)
        } else {
            None
        }
    }
}
