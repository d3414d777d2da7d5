//! vardeps graph engine
//!
//! This crate turns dictionary dependencies into a graph:
//! - Dependency graph construction and traversal
//! - Selection validation and the extract/filter/build pipeline
//! - Report generation for renderers

pub mod dag;
pub mod selection;

pub use dag::{DependencyGraph, NodeId};
pub use selection::{build_graph, build_report, scoped_dependencies, Scope, Selection, SelectionGuidance};
