//! vardeps core
//!
//! Shared domain types with stable, versioned serialization.
//! Never rename source keys - they are part of the dictionary format.

pub mod source;
pub mod report;
pub mod config;

pub use source::{Source, SourceParseError};
pub use report::{GraphReport, ReportVersion, ReportScope, ReportSummary, DependencyEdge};
pub use config::{Config, ConfigError, LoaderConfig, RenderConfig, TextEncoding};
