//! Configuration schema (vardeps.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::source::Source;

/// Text encoding tried when decoding delimited dictionaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Latin-1 (every byte maps to U+0000..U+00FF)
    #[serde(rename = "latin1")]
    Latin1,

    /// UTF-8
    #[serde(rename = "utf-8")]
    Utf8,

    /// ISO-8859-1 (same mapping as Latin-1, kept as a distinct label)
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,

    /// Windows code page 1252
    #[serde(rename = "cp1252")]
    Windows1252,
}

impl TextEncoding {
    /// Stable label of the encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latin1 => "latin1",
            Self::Utf8 => "utf-8",
            Self::Iso8859_1 => "iso-8859-1",
            Self::Windows1252 => "cp1252",
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dictionary loading settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Candidate encodings for delimited text, tried in order
    #[serde(default = "default_encodings")]
    pub encodings: Vec<TextEncoding>,

    /// Field separator for delimited text
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_encodings() -> Vec<TextEncoding> {
    vec![
        TextEncoding::Latin1,
        TextEncoding::Utf8,
        TextEncoding::Iso8859_1,
        TextEncoding::Windows1252,
    ]
}

fn default_delimiter() -> char {
    ';'
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
            delimiter: default_delimiter(),
        }
    }
}

/// Settings handed to the graph renderer
///
/// The core never renders; these values travel with the exported graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas height (CSS length)
    #[serde(default = "default_height")]
    pub height: String,

    /// Canvas width (CSS length)
    #[serde(default = "default_width")]
    pub width: String,

    /// Draw edges with arrow heads
    #[serde(default = "default_true")]
    pub directed: bool,
}

fn default_height() -> String {
    "700px".to_string()
}

fn default_width() -> String {
    "100%".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            width: default_width(),
            directed: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the variable dictionary (.xlsx or .csv)
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,

    /// Source used when none is given on the command line
    #[serde(default)]
    pub source: Option<Source>,

    /// Loader settings
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Renderer settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_dictionary() -> PathBuf {
    PathBuf::from("data").join("dict.xlsx")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            source: None,
            loader: LoaderConfig::default(),
            render: RenderConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Dictionary path, resolved against the project root when relative
    pub fn dictionary_path(&self) -> PathBuf {
        if self.dictionary.is_relative() {
            self.project_root.join(&self.dictionary)
        } else {
            self.dictionary.clone()
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.dictionary, PathBuf::from("data/dict.xlsx"));
        assert_eq!(config.source, None);
        assert_eq!(config.loader.delimiter, ';');
        assert_eq!(
            config.loader.encodings,
            vec![
                TextEncoding::Latin1,
                TextEncoding::Utf8,
                TextEncoding::Iso8859_1,
                TextEncoding::Windows1252,
            ]
        );
        assert_eq!(config.render.height, "700px");
        assert_eq!(config.render.width, "100%");
        assert!(config.render.directed);
    }

    #[test]
    fn parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            dictionary = "dict.csv"
            source = "TRAUMABASE-V2"

            [loader]
            encodings = ["utf-8", "cp1252"]

            [render]
            height = "900px"
            "#,
        )
        .unwrap();

        assert_eq!(config.dictionary, PathBuf::from("dict.csv"));
        assert_eq!(config.source, Some(Source::TraumabaseV2));
        assert_eq!(config.loader.encodings, vec![TextEncoding::Utf8, TextEncoding::Windows1252]);
        assert_eq!(config.loader.delimiter, ';');
        assert_eq!(config.render.height, "900px");
        assert_eq!(config.render.width, "100%");
        assert!(config.render.directed);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let result = Config::from_toml(r#"source = "TRAUMABASE-V9""#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vardeps.toml");

        let mut config = Config::default();
        config.source = Some(Source::Mediaxtend);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.source, Some(Source::Mediaxtend));
        assert_eq!(loaded.loader, config.loader);
        assert_eq!(loaded.project_root, dir.path());
        assert_eq!(loaded.dictionary_path(), dir.path().join("data").join("dict.xlsx"));
    }
}
