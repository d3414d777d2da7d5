//! Dictionary table loading
//!
//! Reads a spreadsheet or a delimited text file into a [`Table`]. Loading
//! never fails from the caller's point of view: problems are logged and an
//! empty table is returned, so a broken file degrades to an empty graph.

use std::path::Path;

use calamine::{Data, Reader};
use vardeps_core::LoaderConfig;

use crate::delimited::parse_delimited;
use crate::encoding::decode;
use crate::error::LoadError;
use crate::table::Table;

/// File formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    /// Workbook; the first sheet is read
    Spreadsheet,

    /// Delimited text with encoding fallback
    Delimited,
}

impl DictionaryFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Delimited),
            _ => None,
        }
    }
}

/// Load a table from a path, returning an empty table on any failure
pub fn load_table(path: &Path, config: &LoaderConfig) -> Table {
    match try_load_table(path, config) {
        Ok(table) => {
            tracing::debug!(
                path = %path.display(),
                columns = table.columns().len(),
                rows = table.len(),
                "Loaded dictionary table"
            );
            table
        }
        Err(e @ LoadError::UnsupportedFormat(_)) => {
            tracing::warn!("{}", e);
            Table::empty()
        }
        Err(e) => {
            tracing::error!("{}", e);
            Table::empty()
        }
    }
}

/// Load a table from a path, reporting why it failed
pub fn try_load_table(path: &Path, config: &LoaderConfig) -> Result<Table, LoadError> {
    match DictionaryFormat::detect(path) {
        Some(DictionaryFormat::Spreadsheet) => load_spreadsheet(path),
        Some(DictionaryFormat::Delimited) => load_delimited(path, config),
        None => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read the first sheet, using its first row as header
fn load_spreadsheet(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| LoadError::SpreadsheetError(path.display().to_string(), e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoSheet(path.display().to_string()))?
        .map_err(|e| LoadError::SpreadsheetError(path.display().to_string(), e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::empty());
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_value(cell).unwrap_or_else(|| format!("Unnamed: {}", i)))
        .collect();

    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_value(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Read delimited text, trying each candidate encoding in order
fn load_delimited(path: &Path, config: &LoaderConfig) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path)
        .map_err(|e| LoadError::IoError(path.display().to_string(), e.to_string()))?;

    for &encoding in &config.encodings {
        let attempt = decode(&bytes, encoding).and_then(|text| parse_delimited(&text, config.delimiter));
        match attempt {
            Ok(table) => {
                tracing::debug!(path = %path.display(), %encoding, "Decoded delimited dictionary");
                return Ok(table);
            }
            Err(e) => {
                tracing::debug!("Failed to load with encoding {}: {}", encoding, e);
            }
        }
    }

    Err(LoadError::EncodingsExhausted(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vardeps_core::TextEncoding;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn detect_format() {
        assert_eq!(DictionaryFormat::detect(Path::new("data/dict.xlsx")), Some(DictionaryFormat::Spreadsheet));
        assert_eq!(DictionaryFormat::detect(Path::new("DICT.XLSX")), Some(DictionaryFormat::Spreadsheet));
        assert_eq!(DictionaryFormat::detect(Path::new("dict.csv")), Some(DictionaryFormat::Delimited));
        assert_eq!(DictionaryFormat::detect(Path::new("dict.json")), None);
        assert_eq!(DictionaryFormat::detect(Path::new("dict")), None);
    }

    #[test]
    fn load_csv_with_default_encodings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dict.csv", b"output_name;v1\nHR;hr \n");

        let table = load_table(&path, &LoaderConfig::default());
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "output_name"), Some("HR"));
        assert_eq!(table.cell(0, "v1"), Some("hr "));
    }

    #[test]
    fn falls_back_to_next_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dict.csv", "v1\nFréquence\n".as_bytes());

        let config = LoaderConfig {
            encodings: vec![TextEncoding::Windows1252, TextEncoding::Utf8],
            ..LoaderConfig::default()
        };
        // "é" in UTF-8 is 0xC3 0xA9, both defined in cp1252, so cp1252 wins
        let table = try_load_table(&path, &config).unwrap();
        assert_eq!(table.cell(0, "v1"), Some("FrÃ©quence"));

        // 0x81 is undefined in cp1252 and a stray continuation byte in UTF-8
        let path = write_file(&dir, "bad.csv", b"v1\nA\x81\n");
        let table = try_load_table(&path, &config);
        assert!(matches!(table, Err(LoadError::EncodingsExhausted(_))));

        let config = LoaderConfig {
            encodings: vec![TextEncoding::Utf8, TextEncoding::Latin1],
            ..LoaderConfig::default()
        };
        let table = try_load_table(&path, &config).unwrap();
        assert_eq!(table.cell(0, "v1"), Some("A\u{81}"));
    }

    #[test]
    fn parse_failure_counts_as_failed_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dict.csv", b"v1\n\"unterminated\n");

        assert!(matches!(
            try_load_table(&path, &LoaderConfig::default()),
            Err(LoadError::EncodingsExhausted(_))
        ));
        assert_eq!(load_table(&path, &LoaderConfig::default()), Table::empty());
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let path = Path::new("does/not/exist.csv");
        assert!(matches!(
            try_load_table(path, &LoaderConfig::default()),
            Err(LoadError::IoError(..))
        ));
        assert_eq!(load_table(path, &LoaderConfig::default()), Table::empty());

        let path = Path::new("does/not/exist.xlsx");
        assert!(matches!(
            try_load_table(path, &LoaderConfig::default()),
            Err(LoadError::SpreadsheetError(..))
        ));
        assert_eq!(load_table(path, &LoaderConfig::default()), Table::empty());
    }

    fn write_workbook(dir: &tempfile::TempDir) -> std::path::PathBuf {
        use rust_xlsxwriter::Workbook;

        let path = dir.path().join("dict.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, name) in ["v1", "v2", "mxd", "Kill", "output_name", "parent_dependency"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        // Column 6 has data but no header
        sheet.write_string(1, 0, " hr ").unwrap();
        sheet.write_number(1, 3, 1.0).unwrap();
        sheet
            .write_string(1, 5, r#"{"TRAUMABASE-V1": ["AGE", "WEIGHT"]}"#)
            .unwrap();
        sheet.write_string(1, 6, "note").unwrap();
        sheet.write_string(2, 1, "NA").unwrap();
        sheet.write_string(2, 4, "AGE").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn load_spreadsheet_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir);

        let table = try_load_table(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(
            table.columns(),
            ["v1", "v2", "mxd", "Kill", "output_name", "parent_dependency", "Unnamed: 6"]
        );
        assert_eq!(table.len(), 2);

        assert_eq!(table.cell(0, "v1"), Some(" hr "));
        assert_eq!(table.cell(0, "Kill"), Some("1"));
        assert_eq!(table.cell(0, "v2"), None);
        assert_eq!(table.cell(0, "output_name"), None);
        assert_eq!(table.cell(0, "Unnamed: 6"), Some("note"));

        // Missing-value markers are plain text in workbooks
        assert_eq!(table.cell(1, "v2"), Some("NA"));
        assert_eq!(table.cell(1, "output_name"), Some("AGE"));
        assert_eq!(table.cell(1, "Kill"), None);
    }

    #[test]
    fn spreadsheet_feeds_catalog_and_extract() {
        use crate::{extract, Catalog};
        use vardeps_core::Source;

        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_table(&load_table(&write_workbook(&dir), &LoaderConfig::default()));

        assert_eq!(catalog.variable_names(), vec!["hr", "AGE"]);
        assert_eq!(catalog.get("hr").and_then(|e| e.kill.as_deref()), Some("1"));

        let deps = extract(&catalog, Source::TraumabaseV1).unwrap();
        assert_eq!(
            deps.get("hr").map(|r| r.dependency.clone()),
            Some(vec!["AGE".to_string(), "WEIGHT".to_string()])
        );
        assert_eq!(deps.get("AGE").map(|r| r.dependency.is_empty()), Some(true));
    }

    #[test]
    fn unsupported_format_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dict.txt", b"v1\nA\n");

        assert!(matches!(
            try_load_table(&path, &LoaderConfig::default()),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(load_table(&path, &LoaderConfig::default()).columns().is_empty());
    }
}
