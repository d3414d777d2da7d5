//! Delimited text parsing
//!
//! Quoting follows the usual CSV conventions: a field that starts with `"`
//! runs until the next unpaired `"`, `""` inside it is a literal quote, and
//! it may contain separators and line breaks. Only an empty field is a
//! missing value. Blank lines are skipped.

use crate::error::LoadError;
use crate::table::Table;

/// Parse decoded text into a table, using the first record as header
pub fn parse_delimited(text: &str, delimiter: char) -> Result<Table, LoadError> {
    let records = split_records(text, delimiter)?;
    let mut records = records.into_iter();

    let Some((_, header)) = records.next() else {
        return Err(LoadError::ParseError {
            line: 1,
            message: "no header row".to_string(),
        });
    };

    let columns: Vec<String> = header
        .into_iter()
        .enumerate()
        .map(|(i, name)| name.unwrap_or_else(|| format!("Unnamed: {}", i)))
        .collect();

    let mut rows = Vec::new();
    for (line, record) in records {
        if record.len() > columns.len() {
            return Err(LoadError::ParseError {
                line,
                message: format!("expected {} fields, saw {}", columns.len(), record.len()),
            });
        }
        rows.push(record);
    }

    Ok(Table::new(columns, rows))
}

/// Split text into records, each tagged with the line it starts on
fn split_records(text: &str, delimiter: char) -> Result<Vec<(usize, Vec<Option<String>>)>, LoadError> {
    let mut records = Vec::new();
    let mut record: Vec<Option<String>> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            c if c == delimiter => {
                record.push(take_field(&mut field));
                at_field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_record(&mut records, &mut record, &mut field, record_line);
                line += 1;
                record_line = line;
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(LoadError::ParseError {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    finish_record(&mut records, &mut record, &mut field, record_line);
    Ok(records)
}

fn take_field(field: &mut String) -> Option<String> {
    let value = std::mem::take(field);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn finish_record(
    records: &mut Vec<(usize, Vec<Option<String>>)>,
    record: &mut Vec<Option<String>>,
    field: &mut String,
    line: usize,
) {
    // A blank line yields a single empty field
    if record.is_empty() && field.is_empty() {
        return;
    }
    record.push(take_field(field));
    records.push((line, std::mem::take(record)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_semicolon_table() {
        let table = parse_delimited("v1;v2;mxd\nA;B;C\nD;;F\n", ';').unwrap();

        assert_eq!(table.columns(), ["v1", "v2", "mxd"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "v2"), Some("B"));
        assert_eq!(table.cell(1, "v2"), None);
        assert_eq!(table.cell(1, "mxd"), Some("F"));
    }

    #[test]
    fn only_empty_string_is_missing() {
        let table = parse_delimited("a;b;c\nNA;null; \n", ';').unwrap();
        assert_eq!(table.cell(0, "a"), Some("NA"));
        assert_eq!(table.cell(0, "b"), Some("null"));
        assert_eq!(table.cell(0, "c"), Some(" "));
    }

    #[test]
    fn quoted_fields_keep_separators_and_quotes() {
        let text = "output_name;parent_dependency\r\nHR;\"{\"\"TRAUMABASE-V1\"\": [\"\"AGE\"\"; \"\"WEIGHT\"\"]}\"\r\n";
        let table = parse_delimited(text, ';').unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.cell(0, "parent_dependency"),
            Some(r#"{"TRAUMABASE-V1": ["AGE"; "WEIGHT"]}"#)
        );
    }

    #[test]
    fn quoted_field_spans_lines() {
        let table = parse_delimited("a;b\n\"x\ny\";z\nlast;row\n", ';').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "a"), Some("x\ny"));
        assert_eq!(table.cell(1, "b"), Some("row"));
    }

    #[test]
    fn bare_quotes_inside_field_are_literal() {
        let table = parse_delimited("a\n{\"k\": \"v\"}\n", ';').unwrap();
        assert_eq!(table.cell(0, "a"), Some(r#"{"k": "v"}"#));
    }

    #[test]
    fn blank_lines_and_missing_trailing_newline() {
        let table = parse_delimited("a;b\n\n1;2\n\n3;4", ';').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "b"), Some("4"));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = parse_delimited("a;b;c\n1\n", ';').unwrap();
        assert_eq!(table.cell(0, "a"), Some("1"));
        assert_eq!(table.cell(0, "c"), None);
    }

    #[test]
    fn unnamed_header_cells() {
        let table = parse_delimited("a;;c\n1;2;3\n", ';').unwrap();
        assert_eq!(table.columns(), ["a", "Unnamed: 1", "c"]);
    }

    #[test]
    fn too_many_fields_is_an_error() {
        let err = parse_delimited("a;b\n1;2\n1;2;3\n", ';').unwrap_err();
        assert!(matches!(err, LoadError::ParseError { line: 3, .. }));
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_delimited("a\n\"open\n", ';').unwrap_err();
        assert!(matches!(err, LoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(parse_delimited("", ';').is_err());
        assert!(parse_delimited("\n\n", ';').is_err());
    }
}
