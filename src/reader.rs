//! Delimited text record source.
//!
//! Session logs are tabular text with a header row naming the fields.
//! Numbers use a fixed locale convention: a configurable decimal separator
//! (default `.`) and a configurable item delimiter (default `,`).

use crate::error::{ParseError, Result};
use crate::records::{FieldMap, FieldValue, PointSource, Record, RecordSet, Schema};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Options for reading a session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderConfig {
    /// Item delimiter, a single ASCII character. Default: `,`
    pub delimiter: char,
    /// Decimal separator inside numeric cells. Must differ from the delimiter.
    /// Default: `.`
    pub decimal_separator: char,
    /// Column names for position and gaze fields.
    pub fields: FieldMap,
    /// Point fields that must be present and numeric in every row.
    /// Default: position and gaze
    pub required: Vec<PointSource>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            fields: FieldMap::default(),
            required: vec![PointSource::Position, PointSource::Gaze],
        }
    }
}

/// Read a session log from a file.
pub fn read_records_from_path<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<RecordSet> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!("Loading session log from {}", path.display());
    read_records(BufReader::new(file), config)
}

/// Read a session log from any byte stream.
///
/// Fails if the separators are unusable, the header is missing, a row's
/// field count differs from the header, or a required numeric field is
/// absent or unparsable. Blank and whitespace-only lines are skipped.
pub fn read_records<R: Read>(input: R, config: &ReaderConfig) -> Result<RecordSet> {
    let delimiter = delimiter_byte(config)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let header = reader.headers().map_err(ParseError::from)?.clone();
    if header.is_empty() || header.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader.into());
    }
    let columns: Vec<String> = header.iter().map(str::to_string).collect();
    let schema = Schema::new(columns, config.fields.clone());

    let mut records = Vec::new();
    let mut lines = Vec::new();
    let mut row = StringRecord::new();
    while reader.read_record(&mut row).map_err(ParseError::from)? {
        // Whitespace-only lines survive the csv empty-line skip
        if row.len() == 1 && row.get(0).is_some_and(str::is_empty) {
            continue;
        }
        let line = row.position().map_or(records.len() as u64 + 2, |p| p.line());
        if row.len() != schema.len() {
            return Err(ParseError::FieldCountMismatch {
                line,
                expected: schema.len(),
                found: row.len(),
            }
            .into());
        }
        let values = row
            .iter()
            .map(|cell| parse_cell(cell, config.decimal_separator))
            .collect();
        records.push(Record::new(values));
        lines.push(line);
    }

    for source in &config.required {
        check_numeric(&schema, &records, &lines, *source)?;
    }

    debug!(
        "Parsed {} records with {} columns",
        records.len(),
        schema.len()
    );

    Ok(RecordSet::new(schema, records)?)
}

/// The delimiter as a csv byte. It must be a single ASCII character that is
/// neither a line terminator nor the decimal separator.
fn delimiter_byte(config: &ReaderConfig) -> std::result::Result<u8, ParseError> {
    let delimiter = config.delimiter;
    if !delimiter.is_ascii() {
        return Err(ParseError::InvalidSeparator {
            separator: delimiter,
            reason: "delimiter must be an ASCII character",
        });
    }
    if delimiter == '\n' || delimiter == '\r' {
        return Err(ParseError::InvalidSeparator {
            separator: delimiter,
            reason: "delimiter cannot be a line terminator",
        });
    }
    if config.decimal_separator == delimiter {
        return Err(ParseError::InvalidSeparator {
            separator: config.decimal_separator,
            reason: "decimal separator must differ from the delimiter",
        });
    }
    Ok(delimiter as u8)
}

/// Parse one cell. Finite numbers become [`FieldValue::Number`]; anything else is text.
fn parse_cell(cell: &str, decimal_separator: char) -> FieldValue {
    let normalized = if decimal_separator == '.' {
        std::borrow::Cow::Borrowed(cell)
    } else {
        std::borrow::Cow::Owned(cell.replace(decimal_separator, "."))
    };
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => FieldValue::Number(v),
        _ => FieldValue::Text(cell.to_string()),
    }
}

fn check_numeric(
    schema: &Schema,
    records: &[Record],
    lines: &[u64],
    source: PointSource,
) -> std::result::Result<(), ParseError> {
    for column in schema.field_map().columns(source) {
        let idx = schema
            .index_of(column)
            .ok_or_else(|| ParseError::MissingColumn {
                column: column.clone(),
            })?;
        for (record, line) in records.iter().zip(lines) {
            match record.get(idx) {
                Some(FieldValue::Number(_)) => {}
                Some(value) => {
                    return Err(ParseError::InvalidNumber {
                        line: *line,
                        field: column.clone(),
                        value: value.to_string(),
                    })
                }
                None => {
                    return Err(ParseError::FieldCountMismatch {
                        line: *line,
                        expected: schema.len(),
                        found: record.len(),
                    })
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_decimal_comma() {
        assert_eq!(parse_cell("1,5", ','), FieldValue::Number(1.5));
        assert_eq!(parse_cell("1.5", '.'), FieldValue::Number(1.5));
        assert_eq!(parse_cell("-0,25", ','), FieldValue::Number(-0.25));
    }

    #[test]
    fn test_parse_cell_text() {
        assert_eq!(parse_cell("abc", '.'), FieldValue::Text("abc".into()));
        assert_eq!(parse_cell("", '.'), FieldValue::Text(String::new()));
        assert_eq!(parse_cell("NaN", '.'), FieldValue::Text("NaN".into()));
        assert_eq!(parse_cell("inf", '.'), FieldValue::Text("inf".into()));
    }
}
