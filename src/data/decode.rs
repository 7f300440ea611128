// Schema-driven record decoding
// Author: Gabriel Demetrios Lafis

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::{DataError, DataType, Record, Schema, Value};

type ColumnParser = Box<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Why a line could not be decoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeReason {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("column '{column}' expects {data_type}, cannot parse {value:?}: {message}")]
    InvalidField {
        column: String,
        data_type: DataType,
        value: String,
        message: String,
    },
    #[error("malformed line: {0}")]
    Malformed(String),
}

/// A line that does not conform to its schema
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line_number}: {reason} in {raw:?}")]
pub struct DecodeFailure {
    /// 1-based line number
    pub line_number: usize,
    pub raw: String,
    pub reason: DecodeReason,
}

impl DecodeFailure {
    /// The offending column, when the failure is a field conversion
    pub fn column(&self) -> Option<&str> {
        match &self.reason {
            DecodeReason::InvalidField { column, .. } => Some(column.as_str()),
            _ => None,
        }
    }
}

/// Turns delimited text lines into records of a fixed schema.
///
/// The per-column converters are built once, when the decoder is created,
/// and reused for every line. Decoding is pure: the same line always
/// yields the same record or the same failure.
pub struct RecordDecoder {
    schema: Arc<Schema>,
    delimiter: char,
    quoted: bool,
    parsers: Vec<ColumnParser>,
}

impl RecordDecoder {
    /// Create a decoder splitting fields on `delimiter`
    pub fn new(schema: Arc<Schema>, delimiter: char) -> Result<Self, DataError> {
        crate::utils::validate_schema(&schema)?;
        crate::utils::validate_delimiter(delimiter, false)?;

        let parsers = schema
            .fields
            .iter()
            .map(|field| column_parser(field.data_type))
            .collect();

        Ok(RecordDecoder {
            schema,
            delimiter,
            quoted: false,
            parsers,
        })
    }

    /// Honour double-quoted fields, so a quoted field may contain the delimiter.
    /// Requires an ASCII delimiter.
    pub fn with_quoting(mut self, quoted: bool) -> Result<Self, DataError> {
        if quoted {
            crate::utils::validate_delimiter(self.delimiter, true)?;
        }
        self.quoted = quoted;
        Ok(self)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Decode one raw line. `line_number` is 1-based and only used for reporting.
    pub fn decode(&self, line_number: usize, line: &str) -> Result<Record, DecodeFailure> {
        let failure = |reason| DecodeFailure {
            line_number,
            raw: line.to_string(),
            reason,
        };

        let fields = self
            .split(line)
            .map_err(|msg| failure(DecodeReason::Malformed(msg)))?;

        if fields.len() != self.parsers.len() {
            return Err(failure(DecodeReason::FieldCount {
                expected: self.parsers.len(),
                found: fields.len(),
            }));
        }

        let mut values = Vec::with_capacity(fields.len());
        for ((raw_field, parse), field) in fields.iter().zip(&self.parsers).zip(&self.schema.fields) {
            let raw_field: &str = raw_field;
            let value = parse(raw_field).map_err(|message| {
                failure(DecodeReason::InvalidField {
                    column: field.name.clone(),
                    data_type: field.data_type,
                    value: raw_field.to_string(),
                    message,
                })
            })?;
            values.push(value);
        }

        Ok(Record::from_parts(Arc::clone(&self.schema), values))
    }

    fn split<'a>(&self, line: &'a str) -> Result<Vec<Cow<'a, str>>, String> {
        if !self.quoted {
            return Ok(line.split(self.delimiter).map(Cow::Borrowed).collect());
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => Ok(record.iter().map(|s| Cow::Owned(s.to_string())).collect()),
            // the csv reader skips blank input; keep it as one empty field like the plain split
            Ok(false) => Ok(vec![Cow::Borrowed("")]),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl fmt::Debug for RecordDecoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RecordDecoder")
            .field("schema", &self.schema)
            .field("delimiter", &self.delimiter)
            .field("quoted", &self.quoted)
            .finish()
    }
}

fn column_parser(data_type: DataType) -> ColumnParser {
    match data_type {
        DataType::String => Box::new(|s: &str| -> Result<Value, String> {
            Ok(Value::String(s.to_string()))
        }),
        DataType::Integer => Box::new(|s: &str| {
            s.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string())
        }),
        DataType::Float => Box::new(|s: &str| {
            s.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string())
        }),
        DataType::Boolean => Box::new(|s: &str| {
            s.parse::<bool>()
                .map(Value::Boolean)
                .map_err(|e| e.to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SchemaBuilder;

    fn people() -> RecordDecoder {
        let schema = SchemaBuilder::new()
            .add_integer("id")
            .add_string("name")
            .build()
            .unwrap();
        RecordDecoder::new(schema, ',').unwrap()
    }

    #[test]
    fn test_integer_field_is_not_trimmed() {
        let err = people().decode(3, " 1,Alice").unwrap_err();
        assert_eq!(err.line_number, 3);
        assert_eq!(err.column(), Some("id"));
    }

    #[test]
    fn test_quoted_field_may_contain_delimiter() {
        let decoder = people().with_quoting(true).unwrap();
        let record = decoder.decode(1, "7,\"Smith, Jane\"").unwrap();
        assert_eq!(record.get_str("name"), Some("Smith, Jane"));
        assert_eq!(record.get_i64("id"), Some(7));
    }

    #[test]
    fn test_trailing_delimiter_is_a_field_count_failure() {
        let err = people().decode(1, "1,Alice,").unwrap_err();
        assert_eq!(
            err.reason,
            DecodeReason::FieldCount {
                expected: 2,
                found: 3
            }
        );
    }
}
