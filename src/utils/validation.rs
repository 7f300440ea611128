// Validation utilities
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use crate::data::{DataError, Schema};

/// Validate that a schema has at least one column and no duplicate names
pub fn validate_schema(schema: &Schema) -> Result<(), DataError> {
    if schema.is_empty() {
        return Err(DataError::EmptySchema);
    }

    let mut names = HashSet::new();
    for field in &schema.fields {
        if !names.insert(field.name.as_str()) {
            return Err(DataError::DuplicateColumn(field.name.clone()));
        }
    }

    Ok(())
}

/// Validate a field delimiter. Quote-aware splitting needs a single-byte delimiter.
pub fn validate_delimiter(delimiter: char, quoted: bool) -> Result<(), DataError> {
    if matches!(delimiter, '\n' | '\r') {
        return Err(DataError::UnsupportedDelimiter(delimiter));
    }

    if quoted && (!delimiter.is_ascii() || delimiter == '"') {
        return Err(DataError::UnsupportedDelimiter(delimiter));
    }

    Ok(())
}

/// Validate that a numeric value is in range
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
    name: &str,
) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("'{}' must be between {} and {}", name, min, max))
    } else {
        Ok(())
    }
}
