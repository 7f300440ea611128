// Schema construction
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use super::{DataError, DataType, Field, Schema};

/// Schema builder for creating schemas
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Add a field to the schema
    pub fn add_field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.push(Field::new(name, data_type));
        self
    }

    /// Add a boolean field
    pub fn add_boolean(self, name: &str) -> Self {
        self.add_field(name, DataType::Boolean)
    }

    /// Add an integer field
    pub fn add_integer(self, name: &str) -> Self {
        self.add_field(name, DataType::Integer)
    }

    /// Add a float field
    pub fn add_float(self, name: &str) -> Self {
        self.add_field(name, DataType::Float)
    }

    /// Add a string field
    pub fn add_string(self, name: &str) -> Self {
        self.add_field(name, DataType::String)
    }

    /// Build the schema, rejecting empty schemas and duplicate column names
    pub fn build(self) -> Result<Arc<Schema>, DataError> {
        let schema = Schema::new(self.fields);
        crate::utils::validate_schema(&schema)?;
        Ok(Arc::new(schema))
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
