//! Entity rows returned by batch-fetch functions.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A loaded entity: ordered column/value pairs.
///
/// Loaders treat rows as opaque except for two things: reading one column
/// to sort group results, and converting column values to key strings at
/// the fetch boundary. Rows are plain data and are cloned out of caches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRow {
    /// Column values in fetch order.
    pub fields: Vec<(String, Value)>,
}

impl EntityRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Get a column value in its key-string form.
    pub fn key(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::key_string)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
