//! Entity declarations.

use serde::{Deserialize, Serialize};

use crate::field::FieldDecl;

/// A declared entity: a named collection of fields backed by a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDecl {
    /// Entity name as exposed to callers.
    pub name: String,
    /// Backing table name; defaults to the entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Declared fields, scalar and relation alike.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl EntityDecl {
    /// Create an entity with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Override the backing table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDecl>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The backing table: declared override or the entity name itself.
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// The primary key field: a scalar named `id` (any casing), or the
    /// first scalar field declared.
    pub fn key_field(&self) -> Option<&FieldDecl> {
        self.fields
            .iter()
            .find(|f| f.is_scalar() && f.name.eq_ignore_ascii_case("id"))
            .or_else(|| self.fields.iter().find(|f| f.is_scalar()))
    }

    /// The primary key column name, if the entity has any scalar field.
    pub fn key_column(&self) -> Option<&str> {
        self.key_field().map(|f| f.column_name())
    }
}
