//! Field declarations.

use serde::{Deserialize, Serialize};

use crate::relation::RelationDecl;
use crate::types::ScalarType;

/// A declared field on an entity: either a scalar column or a relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    /// Field name as exposed to callers.
    pub name: String,
    /// Scalar type, absent for relation fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<ScalarType>,
    /// Backing column name; defaults to the field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Whether the value must be present.
    #[serde(default)]
    pub required: bool,
    /// Whether the field holds a list of values.
    #[serde(default)]
    pub list: bool,
    /// Relation declaration, absent for scalar fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationDecl>,
}

impl FieldDecl {
    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar: Some(scalar),
            ..Self::default()
        }
    }

    /// Create a relation field.
    pub fn relation(name: impl Into<String>, relation: RelationDecl) -> Self {
        Self {
            name: name.into(),
            relation: Some(relation),
            ..Self::default()
        }
    }

    /// Override the backing column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as list-valued.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// The backing column: declared override or the field name itself.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Whether this field maps directly to a column.
    pub fn is_scalar(&self) -> bool {
        self.relation.is_none()
    }

    /// The relation declaration, if this is a relation field.
    pub fn relation_decl(&self) -> Option<&RelationDecl> {
        self.relation.as_ref()
    }
}
