//! Relation declarations between entities.

use serde::{Deserialize, Serialize};

/// The closed set of relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// This entity holds a foreign key referencing the target.
    BelongsTo,
    /// A single target row holds a foreign key referencing this entity.
    HasOne,
    /// Multiple target rows hold foreign keys referencing this entity.
    HasMany,
    /// Target rows are linked through a pivot table.
    ManyToMany,
}

impl RelationKind {
    /// Parse a loose kind spelling: case, hyphen, and underscore
    /// insensitive (`"many-to-many"`, `"HAS_MANY"`, `"belongsTo"`, ...).
    pub fn parse(raw: &str) -> Option<RelationKind> {
        let folded: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "belongsto" => Some(RelationKind::BelongsTo),
            "hasone" => Some(RelationKind::HasOne),
            "hasmany" => Some(RelationKind::HasMany),
            "manytomany" => Some(RelationKind::ManyToMany),
            _ => None,
        }
    }

    /// Cardinality implied by this kind.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationKind::BelongsTo | RelationKind::HasOne => Cardinality::One,
            RelationKind::HasMany | RelationKind::ManyToMany => Cardinality::Many,
        }
    }

    /// The canonical camelCase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
            RelationKind::ManyToMany => "manyToMany",
        }
    }
}

/// How many related values a relation produces per source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one related value.
    One,
    /// A list of related values.
    Many,
}

/// A relationship declaration attached to an entity field.
///
/// Only `target` is mandatory. Everything else may be left out and is
/// filled in during join resolution: the kind is a free-form spelling
/// normalized there, columns default, and many-to-many pivot facts can be
/// inferred from the counterpart declared on the target entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDecl {
    /// Target entity name.
    pub target: String,
    /// Declared kind spelling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Declared cardinality; derived from the kind when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    /// Join column on the source entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
    /// Join column on the target entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    /// Pivot table name (many-to-many only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_table: Option<String>,
    /// Pivot column holding source keys (many-to-many only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_pivot_column: Option<String>,
    /// Pivot column holding target keys (many-to-many only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pivot_column: Option<String>,
    /// Table the pivot's target keys point into (many-to-many only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,
}

impl RelationDecl {
    /// Create a bare declaration targeting an entity.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Create a belongs-to declaration.
    pub fn belongs_to(target: impl Into<String>) -> Self {
        Self::new(target).with_kind("belongsTo")
    }

    /// Create a has-one declaration.
    pub fn has_one(target: impl Into<String>) -> Self {
        Self::new(target).with_kind("hasOne")
    }

    /// Create a has-many declaration.
    pub fn has_many(target: impl Into<String>) -> Self {
        Self::new(target).with_kind("hasMany")
    }

    /// Create a many-to-many declaration.
    pub fn many_to_many(target: impl Into<String>) -> Self {
        Self::new(target).with_kind("manyToMany")
    }

    /// Set the kind spelling.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    /// Set the source join column.
    pub fn with_source_column(mut self, column: impl Into<String>) -> Self {
        self.source_column = Some(column.into());
        self
    }

    /// Set the target join column.
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Set the pivot table name.
    pub fn with_pivot_table(mut self, table: impl Into<String>) -> Self {
        self.pivot_table = Some(table.into());
        self
    }

    /// Set both pivot columns.
    pub fn with_pivot_columns(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.source_pivot_column = Some(source.into());
        self.target_pivot_column = Some(target.into());
        self
    }

    /// Set the pivot target table.
    pub fn with_target_table(mut self, table: impl Into<String>) -> Self {
        self.target_table = Some(table.into());
        self
    }
}
