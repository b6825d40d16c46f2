//! Relationship join resolution.
//!
//! Relation declarations are allowed to be sparse: a field may name only
//! its target entity and leave kind, columns, and pivot facts out. This
//! module turns such declarations into complete join facts. For
//! many-to-many relations the missing pivot attributes are recovered from
//! the counterpart declaration on the target entity, or inferred from
//! table names when neither side declares them. Resolution is total: it
//! always produces a fully populated [`ResolvedJoin`].

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use entq_schema::{Cardinality, EntityDecl, FieldDecl, RelationDecl, RelationKind, SchemaDecl};

/// Fully determined join facts for one relation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedJoin {
    /// Normalized relation kind.
    pub kind: RelationKind,
    /// Target entity name.
    pub target: String,
    /// Join column on the source table.
    pub source_column: String,
    /// Join column on the target table.
    pub target_column: String,
    /// Pivot facts; populated exactly when `kind` is many-to-many.
    pub pivot: Option<PivotJoin>,
}

impl ResolvedJoin {
    /// Whether this join runs through a pivot table.
    pub fn is_many_to_many(&self) -> bool {
        self.kind == RelationKind::ManyToMany
    }

    /// Cardinality of the resolved kind.
    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }
}

/// Pivot facts for a many-to-many join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotJoin {
    /// Pivot table name.
    pub table: String,
    /// Pivot column holding source keys.
    pub source_column: String,
    /// Pivot column holding target keys.
    pub target_column: String,
    /// Table the pivot's target keys point into.
    pub target_table: String,
}

/// Resolves relation declarations against a full schema.
pub struct JoinResolver<'a> {
    schema: &'a SchemaDecl,
}

impl<'a> JoinResolver<'a> {
    /// Create a resolver over a schema declaration.
    pub fn new(schema: &'a SchemaDecl) -> Self {
        Self { schema }
    }

    /// Resolve the relation declared on `entity`.`field`.
    ///
    /// Returns `None` when the entity or field is unknown or the field is
    /// scalar. The source column defaults to the field's own column name;
    /// use [`resolve_with_default`](Self::resolve_with_default) to supply
    /// a different fallback.
    pub fn resolve(&self, entity: &str, field: &str) -> Option<ResolvedJoin> {
        let entity = self.schema.entity(entity)?;
        let field = entity.field(field)?;
        let relation = field.relation_decl()?;
        Some(self.resolve_relation(entity, relation, field.column_name(), true))
    }

    /// Resolve with a caller-supplied fallback for the source column,
    /// used when the declaration leaves `sourceColumn` out.
    pub fn resolve_with_default(
        &self,
        entity: &str,
        field: &str,
        default_source: &str,
    ) -> Option<ResolvedJoin> {
        let entity = self.schema.entity(entity)?;
        let field = entity.field(field)?;
        let relation = field.relation_decl()?;
        Some(self.resolve_relation(entity, relation, default_source, true))
    }

    /// Normalize a declared kind spelling into one of the four kinds.
    ///
    /// Unrecognized or absent spellings fall back on the declared
    /// cardinality: `many` becomes has-many, anything else has-one.
    pub fn normalize_kind(relation: &RelationDecl) -> RelationKind {
        relation
            .kind
            .as_deref()
            .and_then(RelationKind::parse)
            .unwrap_or(match relation.cardinality {
                Some(Cardinality::Many) => RelationKind::HasMany,
                _ => RelationKind::HasOne,
            })
    }

    /// The conventional source-column fallback for a relation: the field's
    /// own column for belongs-to (it holds the foreign key), the entity's
    /// key column otherwise.
    pub(crate) fn default_source_column(
        entity: &EntityDecl,
        field: &FieldDecl,
        relation: &RelationDecl,
    ) -> String {
        match Self::normalize_kind(relation) {
            RelationKind::BelongsTo => field.column_name().to_string(),
            _ => entity.key_column().unwrap_or("id").to_string(),
        }
    }

    pub(crate) fn resolve_relation(
        &self,
        entity: &EntityDecl,
        relation: &RelationDecl,
        default_source: &str,
        allow_reciprocal: bool,
    ) -> ResolvedJoin {
        let kind = Self::normalize_kind(relation);
        let source_column = relation
            .source_column
            .clone()
            .unwrap_or_else(|| default_source.to_string());
        let target_column = relation
            .target_column
            .clone()
            .unwrap_or_else(|| "id".to_string());
        let pivot = match kind {
            RelationKind::ManyToMany => {
                Some(self.resolve_pivot(entity, relation, allow_reciprocal))
            }
            _ => None,
        };

        ResolvedJoin {
            kind,
            target: relation.target.clone(),
            source_column,
            target_column,
            pivot,
        }
    }

    /// Fill in pivot facts for a many-to-many relation, in precedence
    /// order per attribute: explicit declaration, the counterpart
    /// declaration on the target entity (pivot columns swapped, since
    /// source and target roles invert), one reciprocal resolution hop,
    /// then deterministic table-name defaults.
    fn resolve_pivot(
        &self,
        entity: &EntityDecl,
        relation: &RelationDecl,
        allow_reciprocal: bool,
    ) -> PivotJoin {
        let target_entity = self.schema.entity(&relation.target);
        let counterpart = target_entity.and_then(|e| self.counterpart_of(e, &entity.name));

        // Default inference reads the counterpart's `targetTable` override
        // for our own side of the pair, so both directions derive their
        // defaults from the same two table names.
        let source_table = counterpart
            .and_then(|(_, other)| other.target_table.clone())
            .unwrap_or_else(|| entity.table_name().to_string());
        let target_table = relation
            .target_table
            .clone()
            .or_else(|| target_entity.map(|e| e.table_name().to_string()))
            .unwrap_or_else(|| relation.target.clone());

        let mut table = relation.pivot_table.clone();
        let mut source_column = relation.source_pivot_column.clone();
        let mut target_column = relation.target_pivot_column.clone();
        if let Some((_, other)) = counterpart {
            table = table.or_else(|| other.pivot_table.clone());
            source_column = source_column.or_else(|| other.target_pivot_column.clone());
            target_column = target_column.or_else(|| other.source_pivot_column.clone());
        }

        // One reciprocal hop only; the recursive call may not recurse
        // back, or two sparse declarations would chase each other forever.
        if allow_reciprocal
            && (table.is_none() || source_column.is_none() || target_column.is_none())
        {
            if let (Some(target_entity), Some((field, other))) = (target_entity, counterpart) {
                let fallback = Self::default_source_column(target_entity, field, other);
                let resolved = self.resolve_relation(target_entity, other, &fallback, false);
                if let Some(pivot) = resolved.pivot {
                    table = table.or(Some(pivot.table));
                    source_column = source_column.or(Some(pivot.target_column));
                    target_column = target_column.or(Some(pivot.source_column));
                }
            }
        }

        let table = table.unwrap_or_else(|| {
            let ours = format!(
                "{}_{}",
                source_table.to_snake_case(),
                target_table.to_snake_case()
            );
            let inferred = if counterpart.is_some() {
                // Both sides derive a candidate; the lexicographically
                // smaller one wins so they agree without coordination.
                let theirs = format!(
                    "{}_{}",
                    target_table.to_snake_case(),
                    source_table.to_snake_case()
                );
                ours.min(theirs)
            } else {
                ours
            };
            tracing::debug!(
                entity = %entity.name,
                target = %relation.target,
                pivot = %inferred,
                "inferred pivot table name"
            );
            inferred
        });
        let source_column =
            source_column.unwrap_or_else(|| format!("{}_id", source_table.to_snake_case()));
        let target_column =
            target_column.unwrap_or_else(|| format!("{}_id", target_table.to_snake_case()));

        PivotJoin {
            table,
            source_column,
            target_column,
            target_table,
        }
    }

    /// Find the many-to-many declaration on `target` pointing back at
    /// `source_name`, if any.
    fn counterpart_of(
        &self,
        target: &'a EntityDecl,
        source_name: &str,
    ) -> Option<(&'a FieldDecl, &'a RelationDecl)> {
        target.fields.iter().find_map(|field| {
            let relation = field.relation_decl()?;
            let reciprocal = Self::normalize_kind(relation) == RelationKind::ManyToMany
                && relation.target == source_name;
            reciprocal.then_some((field, relation))
        })
    }
}
