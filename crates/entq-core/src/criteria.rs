//! Filter and sort path indexing.
//!
//! Query translation needs to know, for a dotted path like `tags.name`,
//! which column to compare against and which join to apply first. The
//! [`CriteriaIndex`] precomputes that mapping per entity: one entry per
//! own scalar field, plus one entry per scalar field of each related
//! entity, a single hop deep. Paths that are not in the index are simply
//! not filterable or orderable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use entq_schema::{EntityDecl, SchemaDecl};

use crate::resolve::join::{JoinResolver, ResolvedJoin};

/// One addressable filter/sort path on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaField {
    /// The path as declared, original casing preserved.
    pub path: String,
    /// Column the comparison runs against.
    pub column: String,
    /// Relation field crossed to reach the column, if any.
    pub relation: Option<String>,
    /// Join facts for that relation, if any.
    pub join: Option<ResolvedJoin>,
}

impl CriteriaField {
    /// Whether this path crosses a relation.
    pub fn is_related(&self) -> bool {
        self.relation.is_some()
    }
}

/// Case-insensitive path lookup table for one entity.
#[derive(Debug, Clone, Default)]
pub struct CriteriaIndex {
    fields: HashMap<String, CriteriaField>,
}

impl CriteriaIndex {
    /// Build the index for one entity against the full schema.
    ///
    /// Relation fields whose target entity is missing from the schema are
    /// skipped rather than failing; schema validation reports those
    /// separately.
    pub fn build(entity: &EntityDecl, schema: &SchemaDecl) -> Self {
        let resolver = JoinResolver::new(schema);
        let mut fields = HashMap::new();

        for field in &entity.fields {
            let Some(relation) = field.relation_decl() else {
                let entry = CriteriaField {
                    path: field.name.clone(),
                    column: field.column_name().to_string(),
                    relation: None,
                    join: None,
                };
                fields.insert(field.name.to_lowercase(), entry);
                continue;
            };

            let Some(target) = schema.entity(&relation.target) else {
                continue;
            };
            let default_source = JoinResolver::default_source_column(entity, field, relation);
            let join = resolver.resolve_relation(entity, relation, &default_source, true);

            for target_field in target.fields.iter().filter(|f| f.is_scalar()) {
                let path = format!("{}.{}", field.name, target_field.name);
                let entry = CriteriaField {
                    path: path.clone(),
                    column: target_field.column_name().to_string(),
                    relation: Some(field.name.clone()),
                    join: Some(join.clone()),
                };
                fields.insert(path.to_lowercase(), entry);
            }
        }

        Self { fields }
    }

    /// Look up a path, ignoring case.
    pub fn get(&self, path: &str) -> Option<&CriteriaField> {
        self.fields.get(&path.to_lowercase())
    }

    /// Number of addressable paths.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the entity has no addressable paths.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CriteriaField> {
        self.fields.values()
    }
}
