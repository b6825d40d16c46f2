//! Whole-schema resolution.
//!
//! [`ResolvedSchema::resolve`] walks every entity once, fixes its table
//! and key column, resolves every relation field into a [`ResolvedJoin`],
//! and builds the per-entity criteria index. The result is read-only and
//! is the input both loader wiring and query translation work from.

use std::collections::HashMap;

use entq_schema::SchemaDecl;

use crate::criteria::CriteriaIndex;
use crate::error::{Error, Result};
use crate::resolve::join::{JoinResolver, ResolvedJoin};

/// One entity with its joins resolved and its criteria index built.
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    /// Entity name.
    pub name: String,
    /// Backing table.
    pub table: String,
    /// Primary key column.
    pub primary_key: String,
    /// Resolved joins keyed by relation field name.
    pub joins: HashMap<String, ResolvedJoin>,
    /// Filter/sort paths for this entity.
    pub criteria: CriteriaIndex,
}

impl ResolvedEntity {
    /// The resolved join for a relation field, if the field declares one.
    pub fn join(&self, field: &str) -> Option<&ResolvedJoin> {
        self.joins.get(field)
    }
}

/// A fully resolved schema, keyed by entity name.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    entities: HashMap<String, ResolvedEntity>,
}

impl ResolvedSchema {
    /// Resolve every entity in a schema declaration.
    ///
    /// Fails when an entity has no scalar field to key by, or when a
    /// relation targets an entity the schema does not declare. Join
    /// attribute resolution itself cannot fail.
    pub fn resolve(schema: &SchemaDecl) -> Result<Self> {
        let resolver = JoinResolver::new(schema);
        let mut entities = HashMap::new();

        for entity in &schema.entities {
            let primary_key = entity
                .key_column()
                .ok_or_else(|| Error::MissingPrimaryKey(entity.name.clone()))?
                .to_string();

            let mut joins = HashMap::new();
            for field in &entity.fields {
                let Some(relation) = field.relation_decl() else {
                    continue;
                };
                if schema.entity(&relation.target).is_none() {
                    return Err(Error::UnknownTarget {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target: relation.target.clone(),
                    });
                }
                let default_source = JoinResolver::default_source_column(entity, field, relation);
                let join = resolver.resolve_relation(entity, relation, &default_source, true);
                joins.insert(field.name.clone(), join);
            }

            tracing::debug!(
                entity = %entity.name,
                joins = joins.len(),
                "resolved entity"
            );
            entities.insert(
                entity.name.clone(),
                ResolvedEntity {
                    name: entity.name.clone(),
                    table: entity.table_name().to_string(),
                    primary_key,
                    joins,
                    criteria: CriteriaIndex::build(entity, schema),
                },
            );
        }

        Ok(Self { entities })
    }

    /// Look up a resolved entity by name.
    pub fn entity(&self, name: &str) -> Option<&ResolvedEntity> {
        self.entities.get(name)
    }

    /// Iterate over all resolved entities in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &ResolvedEntity> {
        self.entities.values()
    }

    /// Number of resolved entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the schema declares no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
