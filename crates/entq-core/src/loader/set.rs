//! Loader wiring for one operation.

use std::collections::HashMap;
use std::sync::Arc;

use entq_schema::{EntityRow, RelationKind};

use crate::loader::fetch::{GroupFetchFn, PivotFetchFn, RowSource, SingleFetchFn};
use crate::loader::group::GroupLoader;
use crate::loader::single::Loader;
use crate::resolve::schema::ResolvedSchema;

/// The loader serving one relation, shaped by the relation's cardinality.
#[derive(Clone)]
pub enum RelationLoader {
    /// Belongs-to and has-one relations: one row per key.
    Single(Arc<Loader>),
    /// Has-many and many-to-many relations: a sorted row list per key.
    Group(Arc<GroupLoader>),
}

impl RelationLoader {
    /// The single-value loader, when the relation has one.
    pub fn as_single(&self) -> Option<&Arc<Loader>> {
        match self {
            RelationLoader::Single(loader) => Some(loader),
            RelationLoader::Group(_) => None,
        }
    }

    /// The group loader, when the relation has one.
    pub fn as_group(&self) -> Option<&Arc<GroupLoader>> {
        match self {
            RelationLoader::Single(_) => None,
            RelationLoader::Group(loader) => Some(loader),
        }
    }
}

/// Every loader one operation needs, wired from a resolved schema.
///
/// One by-key loader exists per entity and is shared by every relation
/// that resolves rows of that entity by its key column, so a row loaded
/// through one relation is a cache hit for the next. The whole set is
/// scoped to a single operation; build a fresh one per operation.
pub struct LoaderSet {
    by_key: HashMap<String, Arc<Loader>>,
    relations: HashMap<String, RelationLoader>,
}

impl LoaderSet {
    /// Wire loaders for every entity and relation in the schema.
    pub fn for_operation(schema: &ResolvedSchema, source: Arc<dyn RowSource>) -> Self {
        let mut by_key = HashMap::new();
        for entity in schema.entities() {
            let fetch = single_fetch(
                source.clone(),
                entity.table.clone(),
                entity.primary_key.clone(),
            );
            by_key.insert(entity.name.clone(), Arc::new(Loader::new(fetch)));
        }

        let mut relations = HashMap::new();
        for entity in schema.entities() {
            for (field, join) in &entity.joins {
                let Some(target) = schema.entity(&join.target) else {
                    continue;
                };
                let Some(targets) = by_key.get(&target.name) else {
                    continue;
                };

                let loader = match join.kind {
                    RelationKind::BelongsTo | RelationKind::HasOne => {
                        let loader = if join.target_column == target.primary_key {
                            targets.clone()
                        } else {
                            let fetch = single_fetch(
                                source.clone(),
                                target.table.clone(),
                                join.target_column.clone(),
                            );
                            Arc::new(Loader::new(fetch))
                        };
                        RelationLoader::Single(loader)
                    }
                    RelationKind::HasMany => {
                        let fetch = group_fetch(
                            source.clone(),
                            target.table.clone(),
                            join.target_column.clone(),
                        );
                        RelationLoader::Group(Arc::new(GroupLoader::new(
                            target.primary_key.clone(),
                            fetch,
                        )))
                    }
                    RelationKind::ManyToMany => {
                        let Some(pivot) = join.pivot.as_ref() else {
                            continue;
                        };
                        RelationLoader::Group(Arc::new(GroupLoader::many_to_many(
                            pivot,
                            target.primary_key.clone(),
                            pivot_fetch(source.clone()),
                            targets.clone(),
                        )))
                    }
                };
                relations.insert(format!("{}.{}", entity.name, field), loader);
            }
        }

        tracing::debug!(
            entities = by_key.len(),
            relations = relations.len(),
            "wired loader set"
        );
        Self { by_key, relations }
    }

    /// The shared by-key loader for an entity.
    pub fn entity(&self, name: &str) -> Option<&Arc<Loader>> {
        self.by_key.get(name)
    }

    /// The loader for `entity`.`field`.
    pub fn relation(&self, entity: &str, field: &str) -> Option<&RelationLoader> {
        self.relations.get(&format!("{entity}.{field}"))
    }

    /// Number of wired relation loaders.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

fn single_fetch(source: Arc<dyn RowSource>, table: String, column: String) -> SingleFetchFn {
    Arc::new(move |keys| {
        let rows = source.rows_by_column(&table, &column, keys)?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            let Some(key) = row.key(&column) else {
                continue;
            };
            // First row wins if the column is not actually unique.
            map.entry(key).or_insert(row);
        }
        Ok(map)
    })
}

fn group_fetch(source: Arc<dyn RowSource>, table: String, column: String) -> GroupFetchFn {
    Arc::new(move |keys| {
        let rows = source.rows_by_column(&table, &column, keys)?;
        let mut map: HashMap<String, Vec<EntityRow>> = HashMap::new();
        for row in rows {
            let Some(key) = row.key(&column) else {
                continue;
            };
            map.entry(key).or_default().push(row);
        }
        Ok(map)
    })
}

fn pivot_fetch(source: Arc<dyn RowSource>) -> PivotFetchFn {
    Arc::new(move |table, source_column, target_column, keys| {
        source.pivot_links(table, source_column, target_column, keys)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use entq_schema::{EntityDecl, FieldDecl, RelationDecl, ScalarType, SchemaDecl, Value};
    use parking_lot::Mutex;

    struct TestSource {
        tables: HashMap<String, Vec<EntityRow>>,
        queries: Mutex<Vec<String>>,
    }

    impl TestSource {
        fn new() -> Self {
            let mut tables: HashMap<String, Vec<EntityRow>> = HashMap::new();
            tables.insert(
                "authors".to_string(),
                vec![
                    EntityRow::new().with("id", 1i64).with("name", "sarkar"),
                    EntityRow::new().with("id", 2i64).with("name", "lee"),
                ],
            );
            tables.insert(
                "posts".to_string(),
                vec![
                    EntityRow::new()
                        .with("id", 10i64)
                        .with("author_id", 1i64)
                        .with("slug", "intro"),
                    EntityRow::new()
                        .with("id", 11i64)
                        .with("author_id", 1i64)
                        .with("slug", "followup"),
                ],
            );
            Self {
                tables,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl RowSource for TestSource {
        fn rows_by_column(
            &self,
            table: &str,
            column: &str,
            keys: &[String],
        ) -> Result<Vec<EntityRow>> {
            self.queries.lock().push(format!("{table}.{column}"));
            let rows = self.tables.get(table).cloned().unwrap_or_default();
            Ok(rows
                .into_iter()
                .filter(|row| row.key(column).is_some_and(|k| keys.contains(&k)))
                .collect())
        }

        fn pivot_links(
            &self,
            table: &str,
            _source_column: &str,
            _target_column: &str,
            _keys: &[String],
        ) -> Result<Vec<(String, String)>> {
            self.queries.lock().push(format!("pivot:{table}"));
            Ok(Vec::new())
        }
    }

    fn blog_schema() -> SchemaDecl {
        SchemaDecl::new(1)
            .with_entity(
                EntityDecl::new("Author")
                    .with_table("authors")
                    .with_field(FieldDecl::scalar("id", ScalarType::Int64))
                    .with_field(FieldDecl::scalar("name", ScalarType::String))
                    .with_field(FieldDecl::relation(
                        "posts",
                        RelationDecl::has_many("Post").with_target_column("author_id"),
                    ))
                    .with_field(FieldDecl::relation("tags", RelationDecl::many_to_many("Tag"))),
            )
            .with_entity(
                EntityDecl::new("Post")
                    .with_table("posts")
                    .with_field(FieldDecl::scalar("id", ScalarType::Int64))
                    .with_field(FieldDecl::scalar("slug", ScalarType::String))
                    .with_field(
                        FieldDecl::relation("author", RelationDecl::belongs_to("Author"))
                            .with_column("author_id"),
                    )
                    .with_field(FieldDecl::relation(
                        "heroImage",
                        RelationDecl::has_one("Image").with_target_column("post_slug"),
                    )),
            )
            .with_entity(
                EntityDecl::new("Tag")
                    .with_table("tags")
                    .with_field(FieldDecl::scalar("id", ScalarType::Int64))
                    .with_field(FieldDecl::relation(
                        "authors",
                        RelationDecl::many_to_many("Author"),
                    )),
            )
            .with_entity(
                EntityDecl::new("Image")
                    .with_table("images")
                    .with_field(FieldDecl::scalar("id", ScalarType::Int64))
                    .with_field(FieldDecl::scalar("post_slug", ScalarType::String)),
            )
    }

    fn wired() -> LoaderSet {
        let resolved = ResolvedSchema::resolve(&blog_schema()).unwrap();
        LoaderSet::for_operation(&resolved, Arc::new(TestSource::new()))
    }

    #[test]
    fn test_every_relation_gets_a_loader() {
        let set = wired();
        assert_eq!(set.relation_count(), 5);
        assert!(set.relation("Author", "posts").is_some());
        assert!(set.relation("Author", "nope").is_none());
    }

    #[test]
    fn test_belongs_to_shares_the_entity_loader() {
        let set = wired();
        let author_loader = set.entity("Author").unwrap();
        let relation = set.relation("Post", "author").unwrap();
        let loader = relation.as_single().unwrap();
        assert!(Arc::ptr_eq(loader, author_loader));
    }

    #[test]
    fn test_non_key_target_column_gets_dedicated_loader() {
        let set = wired();
        let image_loader = set.entity("Image").unwrap();
        let relation = set.relation("Post", "heroImage").unwrap();
        let loader = relation.as_single().unwrap();
        assert!(!Arc::ptr_eq(loader, image_loader));
    }

    #[test]
    fn test_group_relations_are_group_loaders() {
        let set = wired();
        assert!(set.relation("Author", "posts").unwrap().as_group().is_some());
        assert!(set.relation("Author", "tags").unwrap().as_group().is_some());
        assert!(set.relation("Author", "tags").unwrap().as_single().is_none());
    }

    #[test]
    fn test_has_many_loads_through_source() {
        let set = wired();
        let posts = set.relation("Author", "posts").unwrap().as_group().unwrap();
        let result = posts.load_many(&["1".to_string(), "2".to_string()]).unwrap();

        let slugs: Vec<_> = result["1"]
            .iter()
            .map(|r| r.get("slug").and_then(Value::as_str).unwrap().to_string())
            .collect();
        assert_eq!(slugs, ["intro", "followup"]);
        assert!(result["2"].is_empty());
    }
}
