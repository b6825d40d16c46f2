//! entq - Query-layer generation core.
//!
//! entq turns declarative entity and relation metadata into the pieces a
//! generated query layer runs on: complete join facts for every relation
//! (including inferred many-to-many pivot tables), a filter/sort path
//! index per entity, and per-operation batched loaders that resolve
//! nested relations without one query per parent row.
//!
//! # Crates
//!
//! - [`schema`] - Entity, field, and relation declarations plus the JSON
//!   document format
//! - [`resolve`] - Join resolution and whole-schema resolution
//! - [`criteria`] - Dotted filter/sort path indexing
//! - [`loader`] - Batched, cached, per-operation entity loading
//!
//! # Resolving a schema
//!
//! ```
//! use entq::{ResolvedSchema, SchemaDecl};
//!
//! let doc = r#"{
//!     "entities": [
//!         {"name": "Author", "table": "authors", "fields": [
//!             {"name": "id", "scalar": "int64"},
//!             {"name": "tags", "relation": {"target": "Tag", "kind": "manyToMany"}}
//!         ]},
//!         {"name": "Tag", "table": "tags", "fields": [
//!             {"name": "id", "scalar": "int64"},
//!             {"name": "authors", "relation": {"target": "Author", "kind": "manyToMany"}}
//!         ]}
//!     ]
//! }"#;
//!
//! let schema = SchemaDecl::from_json(doc).unwrap();
//! let resolved = ResolvedSchema::resolve(&schema).unwrap();
//!
//! // Neither side declared pivot facts; both get the same inferred ones.
//! let tags = resolved.entity("Author").unwrap().join("tags").unwrap();
//! assert!(tags.is_many_to_many());
//! let pivot = tags.pivot.as_ref().unwrap();
//! assert_eq!(pivot.table, "authors_tags");
//! assert_eq!(pivot.source_column, "authors_id");
//! ```

pub use entq_core::{criteria, error, loader, resolve};
pub use entq_schema as schema;

// Re-export commonly used types at crate root
pub use entq_schema::{
    Cardinality, DocumentError, EntityDecl, EntityRow, FieldDecl, RelationDecl, RelationKind,
    ScalarType, SchemaDecl, Value,
};

pub use entq_core::{
    CriteriaField, CriteriaIndex, Error, GroupFetchFn, GroupLoader, JoinResolver, Loader,
    LoaderSet, LoaderStats, PivotFetchFn, PivotJoin, RelationLoader, ResolvedEntity, ResolvedJoin,
    ResolvedSchema, Result, RowSource, SingleFetchFn,
};
