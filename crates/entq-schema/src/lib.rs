//! Entity, field, and relation metadata for the entq query layer.
//!
//! This crate owns the declaration vocabulary the rest of entq consumes:
//! entities with ordered fields, relation declarations that may be only
//! partially specified, and the runtime row/value types that batch-fetch
//! functions traffic in.
//!
//! # Modules
//!
//! - [`schema`] - The full entity set and JSON document loading
//! - [`entity`] - Entity declarations and the key-field heuristic
//! - [`field`] - Field declarations
//! - [`relation`] - Relation declarations and the closed kind set
//! - [`value`] - Runtime column values
//! - [`row`] - Loaded entity rows
//!
//! Declarations are inputs: turning them into complete join facts is the
//! job of `entq-core`. A schema is immutable once loaded and is rebuilt
//! from scratch on every regeneration run.

pub mod entity;
pub mod error;
pub mod field;
pub mod relation;
pub mod row;
pub mod schema;
pub mod types;
pub mod value;

pub use entity::EntityDecl;
pub use error::DocumentError;
pub use field::FieldDecl;
pub use relation::{Cardinality, RelationDecl, RelationKind};
pub use row::EntityRow;
pub use schema::SchemaDecl;
pub use types::ScalarType;
pub use value::Value;
