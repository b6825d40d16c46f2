//! Schema documents.

use serde::{Deserialize, Serialize};

use crate::entity::EntityDecl;
use crate::error::DocumentError;

fn default_version() -> u64 {
    1
}

/// A full schema declaration: a versioned set of entities.
///
/// Documents serialize to JSON with camelCase keys. Field, column, and
/// pivot attributes the document leaves out are filled in later during
/// join resolution, so hand-written documents can stay sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDecl {
    /// Document format version.
    #[serde(default = "default_version")]
    pub version: u64,
    /// Declared entities.
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
}

impl Default for SchemaDecl {
    fn default() -> Self {
        Self {
            version: default_version(),
            entities: Vec::new(),
        }
    }
}

impl SchemaDecl {
    /// Create an empty schema at the given version.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            entities: Vec::new(),
        }
    }

    /// Append an entity.
    pub fn with_entity(mut self, entity: EntityDecl) -> Self {
        self.entities.push(entity);
        self
    }

    /// Look up an entity by exact name.
    pub fn entity(&self, name: &str) -> Option<&EntityDecl> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Parse a JSON schema document, rejecting duplicate entity names.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let schema: SchemaDecl = serde_json::from_str(text)?;
        let mut seen = std::collections::HashSet::new();
        for entity in &schema.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(DocumentError::DuplicateEntity(entity.name.clone()));
            }
        }
        Ok(schema)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
