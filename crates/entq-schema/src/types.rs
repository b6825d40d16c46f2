//! Scalar type vocabulary for entity fields.

use serde::{Deserialize, Serialize};

/// Scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw byte array.
    Bytes,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// 128-bit identifier.
    Uuid,
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32 | ScalarType::Int64 | ScalarType::Float32 | ScalarType::Float64
        )
    }

    /// Check if values of this type have a canonical key-string form.
    pub fn is_keyable(&self) -> bool {
        matches!(
            self,
            ScalarType::Bool
                | ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::String
                | ScalarType::Timestamp
                | ScalarType::Uuid
        )
    }
}
