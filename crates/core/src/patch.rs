//! Single-field patch operation.
//!
//! Wire shape: `{ "op": "replace", "path": "/<fieldName>", "value": "<string>" }`.
//! Only `replace` is supported and the path is always exactly one segment.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The only supported patch verb.
pub const OP_REPLACE: &str = "replace";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl PatchOperation {
    pub fn new(op: impl Into<String>, path: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            op: op.into(),
            path: path.into(),
            value: value.map(str::to_string),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: OP_REPLACE.to_string(),
            path: path.into(),
            value: Some(value.into()),
        }
    }

    /// The single field name addressed by `path`.
    pub fn field_name(&self) -> CoreResult<&str> {
        match self.path.strip_prefix('/') {
            Some(name) if !name.is_empty() && !name.contains('/') => Ok(name),
            _ => Err(CoreError::bad_request(format!(
                "Invalid patch path '{}'. Expected a single '/<field>' segment",
                self.path
            ))),
        }
    }
}
