use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a schema object was excluded from emission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    /// Object lives outside the configured schema.
    SchemaMismatch,
    /// No primary key was declared or could be synthesized.
    NoPrimaryKey,
    /// Object name matched an exclusion pattern.
    NameExcluded,
    /// Views are disabled in the current configuration.
    ViewExcluded,
    /// View name does not follow the `vw_` naming policy.
    ViewNaming,
    /// Reason produced by a caller-supplied rule.
    Custom(String),
}

/// A single, human-readable rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rejection {
    pub code: RejectionCode,
    pub message: String,
}

impl Rejection {
    pub fn new(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
