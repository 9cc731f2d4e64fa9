use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::TableId;

/// One column pair of a foreign-key constraint.
///
/// Composite constraints appear as several records sharing a constraint name.
/// The resolved endpoint keys are either all present or all absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub fk_schema: String,
    pub fk_table: String,
    pub fk_column: String,
    pub pk_schema: String,
    pub pk_table: String,
    pub pk_column: String,
    pub resolved: Option<ResolvedEndpoints>,
}

/// Arena keys of both endpoints of a resolved foreign-key edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedEndpoints {
    pub fk_table: TableId,
    pub fk_column: usize,
    pub pk_table: TableId,
    pub pk_column: usize,
}

impl ForeignKey {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Grouping key for composite constraints.
    pub fn group_key(&self) -> (String, String, String) {
        (
            self.fk_schema.to_lowercase(),
            self.fk_table.to_lowercase(),
            self.constraint_name.clone(),
        )
    }
}
