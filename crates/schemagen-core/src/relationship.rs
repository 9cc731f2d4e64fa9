//! Cardinality classification and the structured navigation records attached
//! to tables during inference.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::TableId;

/// Cardinality of a foreign-key edge, seen from the referencing side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Relationship {
    /// Classify an edge from the primary-key flags of its two columns and the
    /// primary-key column counts of the two tables.
    ///
    /// Rules are evaluated in order; the first match wins.
    pub fn classify(
        fk_column_is_pk: bool,
        pk_column_is_pk: bool,
        fk_table_pk_count: usize,
        pk_table_pk_count: usize,
    ) -> Self {
        if fk_column_is_pk && pk_column_is_pk && fk_table_pk_count == 1 && pk_table_pk_count == 1
        {
            Relationship::OneToOne
        } else if fk_column_is_pk && !pk_column_is_pk && fk_table_pk_count == 1 {
            Relationship::OneToMany
        } else if !fk_column_is_pk && pk_column_is_pk && pk_table_pk_count == 1 {
            Relationship::ManyToOne
        } else {
            Relationship::ManyToMany
        }
    }

    /// The same edge seen from the other side.
    pub fn inverse(self) -> Self {
        match self {
            Relationship::OneToOne => Relationship::OneToOne,
            Relationship::OneToMany => Relationship::ManyToOne,
            Relationship::ManyToOne => Relationship::OneToMany,
            Relationship::ManyToMany => Relationship::ManyToMany,
        }
    }

    /// Returns true when the far side of the edge holds many rows.
    pub fn is_collection(self) -> bool {
        matches!(self, Relationship::OneToMany | Relationship::ManyToMany)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::OneToOne => "one_to_one",
            Relationship::OneToMany => "one_to_many",
            Relationship::ManyToOne => "many_to_one",
            Relationship::ManyToMany => "many_to_many",
        }
    }
}

/// Forward navigation from the referencing table to the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceNavigation {
    pub constraint_name: String,
    pub property_name: String,
    pub relationship: Relationship,
    pub target: TableId,
    pub target_class_name: String,
    /// Indexes of the referencing columns on the owning table.
    pub columns: Vec<usize>,
    /// Name of the matching reverse navigation on the target table.
    pub inverse_property_name: String,
    /// True when any referencing column is nullable.
    pub is_optional: bool,
}

/// Typed reference from a foreign-key column to an enum table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumReference {
    pub constraint_name: String,
    pub property_name: String,
    pub column: usize,
    pub target: TableId,
    pub enum_name: String,
    pub is_optional: bool,
}

/// Navigation on the referenced table back to the referencing table, or
/// across a join table to the other endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReverseNavigation {
    /// Constraint backing the navigation; absent for mapping-table navigations.
    pub constraint_name: Option<String>,
    pub property_name: String,
    /// Cardinality from the owning table's point of view.
    pub relationship: Relationship,
    /// Table on the far side of the navigation.
    pub target: TableId,
    pub target_class_name: String,
    pub is_collection: bool,
}

/// Join-table mapping for a many-to-many navigation, stored on the left
/// endpoint of the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JoinMapping {
    pub join_schema: String,
    pub join_table: String,
    pub left: TableId,
    pub left_key: String,
    pub right: TableId,
    pub right_key: String,
    pub left_property: String,
    pub right_property: String,
}
