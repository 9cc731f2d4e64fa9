//! Raw catalog rows as returned by a schema source.

use serde::{Deserialize, Serialize};

fn included() -> bool {
    true
}

/// One column of a table or view; consecutive rows with the same schema and
/// object name belong to the same object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub schema_name: String,
    pub object_name: String,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default)]
    pub enum_name_column: Option<String>,
    #[serde(default)]
    pub enum_value_column: Option<String>,
    #[serde(default = "included")]
    pub is_included: bool,
    pub column_name: String,
    pub type_name: String,
    pub ordinal: i32,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub is_store_generated: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub max_length: Option<i32>,
    #[serde(default)]
    pub precision: Option<i32>,
    #[serde(default)]
    pub scale: Option<i32>,
    #[serde(default)]
    pub default: Option<String>,
}

/// One column pair of a foreign-key constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub fk_schema: String,
    pub fk_table: String,
    pub fk_column: String,
    pub pk_schema: String,
    pub pk_table: String,
    pub pk_column: String,
}

/// One parameter of a stored procedure, or the procedure alone when it has
/// no parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureRow {
    pub schema_name: String,
    pub object_name: String,
    #[serde(default)]
    pub method_name: Option<String>,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub execution_mode: Option<String>,
    #[serde(default = "included")]
    pub is_included: bool,
    #[serde(default)]
    pub parameter_name: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub ordinal: Option<i32>,
    #[serde(default)]
    pub is_output: bool,
    #[serde(default)]
    pub max_length: Option<i32>,
    #[serde(default)]
    pub precision: Option<i32>,
    #[serde(default)]
    pub scale: Option<i32>,
    #[serde(default)]
    pub default: Option<String>,
}

/// A `(name, value)` pair read from an enum table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberRow {
    pub name: String,
    pub value: String,
}
