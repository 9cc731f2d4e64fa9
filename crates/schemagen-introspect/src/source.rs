use schemagen_core::Result;

use crate::rows::{EnumMemberRow, ForeignKeyRow, ProcedureRow, TableRow};

/// Enum-member query for one enum table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumQuery {
    pub schema: String,
    pub table: String,
    pub name_column: String,
    pub value_column: String,
}

/// Narrow read interface over a database catalog.
///
/// Table and procedure rows must be grouped by object. Calls are synchronous
/// round-trips; any error aborts the current build.
pub trait SchemaSource {
    /// Returns the engine identifier (e.g. `sqlserver`).
    fn engine(&self) -> &str;

    fn table_rows(&self) -> Result<Vec<TableRow>>;

    fn foreign_key_rows(&self) -> Result<Vec<ForeignKeyRow>>;

    fn procedure_rows(&self) -> Result<Vec<ProcedureRow>>;

    /// Fetch the `(name, value)` rows of an enum table.
    fn enum_members(&self, query: &EnumQuery) -> Result<Vec<EnumMemberRow>>;
}
