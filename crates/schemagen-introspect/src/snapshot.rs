use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use schemagen_core::{Error, Result};

use crate::rows::{EnumMemberRow, ForeignKeyRow, ProcedureRow, TableRow};
use crate::source::{EnumQuery, SchemaSource};

fn default_engine() -> String {
    "sqlserver".to_string()
}

/// Catalog rows captured from a database, stored as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_engine")]
    pub engine: String,
    pub tables: Vec<TableRow>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRow>,
    #[serde(default)]
    pub procedures: Vec<ProcedureRow>,
    /// Enum members keyed by `schema.table`.
    #[serde(default)]
    pub enum_members: BTreeMap<String, Vec<EnumMemberRow>>,
}

/// [`SchemaSource`] replaying a recorded [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl SchemaSource for SnapshotSource {
    fn engine(&self) -> &str {
        &self.snapshot.engine
    }

    fn table_rows(&self) -> Result<Vec<TableRow>> {
        Ok(self.snapshot.tables.clone())
    }

    fn foreign_key_rows(&self) -> Result<Vec<ForeignKeyRow>> {
        Ok(self.snapshot.foreign_keys.clone())
    }

    fn procedure_rows(&self) -> Result<Vec<ProcedureRow>> {
        Ok(self.snapshot.procedures.clone())
    }

    fn enum_members(&self, query: &EnumQuery) -> Result<Vec<EnumMemberRow>> {
        let key = format!("{}.{}", query.schema, query.table);
        self.snapshot
            .enum_members
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| Error::Source(format!("no enum members recorded for {key}")))
    }
}
