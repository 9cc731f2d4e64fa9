use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use schemagen_core::{Rejection, SchemaModel};

/// Rejection reasons recorded on one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedObject {
    pub schema: String,
    pub name: String,
    pub reasons: Vec<Rejection>,
}

/// Summary of one inference run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceReport {
    pub run_id: String,
    pub tables: usize,
    pub emitted_tables: usize,
    pub rejected_tables: usize,
    pub omitted_objects: usize,
    pub mapping_tables: Vec<String>,
    pub synthesized_keys: Vec<String>,
    pub resolved_foreign_keys: usize,
    pub dropped_foreign_keys: usize,
    pub relationships: BTreeMap<String, usize>,
    pub enum_references: usize,
    pub exhausted_names: usize,
    pub rejections: Vec<RejectedObject>,
    pub duration_ms: u64,
}

impl InferenceReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            tables: 0,
            emitted_tables: 0,
            rejected_tables: 0,
            omitted_objects: 0,
            mapping_tables: Vec::new(),
            synthesized_keys: Vec::new(),
            resolved_foreign_keys: 0,
            dropped_foreign_keys: 0,
            relationships: BTreeMap::new(),
            enum_references: 0,
            exhausted_names: 0,
            rejections: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_relationship(&mut self, kind: &str, count: usize) {
        *self.relationships.entry(kind.to_string()).or_insert(0) += count;
    }

    /// Fill table counts and rejection reasons from the finished model.
    pub fn summarize(&mut self, model: &SchemaModel) {
        self.tables = model.tables.len();
        self.emitted_tables = model.emittable_tables().count();
        self.rejected_tables = model.rejected_tables().count();
        self.omitted_objects = model.tables.iter().filter(|t| t.is_omitted).count()
            + model.procedures.iter().filter(|p| p.is_omitted).count();
        self.rejections = model
            .rejected_tables()
            .map(|table| RejectedObject {
                schema: table.schema.clone(),
                name: table.name.clone(),
                reasons: table.rejections.clone(),
            })
            .collect();
    }
}

/// Result of a full build: the inferred model and its report.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub model: SchemaModel,
    pub report: InferenceReport,
}
