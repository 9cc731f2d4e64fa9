use tracing::info;

use schemagen_core::{GeneratorOptions, Normalizer, Pluralizer, Result};
use schemagen_introspect::{build_model, read_model, ForeignKeyRow, ProcedureRow, SchemaSource, TableRow};

use crate::engine::InferenceEngine;
use crate::model::GenerationResult;
use crate::rules::RejectionRule;

/// Entry point running the model builder and the inference engine.
#[derive(Debug)]
pub struct ModelGenerator {
    options: GeneratorOptions,
    normalizer: Normalizer,
    engine: InferenceEngine,
}

impl ModelGenerator {
    /// Generator with the default English pluralizer and the rule set
    /// selected by `options`.
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        let engine = InferenceEngine::from_options(&options)?;
        Ok(Self {
            options,
            normalizer: Normalizer::default(),
            engine,
        })
    }

    pub fn with_pluralizer(mut self, pluralizer: impl Pluralizer + 'static) -> Self {
        self.normalizer = Normalizer::new(pluralizer);
        self
    }

    pub fn with_rule(mut self, rule: impl RejectionRule + 'static) -> Self {
        self.engine = self.engine.with_rule(rule);
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Read every row from `source`, build the model, and run inference.
    pub fn generate(&self, source: &dyn SchemaSource) -> Result<GenerationResult> {
        info!(engine = source.engine(), "generating model");
        let mut model = read_model(source, &self.normalizer, &self.options)?;
        let report = self.engine.run(&mut model);
        Ok(GenerationResult { model, report })
    }

    /// Build and infer from rows already in hand. Enum members are not
    /// fetched on this path.
    pub fn build(
        &self,
        table_rows: Vec<TableRow>,
        foreign_key_rows: Vec<ForeignKeyRow>,
        procedure_rows: Vec<ProcedureRow>,
    ) -> Result<GenerationResult> {
        let mut model = build_model(
            table_rows,
            foreign_key_rows,
            procedure_rows,
            &self.normalizer,
            &self.options,
        )?;
        let report = self.engine.run(&mut model);
        Ok(GenerationResult { model, report })
    }
}
