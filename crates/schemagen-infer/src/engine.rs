use std::fmt;
use std::time::Instant;

use tracing::{debug, info};

use schemagen_core::{GeneratorOptions, Result, SchemaModel};

use crate::keys::{reject_keyless_tables, synthesize_primary_keys};
use crate::mapping::detect_mapping_tables;
use crate::model::InferenceReport;
use crate::names::NameRegistry;
use crate::navigation::attach_navigations;
use crate::resolve::{prune_rejected, resolve_foreign_keys};
use crate::rules::{rules_from_options, RejectionRule};

/// Ordered inference pipeline over an assembled [`SchemaModel`].
///
/// Steps run in a fixed order: rejection rules, foreign-key resolution,
/// primary-key synthesis, mapping-table detection, then relationship
/// classification with navigation and enum-reference attachment.
pub struct InferenceEngine {
    rules: Vec<Box<dyn RejectionRule>>,
}

impl InferenceEngine {
    pub fn new(rules: Vec<Box<dyn RejectionRule>>) -> Self {
        Self { rules }
    }

    /// Engine with the rule set selected by `options`.
    pub fn from_options(options: &GeneratorOptions) -> Result<Self> {
        Ok(Self::new(rules_from_options(options)?))
    }

    /// Append a caller-supplied rule.
    pub fn with_rule(mut self, rule: impl RejectionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every inference step on `model` in place.
    ///
    /// Never fails: problems degrade into rejections, dropped edges, or
    /// colliding names, all reflected in the returned report.
    pub fn run(&self, model: &mut SchemaModel) -> InferenceReport {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = InferenceReport::new(run_id.clone());
        info!(
            run_id = %run_id,
            tables = model.tables.len(),
            foreign_keys = model.foreign_keys.len(),
            rules = self.rules.len(),
            "inference started"
        );

        self.apply_rules(model);

        let resolved = resolve_foreign_keys(model);

        let synthesized = synthesize_primary_keys(model);
        report.synthesized_keys = synthesized
            .iter()
            .filter_map(|id| model.table(*id))
            .map(|table| table.qualified_name())
            .collect();
        reject_keyless_tables(model);
        let pruned = prune_rejected(model);
        report.resolved_foreign_keys = resolved.resolved - pruned;
        report.dropped_foreign_keys = resolved.dropped + pruned;

        let mut names = NameRegistry::new();
        let mapping = detect_mapping_tables(model, &mut names);
        report.mapping_tables = mapping
            .iter()
            .filter_map(|id| model.table(*id))
            .map(|table| table.qualified_name())
            .collect();

        let navigation = attach_navigations(model, &mut names);
        for (relationship, count) in &navigation.relationships {
            report.record_relationship(relationship.as_str(), *count);
        }
        report.enum_references = navigation.enum_references;
        report.exhausted_names = names.exhausted();

        report.summarize(model);
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            emitted = report.emitted_tables,
            rejected = report.rejected_tables,
            mapping = report.mapping_tables.len(),
            dropped_foreign_keys = report.dropped_foreign_keys,
            duration_ms = report.duration_ms,
            "inference finished"
        );
        report
    }

    fn apply_rules(&self, model: &mut SchemaModel) {
        for table in model.tables.iter_mut().filter(|table| !table.is_omitted) {
            for rule in &self.rules {
                if let Some(rejection) = rule.check(table) {
                    debug!(
                        table = %table.qualified_name(),
                        rule = rule.name(),
                        reason = %rejection,
                        "table rejected"
                    );
                    table.reject(rejection);
                }
            }
        }
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(vec![Box::new(crate::rules::MissingPrimaryKeyRule)])
    }
}

impl fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}
