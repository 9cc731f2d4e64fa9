//! Pluggable predicates deciding whether a table is rejected.

use regex::Regex;

use schemagen_core::{
    Error, GeneratorOptions, Rejection, RejectionCode, Result, Table, TableKind,
};

const VIEW_PREFIX: &str = "vw_";

/// A predicate that may reject a table before inference.
pub trait RejectionRule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn check(&self, table: &Table) -> Option<Rejection>;
}

/// Rejects tables outside the configured schema.
#[derive(Debug, Clone)]
pub struct SchemaFilterRule {
    schema: String,
}

impl SchemaFilterRule {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }
}

impl RejectionRule for SchemaFilterRule {
    fn name(&self) -> &str {
        "schema_filter"
    }

    fn check(&self, table: &Table) -> Option<Rejection> {
        if table.schema.eq_ignore_ascii_case(&self.schema) {
            return None;
        }
        Some(Rejection::new(
            RejectionCode::SchemaMismatch,
            format!(
                "schema mismatch: '{}' does not match the schema filter '{}'",
                table.schema, self.schema
            ),
        ))
    }
}

/// Rejects tables (not views) that declare no primary key.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingPrimaryKeyRule;

impl RejectionRule for MissingPrimaryKeyRule {
    fn name(&self) -> &str {
        "missing_primary_key"
    }

    fn check(&self, table: &Table) -> Option<Rejection> {
        if table.kind != TableKind::Table || table.primary_key_count() > 0 {
            return None;
        }
        Some(no_primary_key())
    }
}

/// Rejection recorded for tables without a usable key.
pub fn no_primary_key() -> Rejection {
    Rejection::new(
        RejectionCode::NoPrimaryKey,
        "no primary key: entities require at least one key column",
    )
}

/// Rejects tables whose name matches an exclusion pattern.
///
/// Patterns are tested against both `name` and `schema.name`.
#[derive(Debug, Clone)]
pub struct NameExclusionRule {
    patterns: Vec<Regex>,
}

impl NameExclusionRule {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|err| {
                    Error::InvalidInput(format!(
                        "invalid exclusion pattern '{}': {err}",
                        pattern.as_ref()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl RejectionRule for NameExclusionRule {
    fn name(&self) -> &str {
        "name_exclusion"
    }

    fn check(&self, table: &Table) -> Option<Rejection> {
        let qualified = format!("{}.{}", table.schema, table.name);
        let pattern = self
            .patterns
            .iter()
            .find(|pattern| pattern.is_match(&table.name) || pattern.is_match(&qualified))?;
        Some(Rejection::new(
            RejectionCode::NameExcluded,
            format!("table name filter: matches exclusion pattern '{}'", pattern.as_str()),
        ))
    }
}

/// Rejects every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewExclusionRule;

impl RejectionRule for ViewExclusionRule {
    fn name(&self) -> &str {
        "view_exclusion"
    }

    fn check(&self, table: &Table) -> Option<Rejection> {
        table.is_view().then(|| {
            Rejection::new(
                RejectionCode::ViewExcluded,
                "views are excluded by the generation options",
            )
        })
    }
}

/// Rejects views whose name lacks the `vw_` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewPrefixRule;

impl RejectionRule for ViewPrefixRule {
    fn name(&self) -> &str {
        "view_prefix"
    }

    fn check(&self, table: &Table) -> Option<Rejection> {
        if !table.is_view() || table.name.starts_with(VIEW_PREFIX) {
            return None;
        }
        Some(Rejection::new(
            RejectionCode::ViewNaming,
            format!("view naming: '{}' does not start with '{VIEW_PREFIX}'", table.name),
        ))
    }
}

/// Build the rule set selected by `options`.
///
/// The missing-primary-key rule is always present; the schema filter is
/// present whenever a schema is configured.
pub fn rules_from_options(options: &GeneratorOptions) -> Result<Vec<Box<dyn RejectionRule>>> {
    let mut rules: Vec<Box<dyn RejectionRule>> = Vec::new();
    if let Some(schema) = options.schema.as_deref().filter(|s| !s.trim().is_empty()) {
        rules.push(Box::new(SchemaFilterRule::new(schema.trim())));
    }
    if !options.exclude_tables.is_empty() {
        rules.push(Box::new(NameExclusionRule::new(&options.exclude_tables)?));
    }
    if !options.include_views {
        rules.push(Box::new(ViewExclusionRule));
    }
    if options.require_view_prefix {
        rules.push(Box::new(ViewPrefixRule));
    }
    rules.push(Box::new(MissingPrimaryKeyRule));
    Ok(rules)
}
