//! Collision-free navigation property names per table.

use std::collections::HashMap;

use tracing::warn;

use schemagen_core::{Table, TableId, UniqueNames};

/// Per-table registry of navigation property names.
///
/// Each table's set is seeded on first use with its class name and the
/// human-readable names of its columns.
#[derive(Debug, Default)]
pub struct NameRegistry {
    tables: HashMap<TableId, UniqueNames>,
    exhausted: usize,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a collision-free variant of `name` on `table`.
    pub fn claim(&mut self, table: &Table, name: &str) -> String {
        let names = self.tables.entry(table.id).or_insert_with(|| {
            UniqueNames::seeded(
                std::iter::once(table.class_name.clone()).chain(
                    table
                        .columns
                        .iter()
                        .map(|column| column.property_name_human_case.clone()),
                ),
            )
        });
        let was_taken = names.contains(name);
        let claimed = names.claim(name);
        if was_taken && claimed == name {
            self.exhausted += 1;
            warn!(
                table = %table.qualified_name(),
                name,
                "property name suffixes exhausted; keeping colliding name"
            );
        }
        claimed
    }

    /// Number of claims that ran out of suffixes.
    pub fn exhausted(&self) -> usize {
        self.exhausted
    }
}
