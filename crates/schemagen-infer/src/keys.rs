//! Primary-key synthesis for tables without declared keys.

use tracing::debug;

use schemagen_core::{SchemaModel, TableId};

use crate::rules::no_primary_key;

/// Promote every non-nullable column to a key column on each included table
/// that has no primary key. Returns the tables that received a synthesized
/// key.
///
/// Tables already rejected for lacking a declared key keep that rejection.
pub fn synthesize_primary_keys(model: &mut SchemaModel) -> Vec<TableId> {
    let mut synthesized = Vec::new();
    for table in model
        .tables
        .iter_mut()
        .filter(|table| !table.is_omitted && table.primary_key_count() == 0)
    {
        let mut promoted = 0;
        for column in table.columns.iter_mut().filter(|column| !column.is_nullable) {
            column.is_primary_key = true;
            promoted += 1;
        }
        if promoted > 0 {
            debug!(
                table = %table.qualified_name(),
                columns = promoted,
                "synthesized composite primary key"
            );
            synthesized.push(table.id);
        }
    }
    synthesized
}

/// Reject every included table still lacking a primary key. Returns how many
/// tables were newly rejected.
pub fn reject_keyless_tables(model: &mut SchemaModel) -> usize {
    model
        .tables
        .iter_mut()
        .filter(|table| !table.is_omitted && table.primary_key_count() == 0)
        .map(|table| table.reject(no_primary_key()))
        .filter(|added| *added)
        .count()
}
