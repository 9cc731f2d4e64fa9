//! Foreign-key endpoint resolution against the surviving tables.

use tracing::warn;

use schemagen_core::{ForeignKey, ResolvedEndpoints, SchemaModel, Table};

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub dropped: usize,
}

fn is_candidate(table: &Table) -> bool {
    !table.is_rejected() && !table.is_omitted
}

/// Resolve every foreign-key record within the non-rejected, non-omitted
/// tables and flag the referencing columns.
///
/// Records whose endpoints cannot be found are left unresolved.
pub fn resolve_foreign_keys(model: &mut SchemaModel) -> ResolveStats {
    let mut stats = ResolveStats::default();
    for fk in &mut model.foreign_keys {
        fk.resolved = find_endpoints(&model.tables, fk);
        if fk.resolved.is_some() {
            stats.resolved += 1;
        } else {
            stats.dropped += 1;
            warn!(
                constraint = %fk.constraint_name,
                fk_table = %format!("{}.{}", fk.fk_schema, fk.fk_table),
                pk_table = %format!("{}.{}", fk.pk_schema, fk.pk_table),
                "dropping unresolvable foreign key"
            );
        }
    }
    refresh_column_flags(model);
    stats
}

fn find_endpoints(tables: &[Table], fk: &ForeignKey) -> Option<ResolvedEndpoints> {
    let fk_table = tables
        .iter()
        .find(|table| is_candidate(table) && table.is_named(&fk.fk_schema, &fk.fk_table))?;
    let pk_table = tables
        .iter()
        .find(|table| is_candidate(table) && table.is_named(&fk.pk_schema, &fk.pk_table))?;
    Some(ResolvedEndpoints {
        fk_table: fk_table.id,
        fk_column: fk_table.column_index(&fk.fk_column)?,
        pk_table: pk_table.id,
        pk_column: pk_table.column_index(&fk.pk_column)?,
    })
}

/// Drop resolutions whose endpoints have since been rejected.
pub fn prune_rejected(model: &mut SchemaModel) -> usize {
    let mut pruned = 0;
    for fk in &mut model.foreign_keys {
        let Some(endpoints) = fk.resolved else {
            continue;
        };
        let rejected = [endpoints.fk_table, endpoints.pk_table]
            .iter()
            .any(|id| model.tables.get(id.0).is_none_or(|table| !is_candidate(table)));
        if rejected {
            fk.resolved = None;
            pruned += 1;
            warn!(
                constraint = %fk.constraint_name,
                "dropping foreign key to rejected table"
            );
        }
    }
    if pruned > 0 {
        refresh_column_flags(model);
    }
    pruned
}

/// Recompute foreign-key flags on every column from the resolved records.
fn refresh_column_flags(model: &mut SchemaModel) {
    for column in model.tables.iter_mut().flat_map(|table| table.columns.iter_mut()) {
        column.is_foreign_key = false;
        column.is_foreign_key_enum = false;
    }
    let resolved: Vec<ResolvedEndpoints> =
        model.foreign_keys.iter().filter_map(|fk| fk.resolved).collect();
    for endpoints in resolved {
        let target_is_enum = model
            .table(endpoints.pk_table)
            .is_some_and(|table| table.is_enum());
        if let Some(column) = model
            .table_mut(endpoints.fk_table)
            .and_then(|table| table.columns.get_mut(endpoints.fk_column))
        {
            column.is_foreign_key = true;
            column.is_foreign_key_enum |= target_is_enum;
        }
    }
}
