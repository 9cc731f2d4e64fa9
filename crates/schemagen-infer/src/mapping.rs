//! Detection of pure many-to-many join tables.

use std::collections::BTreeSet;

use tracing::debug;

use schemagen_core::{
    ForeignKey, JoinMapping, Relationship, ResolvedEndpoints, ReverseNavigation, SchemaModel,
    Table, TableId,
};

use crate::names::NameRegistry;

/// A detected join table and the edge to each endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct JoinPair {
    join: TableId,
    left: ResolvedEndpoints,
    right: ResolvedEndpoints,
}

/// Flag join tables and attach many-to-many navigations to both endpoints.
/// Returns the ids of the detected join tables.
pub fn detect_mapping_tables(model: &mut SchemaModel, names: &mut NameRegistry) -> Vec<TableId> {
    let pairs: Vec<JoinPair> = model
        .tables
        .iter()
        .filter_map(|table| join_pair(table, &model.foreign_keys))
        .collect();

    let mut detected = Vec::with_capacity(pairs.len());
    for pair in pairs {
        attach(model, names, &pair);
        detected.push(pair.join);
    }
    detected
}

/// Returns the endpoints when `table` is a pure join table: exactly two
/// non-nullable key columns, each covered by exactly one constraint, pointing
/// at two different tables.
fn join_pair(table: &Table, foreign_keys: &[ForeignKey]) -> Option<JoinPair> {
    if table.is_rejected() || table.is_omitted || table.columns.len() != 2 {
        return None;
    }
    if table
        .columns
        .iter()
        .any(|column| !column.is_primary_key || column.is_nullable)
    {
        return None;
    }

    let edges: Vec<(&ForeignKey, ResolvedEndpoints)> = foreign_keys
        .iter()
        .filter_map(|fk| fk.resolved.map(|endpoints| (fk, endpoints)))
        .filter(|(_, endpoints)| endpoints.fk_table == table.id)
        .collect();

    let mut per_column = Vec::with_capacity(2);
    for column in 0..2 {
        let constraints: BTreeSet<&str> = edges
            .iter()
            .filter(|(_, endpoints)| endpoints.fk_column == column)
            .map(|(fk, _)| fk.constraint_name.as_str())
            .collect();
        if constraints.len() != 1 {
            return None;
        }
        let (_, endpoints) = edges
            .iter()
            .find(|(_, endpoints)| endpoints.fk_column == column)?;
        per_column.push(*endpoints);
    }

    let (left, right) = (per_column[0], per_column[1]);
    if left.pk_table == right.pk_table {
        return None;
    }
    Some(JoinPair {
        join: table.id,
        left,
        right,
    })
}

fn attach(model: &mut SchemaModel, names: &mut NameRegistry, pair: &JoinPair) {
    let (Some(join), Some(left), Some(right)) = (
        model.table(pair.join),
        model.table(pair.left.pk_table),
        model.table(pair.right.pk_table),
    ) else {
        return;
    };

    let left_property = names.claim(left, &right.class_collection_name);
    let right_property = names.claim(right, &left.class_collection_name);
    let mapping = JoinMapping {
        join_schema: join.schema.clone(),
        join_table: join.name.clone(),
        left: left.id,
        left_key: join.columns[pair.left.fk_column].name.clone(),
        right: right.id,
        right_key: join.columns[pair.right.fk_column].name.clone(),
        left_property: left_property.clone(),
        right_property: right_property.clone(),
    };
    let to_right = ReverseNavigation {
        constraint_name: None,
        property_name: left_property,
        relationship: Relationship::ManyToMany,
        target: right.id,
        target_class_name: right.class_name.clone(),
        is_collection: true,
    };
    let to_left = ReverseNavigation {
        constraint_name: None,
        property_name: right_property,
        relationship: Relationship::ManyToMany,
        target: left.id,
        target_class_name: left.class_name.clone(),
        is_collection: true,
    };
    debug!(
        join = %join.qualified_name(),
        left = %left.qualified_name(),
        right = %right.qualified_name(),
        "detected mapping table"
    );

    if let Some(join) = model.table_mut(pair.join) {
        join.is_mapping = true;
    }
    if let Some(left) = model.table_mut(pair.left.pk_table) {
        left.join_mappings.push(mapping);
        left.reverse_navigations.push(to_right);
    }
    if let Some(right) = model.table_mut(pair.right.pk_table) {
        right.reverse_navigations.push(to_left);
    }
}
