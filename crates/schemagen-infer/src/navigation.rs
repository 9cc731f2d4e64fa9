//! Cardinality classification and navigation attachment for resolved edges.

use std::collections::BTreeMap;

use tracing::debug;

use schemagen_core::{
    EnumReference, ForeignKey, ReferenceNavigation, Relationship, ResolvedEndpoints,
    ReverseNavigation, SchemaModel,
};

use crate::names::NameRegistry;

/// Counts produced by [`attach_navigations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStats {
    pub relationships: BTreeMap<Relationship, usize>,
    pub enum_references: usize,
}

/// One constraint with all of its resolved column pairs.
#[derive(Debug, Clone)]
struct ConstraintGroup {
    constraint_name: String,
    edges: Vec<ResolvedEndpoints>,
}

/// Classify every resolved constraint outside mapping tables and attach the
/// forward and reverse navigations, or an enum reference when the target is
/// an enum table.
pub fn attach_navigations(model: &mut SchemaModel, names: &mut NameRegistry) -> NavigationStats {
    let mut stats = NavigationStats::default();
    for group in constraint_groups(&model.foreign_keys) {
        let Some(first) = group.edges.first().copied() else {
            continue;
        };
        let (Some(fk_table), Some(pk_table)) =
            (model.table(first.fk_table), model.table(first.pk_table))
        else {
            continue;
        };
        if fk_table.is_mapping || pk_table.is_mapping {
            continue;
        }

        if pk_table.is_enum() {
            attach_enum_reference(model, names, &group, first);
            stats.enum_references += 1;
        } else {
            let relationship = attach_relationship(model, names, &group, first);
            *stats.relationships.entry(relationship).or_insert(0) += 1;
        }
    }
    stats
}

/// Group resolved records by (fk schema, fk table, constraint) in first-seen order.
fn constraint_groups(foreign_keys: &[ForeignKey]) -> Vec<ConstraintGroup> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut groups: BTreeMap<(String, String, String), ConstraintGroup> = BTreeMap::new();
    for fk in foreign_keys {
        let Some(endpoints) = fk.resolved else {
            continue;
        };
        let key = fk.group_key();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                ConstraintGroup {
                    constraint_name: fk.constraint_name.clone(),
                    edges: Vec::new(),
                }
            })
            .edges
            .push(endpoints);
    }
    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}

fn attach_enum_reference(
    model: &mut SchemaModel,
    names: &mut NameRegistry,
    group: &ConstraintGroup,
    first: ResolvedEndpoints,
) {
    let (Some(fk_table), Some(pk_table)) =
        (model.table(first.fk_table), model.table(first.pk_table))
    else {
        return;
    };
    let reference = EnumReference {
        constraint_name: group.constraint_name.clone(),
        property_name: names.claim(fk_table, &pk_table.class_name),
        column: first.fk_column,
        target: pk_table.id,
        enum_name: pk_table.enum_name().to_string(),
        is_optional: fk_table
            .columns
            .get(first.fk_column)
            .is_some_and(|column| column.is_nullable),
    };
    debug!(
        constraint = %group.constraint_name,
        table = %fk_table.qualified_name(),
        enum_name = %reference.enum_name,
        "attached enum reference"
    );
    if let Some(fk_table) = model.table_mut(first.fk_table) {
        fk_table.enum_references.push(reference);
    }
}

fn attach_relationship(
    model: &mut SchemaModel,
    names: &mut NameRegistry,
    group: &ConstraintGroup,
    first: ResolvedEndpoints,
) -> Relationship {
    let (Some(fk_table), Some(pk_table)) =
        (model.table(first.fk_table), model.table(first.pk_table))
    else {
        return Relationship::ManyToMany;
    };
    let fk_column_is_pk = fk_table
        .columns
        .get(first.fk_column)
        .is_some_and(|column| column.is_primary_key);
    let pk_column_is_pk = pk_table
        .columns
        .get(first.pk_column)
        .is_some_and(|column| column.is_primary_key);
    let relationship = Relationship::classify(
        fk_column_is_pk,
        pk_column_is_pk,
        fk_table.primary_key_count(),
        pk_table.primary_key_count(),
    );

    let reverse_relationship = relationship.inverse();
    let reverse_is_collection = reverse_relationship.is_collection();
    let forward_name = names.claim(fk_table, &pk_table.class_name);
    let reverse_base = if reverse_is_collection {
        &fk_table.class_collection_name
    } else {
        &fk_table.class_name
    };
    let reverse_name = names.claim(pk_table, reverse_base);

    let columns: Vec<usize> = group.edges.iter().map(|edge| edge.fk_column).collect();
    let forward = ReferenceNavigation {
        constraint_name: group.constraint_name.clone(),
        property_name: forward_name,
        relationship,
        target: pk_table.id,
        target_class_name: pk_table.class_name.clone(),
        is_optional: columns.iter().any(|idx| {
            fk_table
                .columns
                .get(*idx)
                .is_some_and(|column| column.is_nullable)
        }),
        columns,
        inverse_property_name: reverse_name.clone(),
    };
    let reverse = ReverseNavigation {
        constraint_name: Some(group.constraint_name.clone()),
        property_name: reverse_name,
        relationship: reverse_relationship,
        target: fk_table.id,
        target_class_name: fk_table.class_name.clone(),
        is_collection: reverse_is_collection,
    };
    debug!(
        constraint = %group.constraint_name,
        fk_table = %fk_table.qualified_name(),
        pk_table = %pk_table.qualified_name(),
        relationship = relationship.as_str(),
        "classified relationship"
    );

    if let Some(fk_table) = model.table_mut(first.fk_table) {
        fk_table.references.push(forward);
    }
    if let Some(pk_table) = model.table_mut(first.pk_table) {
        pk_table.reverse_navigations.push(reverse);
    }
    relationship
}
