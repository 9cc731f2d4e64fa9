use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::ForeignKey;
use crate::procedures::StoredProcedure;
use crate::rejection::{Rejection, RejectionCode};
use crate::relationship::{EnumReference, JoinMapping, ReferenceNavigation, ReverseNavigation};
use crate::types::CodeType;

/// Stable arena key of a [`Table`] inside a [`SchemaModel`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TableId(pub usize);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The assembled model for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaModel {
    /// Table arena; a table's [`TableId`] is its index.
    pub tables: Vec<Table>,
    pub procedures: Vec<StoredProcedure>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl SchemaModel {
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0)
    }

    /// Look up a table by schema and SQL name, ignoring case.
    pub fn find_table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.is_named(schema, name))
    }

    /// Tables that reach emission as entities.
    pub fn emittable_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|table| table.is_emittable())
    }

    pub fn rejected_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|table| table.is_rejected())
    }

    pub fn mapping_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|table| table.is_mapping)
    }

    /// Included stored procedures grouped by container name, in name order.
    pub fn procedures_by_container(&self) -> BTreeMap<&str, Vec<&StoredProcedure>> {
        let mut grouped: BTreeMap<&str, Vec<&StoredProcedure>> = BTreeMap::new();
        for procedure in self.procedures.iter().filter(|p| !p.is_omitted) {
            grouped
                .entry(procedure.container_name.as_str())
                .or_default()
                .push(procedure);
        }
        grouped
    }

    /// Read-only view handed to code emission.
    ///
    /// Mapping tables and omitted objects never appear; rejected tables appear
    /// only when `keep_rejected` is set.
    pub fn emission_view(&self, keep_rejected: bool) -> EmissionView<'_> {
        let tables = self
            .tables
            .iter()
            .filter(|table| !table.is_mapping && !table.is_omitted)
            .filter(|table| keep_rejected || !table.is_rejected())
            .collect();
        EmissionView {
            tables,
            procedures: self.procedures_by_container(),
        }
    }
}

/// Borrowed, serializable projection of a [`SchemaModel`] for emission.
#[derive(Debug, Serialize)]
pub struct EmissionView<'a> {
    pub tables: Vec<&'a Table>,
    pub procedures: BTreeMap<&'a str, Vec<&'a StoredProcedure>>,
}

/// Kind of relational object a [`Table`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Table,
    View,
}

/// Column pair designating a table as an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumHint {
    pub name_column: String,
    pub value_column: String,
}

/// One named constant of an enum table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

/// A table or view with its columns and inferred navigation records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub schema: String,
    pub kind: TableKind,
    pub class_name: String,
    pub class_collection_name: String,
    pub columns: Vec<Column>,
    pub enum_hint: Option<EnumHint>,
    pub enum_members: Vec<EnumMember>,
    /// Excluded by an inclusion hint; never emitted or referenced.
    pub is_omitted: bool,
    /// Pure many-to-many join table.
    pub is_mapping: bool,
    pub rejections: Vec<Rejection>,
    pub references: Vec<ReferenceNavigation>,
    pub enum_references: Vec<EnumReference>,
    pub reverse_navigations: Vec<ReverseNavigation>,
    pub join_mappings: Vec<JoinMapping>,
}

impl Table {
    pub fn qualified_name(&self) -> String {
        format!("[{}].[{}]", self.schema, self.name)
    }

    pub fn is_named(&self, schema: &str, name: &str) -> bool {
        self.schema.eq_ignore_ascii_case(schema) && self.name.eq_ignore_ascii_case(name)
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }

    pub fn is_enum(&self) -> bool {
        self.enum_hint.is_some()
    }

    /// Name of the generated enumeration type.
    pub fn enum_name(&self) -> &str {
        &self.class_collection_name
    }

    /// Column by SQL name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_primary_key)
    }

    pub fn primary_key_count(&self) -> usize {
        self.primary_keys().count()
    }

    pub fn has_foreign_key(&self) -> bool {
        self.columns.iter().any(|column| column.is_foreign_key)
    }

    pub fn has_nullable_columns(&self) -> bool {
        self.columns.iter().any(|column| column.is_nullable)
    }

    /// Collection navigations initialised by the generated constructor.
    pub fn collection_navigations(&self) -> impl Iterator<Item = &ReverseNavigation> {
        self.reverse_navigations
            .iter()
            .filter(|navigation| navigation.is_collection)
    }

    pub fn is_rejected(&self) -> bool {
        !self.rejections.is_empty()
    }

    pub fn is_emittable(&self) -> bool {
        !self.is_rejected() && !self.is_omitted && !self.is_mapping
    }

    pub fn has_rejection(&self, code: &RejectionCode) -> bool {
        self.rejections.iter().any(|rejection| &rejection.code == code)
    }

    /// Record a rejection unless one with the same code is already present.
    /// Returns true when the rejection was added.
    pub fn reject(&mut self, rejection: Rejection) -> bool {
        if self.has_rejection(&rejection.code) {
            return false;
        }
        self.rejections.push(rejection);
        true
    }

    /// All rejection messages joined into one explanation.
    pub fn rejection_reason(&self) -> Option<String> {
        if self.rejections.is_empty() {
            return None;
        }
        Some(
            self.rejections
                .iter()
                .map(|rejection| rejection.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// How the store populates a column's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreGeneration {
    None,
    Identity,
    Computed,
}

/// A column of a [`Table`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Owning table.
    pub table: TableId,
    pub name: String,
    /// SQL type name without its size suffix.
    pub sql_type: String,
    pub code_type: CodeType,
    pub ordinal: i32,
    pub is_nullable: bool,
    /// Maximum length; kept for string types only.
    pub max_length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub is_identity: bool,
    pub is_store_generated: bool,
    pub is_row_version: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_foreign_key_enum: bool,
    pub is_enum_name: bool,
    pub is_enum_value: bool,
    /// Raw default expression as declared.
    pub default: Option<String>,
    /// Default translated to a literal expression, when one is valid.
    pub default_literal: Option<String>,
    /// Identifier-safe property name.
    pub property_name: String,
    /// Human-readable property name.
    pub property_name_human_case: String,
}

impl Column {
    pub fn store_generation(&self) -> StoreGeneration {
        if self.is_identity {
            StoreGeneration::Identity
        } else if self.is_store_generated || self.is_row_version {
            StoreGeneration::Computed
        } else {
            StoreGeneration::None
        }
    }

    /// Returns true when the generated property needs an optional wrapper.
    pub fn needs_nullable_wrapper(&self) -> bool {
        self.is_nullable && self.code_type.is_nullable_value_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: usize, name: &str) -> Table {
        Table {
            id: TableId(id),
            name: name.to_string(),
            schema: "dbo".to_string(),
            kind: TableKind::Table,
            class_name: name.to_string(),
            class_collection_name: format!("{name}s"),
            columns: Vec::new(),
            enum_hint: None,
            enum_members: Vec::new(),
            is_omitted: false,
            is_mapping: false,
            rejections: Vec::new(),
            references: Vec::new(),
            enum_references: Vec::new(),
            reverse_navigations: Vec::new(),
            join_mappings: Vec::new(),
        }
    }

    #[test]
    fn rejection_codes_are_recorded_once() {
        let mut t = table(0, "Audit");
        assert!(t.reject(Rejection::new(RejectionCode::NoPrimaryKey, "no primary key")));
        assert!(!t.reject(Rejection::new(RejectionCode::NoPrimaryKey, "still no key")));
        assert!(t.reject(Rejection::new(RejectionCode::SchemaMismatch, "schema 'dbo' excluded")));
        assert_eq!(
            t.rejection_reason().as_deref(),
            Some("no primary key; schema 'dbo' excluded")
        );
        assert!(!t.is_emittable());
    }

    #[test]
    fn emission_view_skips_mapping_and_rejected_tables() {
        let mut rejected = table(1, "Audit");
        rejected.reject(Rejection::new(RejectionCode::NoPrimaryKey, "no primary key"));
        let mut mapping = table(2, "UserRole");
        mapping.is_mapping = true;
        let model = SchemaModel {
            tables: vec![table(0, "Invoice"), rejected, mapping],
            procedures: Vec::new(),
            foreign_keys: Vec::new(),
        };

        let names = |view: EmissionView<'_>| {
            view.tables
                .iter()
                .map(|t| t.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(model.emission_view(false)), vec!["Invoice"]);
        assert_eq!(names(model.emission_view(true)), vec!["Invoice", "Audit"]);
    }

    #[test]
    fn table_lookup_ignores_case() {
        let model = SchemaModel {
            tables: vec![table(0, "Invoice")],
            ..SchemaModel::default()
        };
        assert!(model.find_table("DBO", "invoice").is_some());
        assert!(model.find_table("sales", "Invoice").is_none());
    }
}
