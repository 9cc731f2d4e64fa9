//! Assembly of grouped catalog rows into model entities.

use tracing::{debug, info};

use schemagen_core::naming::to_parameter_name;
use schemagen_core::types::{normalize_type_name, strip_type_size};
use schemagen_core::{
    to_literal, CodeType, Column, EnumHint, EnumMember, Error, ExecutionMode, ForeignKey,
    GeneratorOptions, Normalizer, Parameter, Result, SchemaModel, SqlDbType, StoredProcedure,
    Table, TableId, TableKind, UniqueNames,
};

use crate::rows::{ForeignKeyRow, ProcedureRow, TableRow};
use crate::source::{EnumQuery, SchemaSource};

const ROW_VERSION_LENGTH: i32 = 8;

/// Read every row from `source` and assemble the un-inferred model,
/// including enum members.
pub fn read_model(
    source: &dyn SchemaSource,
    normalizer: &Normalizer,
    options: &GeneratorOptions,
) -> Result<SchemaModel> {
    let table_rows = source.table_rows()?;
    let foreign_key_rows = source.foreign_key_rows()?;
    let procedure_rows = source.procedure_rows()?;
    info!(
        engine = source.engine(),
        table_rows = table_rows.len(),
        foreign_key_rows = foreign_key_rows.len(),
        procedure_rows = procedure_rows.len(),
        "read schema rows"
    );

    let mut model = build_model(
        table_rows,
        foreign_key_rows,
        procedure_rows,
        normalizer,
        options,
    )?;
    fill_enums(&mut model.tables, source, normalizer)?;
    Ok(model)
}

/// Assemble tables, procedures and raw foreign keys from grouped rows.
pub fn build_model(
    table_rows: Vec<TableRow>,
    foreign_key_rows: Vec<ForeignKeyRow>,
    procedure_rows: Vec<ProcedureRow>,
    normalizer: &Normalizer,
    options: &GeneratorOptions,
) -> Result<SchemaModel> {
    Ok(SchemaModel {
        tables: build_tables(table_rows, normalizer)?,
        procedures: build_procedures(procedure_rows, normalizer, options)?,
        foreign_keys: map_foreign_keys(foreign_key_rows),
    })
}

/// One [`Table`] per run of consecutive rows sharing schema and object name.
pub fn build_tables(rows: Vec<TableRow>, normalizer: &Normalizer) -> Result<Vec<Table>> {
    if rows.is_empty() {
        return Err(Error::InvalidInput(
            "at least one table row is required".to_string(),
        ));
    }

    let mut tables: Vec<Table> = Vec::new();
    for row in rows {
        let starts_new = tables
            .last()
            .is_none_or(|table| !same_object(&table.schema, &table.name, &row.schema_name, &row.object_name));
        if starts_new {
            if let Some(table) = tables.last_mut() {
                dedupe_property_names(table);
            }
            let id = TableId(tables.len());
            tables.push(new_table(id, &row, normalizer));
        }
        if let Some(table) = tables.last_mut() {
            let column = build_column(&row, table, normalizer);
            table.columns.push(column);
        }
    }
    if let Some(table) = tables.last_mut() {
        dedupe_property_names(table);
    }

    debug!(tables = tables.len(), "built tables");
    Ok(tables)
}

fn same_object(schema: &str, name: &str, row_schema: &str, row_name: &str) -> bool {
    schema == row_schema.trim() && name == row_name.trim()
}

fn new_table(id: TableId, row: &TableRow, normalizer: &Normalizer) -> Table {
    let name = row.object_name.trim().to_string();
    let enum_hint = match (non_blank(&row.enum_name_column), non_blank(&row.enum_value_column)) {
        (Some(name_column), Some(value_column)) => Some(EnumHint {
            name_column,
            value_column,
        }),
        _ => None,
    };

    Table {
        id,
        schema: row.schema_name.trim().to_string(),
        kind: if row.is_view {
            TableKind::View
        } else {
            TableKind::Table
        },
        class_name: normalizer.class_name(&name),
        class_collection_name: normalizer.class_name_plural(&name),
        name,
        columns: Vec::new(),
        enum_hint,
        enum_members: Vec::new(),
        is_omitted: !row.is_included,
        is_mapping: false,
        rejections: Vec::new(),
        references: Vec::new(),
        enum_references: Vec::new(),
        reverse_navigations: Vec::new(),
        join_mappings: Vec::new(),
    }
}

fn build_column(row: &TableRow, table: &Table, normalizer: &Normalizer) -> Column {
    let name = row.column_name.trim().to_string();
    let type_name = row.type_name.trim();
    let code_type = CodeType::from_sql_type(type_name);
    let is_row_version =
        !row.is_nullable && matches!(normalize_type_name(type_name).as_str(), "timestamp" | "rowversion");
    let max_length = if is_row_version {
        Some(ROW_VERSION_LENGTH)
    } else if code_type == CodeType::String {
        row.max_length
    } else {
        None
    };

    let default = non_blank(&row.default);
    let default_literal = default
        .as_deref()
        .and_then(|raw| to_literal(raw, code_type));
    let names = normalizer.property_names(&name, &table.class_name);
    let matches_hint = |column: Option<&String>| {
        column.is_some_and(|column| column.eq_ignore_ascii_case(&name))
    };

    Column {
        table: table.id,
        sql_type: strip_type_size(type_name).to_string(),
        code_type,
        ordinal: row.ordinal,
        is_nullable: row.is_nullable,
        max_length,
        precision: row.precision,
        scale: row.scale,
        is_identity: row.is_identity,
        is_store_generated: row.is_store_generated,
        is_row_version,
        is_primary_key: row.is_primary_key,
        is_foreign_key: false,
        is_foreign_key_enum: false,
        is_enum_name: matches_hint(table.enum_hint.as_ref().map(|hint| &hint.name_column)),
        is_enum_value: matches_hint(table.enum_hint.as_ref().map(|hint| &hint.value_column)),
        default,
        default_literal,
        property_name: names.identifier,
        property_name_human_case: names.human,
        name,
    }
}

/// Make property names unique within a table, suffixing later duplicates.
fn dedupe_property_names(table: &mut Table) {
    let mut identifiers = UniqueNames::seeded([table.class_name.as_str()]);
    let mut human = UniqueNames::seeded([table.class_name.as_str()]);
    for column in &mut table.columns {
        column.property_name = identifiers.claim(&column.property_name);
        column.property_name_human_case = human.claim(&column.property_name_human_case);
    }
}

/// One [`StoredProcedure`] per run of consecutive rows sharing schema and
/// object name; rows without a parameter name contribute no parameter.
pub fn build_procedures(
    rows: Vec<ProcedureRow>,
    normalizer: &Normalizer,
    options: &GeneratorOptions,
) -> Result<Vec<StoredProcedure>> {
    let mut procedures: Vec<StoredProcedure> = Vec::new();
    for row in rows {
        let starts_new = procedures.last().is_none_or(|procedure| {
            !same_object(&procedure.schema, &procedure.name, &row.schema_name, &row.object_name)
        });
        if starts_new {
            procedures.push(new_procedure(&row, normalizer, options)?);
        }
        if let Some(procedure) = procedures.last_mut() {
            if let Some(parameter) = build_parameter(&row, procedure.parameters.len())? {
                procedure.parameters.push(parameter);
            }
        }
    }

    debug!(procedures = procedures.len(), "built stored procedures");
    Ok(procedures)
}

fn new_procedure(
    row: &ProcedureRow,
    normalizer: &Normalizer,
    options: &GeneratorOptions,
) -> Result<StoredProcedure> {
    let name = row.object_name.trim().to_string();
    Ok(StoredProcedure {
        schema: row.schema_name.trim().to_string(),
        method_name: non_blank(&row.method_name).unwrap_or_else(|| normalizer.class_name(&name)),
        container_name: non_blank(&row.container_name)
            .unwrap_or_else(|| options.default_container.clone()),
        execution_mode: ExecutionMode::from_hint(row.execution_mode.as_deref())?,
        is_omitted: !row.is_included,
        parameters: Vec::new(),
        name,
    })
}

fn build_parameter(row: &ProcedureRow, position: usize) -> Result<Option<Parameter>> {
    let Some(name) = non_blank(&row.parameter_name) else {
        return Ok(None);
    };
    let type_name = non_blank(&row.type_name).ok_or_else(|| {
        Error::InvalidInput(format!(
            "parameter {name} of {}.{} has no type name",
            row.schema_name.trim(),
            row.object_name.trim()
        ))
    })?;

    let code_type = CodeType::from_sql_type(&type_name);
    let default = non_blank(&row.default);
    Ok(Some(Parameter {
        code_name: to_parameter_name(&name),
        ordinal: row.ordinal.unwrap_or(position as i32 + 1),
        sql_type: strip_type_size(&type_name).to_string(),
        code_type,
        db_type: SqlDbType::from_sql_type(&type_name)?,
        is_output: row.is_output,
        max_length: row.max_length,
        precision: row.precision,
        scale: row.scale,
        default_literal: default
            .as_deref()
            .and_then(|raw| to_literal(raw, code_type)),
        default,
        name,
    }))
}

/// Map raw edge rows into unresolved [`ForeignKey`] records.
pub fn map_foreign_keys(rows: Vec<ForeignKeyRow>) -> Vec<ForeignKey> {
    rows.into_iter()
        .map(|row| ForeignKey {
            constraint_name: row.constraint_name.trim().to_string(),
            fk_schema: row.fk_schema.trim().to_string(),
            fk_table: row.fk_table.trim().to_string(),
            fk_column: row.fk_column.trim().to_string(),
            pk_schema: row.pk_schema.trim().to_string(),
            pk_table: row.pk_table.trim().to_string(),
            pk_column: row.pk_column.trim().to_string(),
            resolved: None,
        })
        .collect()
}

/// Populate enum members for every included table carrying an enum hint.
///
/// Member names are normalized to class names; values are kept raw.
pub fn fill_enums(
    tables: &mut [Table],
    source: &dyn SchemaSource,
    normalizer: &Normalizer,
) -> Result<usize> {
    let mut filled = 0;
    for table in tables.iter_mut().filter(|table| !table.is_omitted) {
        let Some(hint) = table.enum_hint.clone() else {
            continue;
        };
        let query = EnumQuery {
            schema: table.schema.clone(),
            table: table.name.clone(),
            name_column: hint.name_column,
            value_column: hint.value_column,
        };
        let rows = source.enum_members(&query)?;
        table.enum_members = rows
            .into_iter()
            .map(|row| EnumMember {
                name: normalizer.class_name(row.name.trim()),
                value: row.value,
            })
            .collect();
        debug!(
            table = %table.qualified_name(),
            members = table.enum_members.len(),
            "filled enum members"
        );
        filled += 1;
    }
    Ok(filled)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::StoreGeneration;

    fn row(object: &str, column: &str, type_name: &str) -> TableRow {
        TableRow {
            schema_name: "dbo".to_string(),
            object_name: object.to_string(),
            is_view: false,
            enum_name_column: None,
            enum_value_column: None,
            is_included: true,
            column_name: column.to_string(),
            type_name: type_name.to_string(),
            ordinal: 1,
            is_nullable: false,
            is_identity: false,
            is_store_generated: false,
            is_primary_key: false,
            max_length: None,
            precision: None,
            scale: None,
            default: None,
        }
    }

    fn procedure_row(object: &str, parameter: Option<&str>) -> ProcedureRow {
        ProcedureRow {
            schema_name: "dbo".to_string(),
            object_name: object.to_string(),
            method_name: None,
            container_name: None,
            execution_mode: None,
            is_included: true,
            parameter_name: parameter.map(str::to_string),
            type_name: parameter.map(|_| "int".to_string()),
            ordinal: None,
            is_output: false,
            max_length: None,
            precision: None,
            scale: None,
            default: None,
        }
    }

    #[test]
    fn empty_table_rows_are_invalid() {
        let result = build_tables(Vec::new(), &Normalizer::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn groups_consecutive_rows_by_object() {
        let rows = vec![
            row("Invoices", "Id", "int"),
            row("Invoices", "Total", "money"),
            row("Customers", "Id", "int"),
        ];
        let tables = build_tables(rows, &Normalizer::default()).expect("tables");
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].class_name, "Invoice");
        assert_eq!(tables[0].class_collection_name, "Invoices");
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(tables[1].id, TableId(1));
        assert_eq!(tables[1].columns[0].table, TableId(1));
    }

    #[test]
    fn same_name_in_another_schema_starts_a_new_table() {
        let mut sales = row("Orders", "Id", "int");
        sales.schema_name = "sales".to_string();
        let tables =
            build_tables(vec![row("Orders", "Id", "int"), sales], &Normalizer::default())
                .expect("tables");
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn colliding_property_names_get_numeric_suffixes() {
        let rows = vec![row("Person", "Name", "nvarchar"), row("Person", "name", "nvarchar")];
        let tables = build_tables(rows, &Normalizer::default()).expect("tables");
        let names: Vec<_> = tables[0]
            .columns
            .iter()
            .map(|c| c.property_name_human_case.as_str())
            .collect();
        assert_eq!(names, vec!["Name", "Name1"]);
    }

    #[test]
    fn column_details_follow_type_mapping() {
        let mut version = row("Invoice", "Version", "timestamp");
        version.max_length = Some(16);
        let mut code = row("Invoice", "Code", "nvarchar(20)");
        code.max_length = Some(20);
        code.default = Some("('N/A')".to_string());
        let mut amount = row("Invoice", "Amount", "decimal(18,2)");
        amount.max_length = Some(9);
        amount.default = Some("((abc))".to_string());

        let tables =
            build_tables(vec![version, code, amount], &Normalizer::default()).expect("tables");
        let columns = &tables[0].columns;
        assert!(columns[0].is_row_version);
        assert_eq!(columns[0].max_length, Some(8));
        assert_eq!(columns[1].sql_type, "nvarchar");
        assert_eq!(columns[1].max_length, Some(20));
        assert_eq!(columns[1].default_literal.as_deref(), Some("\"N/A\""));
        assert_eq!(columns[2].max_length, None);
        assert_eq!(columns[2].default.as_deref(), Some("((abc))"));
        assert_eq!(columns[2].default_literal, None);
    }

    #[test]
    fn store_generation_follows_column_flags() {
        let mut id = row("Invoice", "Id", "int");
        id.is_identity = true;
        let version = row("Invoice", "Version", "rowversion");
        let mut total = row("Invoice", "Total", "money");
        total.is_store_generated = true;
        let note = row("Invoice", "Note", "nvarchar");

        let tables =
            build_tables(vec![id, version, total, note], &Normalizer::default()).expect("tables");
        let generation: Vec<_> = tables[0]
            .columns
            .iter()
            .map(|c| c.store_generation())
            .collect();
        assert_eq!(
            generation,
            vec![
                StoreGeneration::Identity,
                StoreGeneration::Computed,
                StoreGeneration::Computed,
                StoreGeneration::None,
            ]
        );
    }

    #[test]
    fn only_nullable_value_types_need_a_wrapper() {
        let mut due = row("Invoice", "DueDate", "date");
        due.is_nullable = true;
        let mut memo = row("Invoice", "Memo", "nvarchar(200)");
        memo.is_nullable = true;
        let count = row("Invoice", "LineCount", "int");
        let tag = row("Tag", "Id", "int");

        let tables =
            build_tables(vec![due, memo, count, tag], &Normalizer::default()).expect("tables");
        let wrappers: Vec<_> = tables[0]
            .columns
            .iter()
            .map(|c| c.needs_nullable_wrapper())
            .collect();
        assert_eq!(wrappers, vec![true, false, false]);
        assert!(tables[0].has_nullable_columns());
        assert!(!tables[1].has_nullable_columns());
    }

    #[test]
    fn enum_hint_flags_matching_columns() {
        let mut name = row("Colour", "Name", "nvarchar");
        name.enum_name_column = Some("name".to_string());
        name.enum_value_column = Some("Id".to_string());
        let mut id = name.clone();
        id.column_name = "Id".to_string();
        id.type_name = "int".to_string();

        let tables = build_tables(vec![name, id], &Normalizer::default()).expect("tables");
        assert!(tables[0].is_enum());
        assert!(tables[0].columns[0].is_enum_name);
        assert!(tables[0].columns[1].is_enum_value);
    }

    #[test]
    fn procedures_without_parameters_are_supported() {
        let rows = vec![
            procedure_row("usp_Purge", None),
            procedure_row("usp_Find", Some("@Id")),
            procedure_row("usp_Find", Some("@Limit")),
        ];
        let procedures =
            build_procedures(rows, &Normalizer::default(), &GeneratorOptions::default())
                .expect("procedures");
        assert_eq!(procedures.len(), 2);
        assert!(procedures[0].parameters.is_empty());
        assert_eq!(procedures[0].container_name, "StoredProcedures");
        assert_eq!(procedures[0].execution_mode, ExecutionMode::VoidResult);
        assert_eq!(procedures[1].parameters[0].code_name, "id");
        assert_eq!(procedures[1].parameters[1].ordinal, 2);
    }

    #[test]
    fn output_parameters_are_detected() {
        let mut total = procedure_row("usp_Total", Some("@Total"));
        total.is_output = true;
        let rows = vec![
            procedure_row("usp_Total", Some("@CustomerId")),
            total,
            procedure_row("usp_Find", Some("@Id")),
        ];
        let procedures =
            build_procedures(rows, &Normalizer::default(), &GeneratorOptions::default())
                .expect("procedures");
        assert!(procedures[0].has_output_parameters());
        assert!(procedures[0].parameters[1].is_output);
        assert!(!procedures[1].has_output_parameters());
    }

    #[test]
    fn unknown_parameter_type_aborts_the_build() {
        let mut bad = procedure_row("usp_Load", Some("@Rows"));
        bad.type_name = Some("dbo.RowList".to_string());
        let result =
            build_procedures(vec![bad], &Normalizer::default(), &GeneratorOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedType(name)) if name == "dbo.RowList"));
    }

    #[test]
    fn unknown_execution_mode_is_invalid_input() {
        let mut bad = procedure_row("usp_Load", None);
        bad.execution_mode = Some("Rows".to_string());
        let result =
            build_procedures(vec![bad], &Normalizer::default(), &GeneratorOptions::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
