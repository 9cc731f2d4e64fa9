use std::path::Path;

use schemagen_core::{GeneratorOptions, Relationship};
use schemagen_infer::ModelGenerator;
use schemagen_introspect::SnapshotSource;

fn billing() -> SnapshotSource {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../schemagen-introspect/tests/fixtures/billing.json");
    SnapshotSource::from_path(&path).expect("load snapshot")
}

#[test]
fn generates_billing_model_from_snapshot() {
    let generator = ModelGenerator::new(GeneratorOptions::default()).expect("generator");
    let result = generator.generate(&billing()).expect("generate");
    let model = &result.model;

    let invoice = model.find_table("dbo", "Invoices").expect("invoices");
    assert_eq!(invoice.class_name, "Invoice");
    assert_eq!(invoice.references.len(), 1);
    assert_eq!(invoice.references[0].property_name, "Customer");
    assert_eq!(invoice.references[0].relationship, Relationship::ManyToOne);

    let customer = model.find_table("dbo", "Customers").expect("customers");
    assert_eq!(customer.reverse_navigations[0].property_name, "Invoices");
    assert_eq!(customer.collection_navigations().count(), 1);

    let report = &result.report;
    assert_eq!(report.tables, 5);
    assert_eq!(report.emitted_tables, 4);
    assert_eq!(report.rejected_tables, 0);
    assert_eq!(report.omitted_objects, 1);
    assert_eq!(report.resolved_foreign_keys, 2);
    assert_eq!(report.synthesized_keys, vec!["[dbo].[vw_OpenInvoices]"]);
}

#[test]
fn enum_targets_become_typed_references() {
    let generator = ModelGenerator::new(GeneratorOptions::default()).expect("generator");
    let result = generator.generate(&billing()).expect("generate");
    let model = &result.model;

    let invoice = model.find_table("dbo", "Invoices").expect("invoices");
    assert_eq!(invoice.enum_references.len(), 1);
    let reference = &invoice.enum_references[0];
    assert_eq!(reference.property_name, "InvoiceStatus");
    assert_eq!(reference.enum_name, "InvoiceStatuses");
    let status_column = invoice.column("StatusId").expect("status column");
    assert!(status_column.is_foreign_key);
    assert!(status_column.is_foreign_key_enum);

    let status = model.find_table("dbo", "InvoiceStatus").expect("status");
    assert!(status.reverse_navigations.is_empty());
    assert_eq!(status.enum_members.len(), 2);
    assert_eq!(result.report.enum_references, 1);
}

#[test]
fn views_can_be_excluded_by_configuration() {
    let options = GeneratorOptions {
        include_views: false,
        ..GeneratorOptions::default()
    };
    let result = ModelGenerator::new(options)
        .expect("generator")
        .generate(&billing())
        .expect("generate");

    let view = result
        .model
        .find_table("dbo", "vw_OpenInvoices")
        .expect("view");
    assert!(view.is_rejected());
    assert_eq!(result.report.rejected_tables, 1);

    let view_json = serde_json::to_value(result.model.emission_view(false)).expect("view json");
    let names: Vec<_> = view_json["tables"]
        .as_array()
        .expect("tables")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Customers", "InvoiceStatus", "Invoices"]);
    assert_eq!(view_json["procedures"]["Reports"][0]["name"], "usp_CustomerTotals");
}
