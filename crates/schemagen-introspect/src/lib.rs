//! Schema sources and the model builder.
//!
//! A [`SchemaSource`] supplies grouped catalog rows; the builder turns them
//! into the un-inferred [`SchemaModel`].

pub mod builder;
pub mod rows;
pub mod snapshot;
pub mod source;

pub use builder::{build_model, build_procedures, build_tables, fill_enums, map_foreign_keys, read_model};
pub use rows::{EnumMemberRow, ForeignKeyRow, ProcedureRow, TableRow};
pub use snapshot::{Snapshot, SnapshotSource};
pub use source::{EnumQuery, SchemaSource};

pub use schemagen_core::SchemaModel;
