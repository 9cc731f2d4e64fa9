//! Core contracts and transforms for schemagen.
//!
//! This crate defines the semantic schema model handed to code emission, the
//! identifier normalizer, the literal translator, and the SQL type mapping
//! shared by the builder and inference crates.

pub mod constraints;
pub mod error;
pub mod inflector;
pub mod literal;
pub mod naming;
pub mod options;
pub mod procedures;
pub mod rejection;
pub mod relationship;
pub mod schema;
pub mod types;

pub use constraints::{ForeignKey, ResolvedEndpoints};
pub use error::{Error, Result};
pub use inflector::{EnglishPluralizer, Pluralizer};
pub use literal::to_literal;
pub use naming::{Normalizer, PropertyNames, UniqueNames, MAX_NAME_SUFFIX};
pub use options::{Elements, GeneratorOptions};
pub use procedures::{ExecutionMode, Parameter, StoredProcedure};
pub use rejection::{Rejection, RejectionCode};
pub use relationship::{
    EnumReference, JoinMapping, ReferenceNavigation, Relationship, ReverseNavigation,
};
pub use schema::{
    Column, EmissionView, EnumHint, EnumMember, SchemaModel, StoreGeneration, Table, TableId,
    TableKind,
};
pub use types::{CodeType, SqlDbType};
