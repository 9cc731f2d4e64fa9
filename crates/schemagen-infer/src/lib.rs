//! Relationship and mapping-table inference for schemagen.
//!
//! This crate turns the assembled model from `schemagen-introspect` into an
//! emission-ready model: rejected objects are flagged, foreign keys resolved,
//! missing keys synthesized, join tables collapsed into many-to-many
//! navigations, and every edge classified.

pub mod engine;
pub mod generator;
pub mod keys;
pub mod mapping;
pub mod model;
pub mod names;
pub mod navigation;
pub mod resolve;
pub mod rules;

pub use engine::InferenceEngine;
pub use generator::ModelGenerator;
pub use model::{GenerationResult, InferenceReport, RejectedObject};
pub use names::NameRegistry;
pub use rules::{
    MissingPrimaryKeyRule, NameExclusionRule, RejectionRule, SchemaFilterRule, ViewExclusionRule,
    ViewPrefixRule,
};
