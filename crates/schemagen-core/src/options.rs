use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Generation settings shared by the model builder and the inference engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Only objects in this schema are emitted when set.
    pub schema: Option<String>,
    /// Regular expressions matched against table names (plain or `schema.name`).
    pub exclude_tables: Vec<String>,
    pub include_views: bool,
    /// Require views to carry the `vw_` prefix.
    pub require_view_prefix: bool,
    /// Keep rejected tables in the emission view.
    pub keep_rejected: bool,
    /// Container for stored procedures that carry no container hint.
    pub default_container: String,
    /// Collection type name used by emission for collection navigations.
    pub collection_type: String,
    pub elements: Elements,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            schema: None,
            exclude_tables: Vec::new(),
            include_views: true,
            require_view_prefix: false,
            keep_rejected: false,
            default_container: "StoredProcedures".to_string(),
            collection_type: "List".to_string(),
            elements: Elements::default(),
        }
    }
}

/// Independent toggles selecting which artifacts emission produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Elements {
    pub poco: bool,
    pub context: bool,
    pub unit_of_work: bool,
    pub poco_configuration: bool,
}

impl Default for Elements {
    fn default() -> Self {
        Self {
            poco: true,
            context: true,
            unit_of_work: true,
            poco_configuration: true,
        }
    }
}
