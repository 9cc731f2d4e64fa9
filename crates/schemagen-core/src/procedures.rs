use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{CodeType, SqlDbType};

/// Shape of the result a stored procedure returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    VoidResult,
    ScalarResult,
    TableResult,
}

impl ExecutionMode {
    /// Parse an optional execution-mode hint; a missing or blank hint means
    /// [`ExecutionMode::VoidResult`].
    pub fn from_hint(hint: Option<&str>) -> Result<Self> {
        match hint.map(str::trim) {
            None | Some("") => Ok(ExecutionMode::VoidResult),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "voidresult" | "void" => Ok(ExecutionMode::VoidResult),
            "scalarresult" | "scalar" => Ok(ExecutionMode::ScalarResult),
            "tableresult" | "table" => Ok(ExecutionMode::TableResult),
            _ => Err(Error::InvalidInput(format!(
                "unknown execution mode hint '{}'",
                value.trim()
            ))),
        }
    }
}

/// A stored procedure with its ordered parameters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoredProcedure {
    pub name: String,
    pub schema: String,
    /// Name of the generated method.
    pub method_name: String,
    /// Container the generated method is grouped under.
    pub container_name: String,
    pub execution_mode: ExecutionMode,
    /// Excluded by an inclusion hint.
    pub is_omitted: bool,
    pub parameters: Vec<Parameter>,
}

impl StoredProcedure {
    pub fn qualified_name(&self) -> String {
        format!("[{}].[{}]", self.schema, self.name)
    }

    pub fn has_output_parameters(&self) -> bool {
        self.parameters.iter().any(|p| p.is_output)
    }
}

/// Stored procedure parameter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    pub name: String,
    pub code_name: String,
    pub ordinal: i32,
    pub sql_type: String,
    pub code_type: CodeType,
    pub db_type: SqlDbType,
    pub is_output: bool,
    pub max_length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    /// Raw default expression as declared.
    pub default: Option<String>,
    /// Default translated to a literal expression, when one is valid.
    pub default_literal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_hint_is_void() {
        assert_eq!(ExecutionMode::from_hint(None).ok(), Some(ExecutionMode::VoidResult));
        assert_eq!(ExecutionMode::from_hint(Some("  ")).ok(), Some(ExecutionMode::VoidResult));
    }

    #[test]
    fn parses_hints_case_insensitively() {
        assert_eq!("TableResult".parse::<ExecutionMode>().ok(), Some(ExecutionMode::TableResult));
        assert_eq!("scalar_result".parse::<ExecutionMode>().ok(), Some(ExecutionMode::ScalarResult));
        assert_eq!("VOIDRESULT".parse::<ExecutionMode>().ok(), Some(ExecutionMode::VoidResult));
    }

    #[test]
    fn unknown_hint_is_invalid_input() {
        assert!(matches!(
            ExecutionMode::from_hint(Some("rows")),
            Err(Error::InvalidInput(_))
        ));
    }
}
