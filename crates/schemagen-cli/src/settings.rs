use std::path::Path;

use schemagen_core::GeneratorOptions;

use crate::error::CliResult;

/// Load generation options from a TOML file, or defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> CliResult<GeneratorOptions> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            parse_options(&content)
        }
        None => Ok(GeneratorOptions::default()),
    }
}

pub fn parse_options(content: &str) -> CliResult<GeneratorOptions> {
    Ok(toml::from_str(content)?)
}
