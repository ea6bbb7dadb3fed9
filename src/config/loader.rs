//! Blueprint loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::build::build_app;
use crate::config::schema::Blueprint;
use crate::config::validation::{validate_blueprint, ValidationError};
use crate::model::{App, GeneratorError};

/// Error type for blueprint loading.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Build failed: {0}")]
    Build(#[from] GeneratorError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a blueprint from TOML text.
pub fn parse_blueprint(content: &str) -> Result<Blueprint, BlueprintError> {
    let blueprint: Blueprint = toml::from_str(content)?;
    validate_blueprint(&blueprint).map_err(BlueprintError::Validation)?;
    Ok(blueprint)
}

/// Load and validate a blueprint from a TOML file.
pub fn load_blueprint(path: &Path) -> Result<Blueprint, BlueprintError> {
    let content = fs::read_to_string(path)?;
    parse_blueprint(&content)
}

/// Load a blueprint file and build the App it describes.
pub fn load_app(path: &Path) -> Result<App, BlueprintError> {
    let blueprint = load_blueprint(path)?;
    Ok(build_app(&blueprint)?)
}
