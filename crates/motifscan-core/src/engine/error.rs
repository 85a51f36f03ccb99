use thiserror::Error;

use super::config::ConfigError;
use super::representation::GeometryError;
use super::superposition::SuperimpositionError;
use crate::core::io::traits::SourceError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Superimposition failed: {0}")]
    Superimposition(#[from] SuperimpositionError),

    #[error("Structure source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
