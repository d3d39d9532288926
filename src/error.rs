//! @ai:module:intent Define error types for the specification extractor
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all extraction operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {name} pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Section {0} is not in the registry")]
    SectionNotFound(String),

    /// Raised when an algorithm reaches a state its own logic rules out.
    #[error("Internal consistency violation: {0}")]
    Invariant(String),
}

impl Error {
    /// @ai:intent Tell lookup failures apart from every other failure kind
    /// @ai:effects pure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SectionNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
