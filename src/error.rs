//! Error types
//!
//! Lookup and loading failures. Generation entry points turn these into
//! `None` plus a log line; data and config loading return them directly.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading data or generating an item
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("unknown item category '{0}'")]
    UnknownCategory(String),

    #[error("unknown sub-type '{sub_type}' for category '{category}'")]
    UnknownSubType { category: String, sub_type: String },

    #[error("unknown rarity '{0}' (expected COMMON, UNCOMMON, RARE, EPIC or LEGENDARY)")]
    UnknownRarity(String),

    #[error("no usable material for {category}/{sub_type}: default '{default}' is not in the material table")]
    MaterialUnavailable {
        category: String,
        sub_type: String,
        default: String,
    },

    #[error("no item categories are loaded")]
    NoCategories,

    #[error("category '{0}' defines no sub-types")]
    EmptyCategory(String),

    #[error("category '{0}' defines no name templates")]
    NoNameTemplates(String),

    #[error("failed to parse {file}: {source}")]
    DataParse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] ron::Error),
}

impl ForgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ForgeError::Io { path: path.into(), source }
    }
}

/// Shorthand result type used across the crate
pub type ForgeResult<T> = Result<T, ForgeError>;
