//! Error types for demo-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid retention mode: {mode}")]
    InvalidRetentionMode { mode: String },

    #[error("Collection has no variants")]
    NoVariants,

    #[error("Variant name must not be empty")]
    EmptyVariantName,

    #[error("Duplicate file {file} in variant {variant}")]
    DuplicateFile { variant: String, file: String },

    #[error("{first} and {second} both encode to slug segment {slug}")]
    DuplicateSlug {
        /// Variant holding the colliding files, empty for colliding variant names
        variant: String,
        slug: String,
        first: String,
        second: String,
    },

    #[error("Default variant {variant} is not part of the collection")]
    UnknownDefaultVariant { variant: String },

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
