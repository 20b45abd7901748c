//! Error types for demo-core

use std::path::PathBuf;

/// Result type for demo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the edges of the synchronization core
///
/// Selection and channel synchronization never fail; these errors only come
/// from building collaborators and from preference file IO.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two original files were renamed to the same display name
    #[error("Duplicate display name {display} in transform")]
    DuplicateDisplayName { display: String },

    /// Preference file could not be parsed
    #[error("Invalid preference file at {path}: {message}")]
    InvalidPreferences { path: PathBuf, message: String },

    /// No platform config directory to store preferences in
    #[error("No config directory available for preferences")]
    NoConfigDir,

    /// Metadata error from demo-meta
    #[error(transparent)]
    Meta(#[from] demo_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
