//! Typed error variants for the note-tabs-config crate.
//!
//! Used internally by the settings store and exposed for consumers that want
//! to match on specific failure modes instead of opaque `anyhow` strings;
//! `anyhow` coerces these automatically via its blanket `From` impl.

use thiserror::Error;

/// Errors that can occur when loading or saving settings state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the settings file.
    #[error("I/O error accessing settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file contained YAML that could not be parsed.
    #[error("YAML parse error in settings: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A stored value does not match the registered setting type.
    ///
    /// The inner string names the offending key and the expected type.
    #[error("settings validation error: {0}")]
    Validation(String),
}
