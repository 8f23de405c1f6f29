//! Structured errors for plugin registration and script assembly
//!
//! Every failure is a synchronous result of the call that triggered it.
//! Variants carry enough context to report the problem, and each one maps
//! to a stable machine-readable code.

use std::io;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NAME_COLLISION: &str = "NAME_COLLISION";
    pub const RESERVED_NAME: &str = "RESERVED_NAME";
    pub const INVALID_NAME: &str = "INVALID_NAME";
    pub const REQUIREMENT_RESOLUTION: &str = "REQUIREMENT_RESOLUTION";
    pub const UNKNOWN_PLUGIN: &str = "UNKNOWN_PLUGIN";
    pub const CONFIG: &str = "CONFIG";
}

/// Error type for registry and script operations
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Plugin name '{name}' collides with existing plugin '{key}'")]
    NameCollision { name: String, key: String },

    #[error("Plugin name '{name}' is reserved by Script")]
    ReservedName { name: String },

    #[error("Invalid plugin name: '{name}'")]
    InvalidName { name: String },

    #[error("Cannot resolve requirement '{path}': {source}")]
    RequirementResolution {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Unknown plugin: {name}")]
    UnknownPlugin { name: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScriptError {
    // ========== Common Error Constructors ==========

    pub fn name_collision(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NameCollision { name: name.into(), key: key.into() }
    }

    pub fn reserved_name(name: impl Into<String>) -> Self {
        Self::ReservedName { name: name.into() }
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn requirement(path: impl Into<String>, source: io::Error) -> Self {
        Self::RequirementResolution { path: path.into(), source }
    }

    pub fn unknown_plugin(name: impl Into<String>) -> Self {
        Self::UnknownPlugin { name: name.into() }
    }

    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameCollision { .. } => codes::NAME_COLLISION,
            Self::ReservedName { .. } => codes::RESERVED_NAME,
            Self::InvalidName { .. } => codes::INVALID_NAME,
            Self::RequirementResolution { .. } => codes::REQUIREMENT_RESOLUTION,
            Self::UnknownPlugin { .. } => codes::UNKNOWN_PLUGIN,
            Self::Config(_) => codes::CONFIG,
        }
    }

    /// Suggestion for fixing the error, if there is an obvious one
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NameCollision { key, .. } => Some(format!(
                "Plugin names are case-insensitive; pick a name that does not lowercase to '{}'",
                key
            )),
            Self::ReservedName { .. } => Some(
                "code, references, load, autoload, allReferences and fullCode belong to Script"
                    .to_string(),
            ),
            Self::RequirementResolution { .. } => {
                Some("Check that the autoload directory exists and is readable".to_string())
            }
            Self::UnknownPlugin { .. } => {
                Some("Register the plugin first, or check Script::all_references()".to_string())
            }
            Self::InvalidName { .. } | Self::Config(_) => None,
        }
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

