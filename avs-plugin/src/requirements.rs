//! Plugin options and normalized requirements

use avs_core::ScriptError;
use serde::{Deserialize, Serialize};

/// A single path or a list of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    One(String),
    Many(Vec<String>),
}

impl PathList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            PathList::One(path) => vec![path],
            PathList::Many(paths) => paths,
        }
    }
}

impl From<&str> for PathList {
    fn from(path: &str) -> Self {
        PathList::One(path.to_string())
    }
}

impl From<String> for PathList {
    fn from(path: String) -> Self {
        PathList::One(path)
    }
}

impl From<Vec<String>> for PathList {
    fn from(paths: Vec<String>) -> Self {
        PathList::Many(paths)
    }
}

impl From<Vec<&str>> for PathList {
    fn from(paths: Vec<&str>) -> Self {
        PathList::Many(paths.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathList {
    fn from(paths: [&str; N]) -> Self {
        PathList::Many(paths.iter().map(|p| p.to_string()).collect())
    }
}

/// Options accepted at registration time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<PathList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoload: Option<PathList>,
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load(mut self, load: impl Into<PathList>) -> Self {
        self.load = Some(load.into());
        self
    }

    pub fn with_autoload(mut self, autoload: impl Into<PathList>) -> Self {
        self.autoload = Some(autoload.into());
        self
    }

    /// Parse options from JSON, e.g. `{"load": "a.avsi", "autoload": ["dir"]}`
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_requirements(self) -> Requirements {
        Requirements {
            load: self.load.map(PathList::into_vec).unwrap_or_default(),
            autoload: self.autoload.map(PathList::into_vec).unwrap_or_default(),
        }
    }
}

/// Declared dependencies of a plugin, always in list form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub load: Vec<String>,
    pub autoload: Vec<String>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.autoload.is_empty()
    }
}
