//! Dependency statements
//!
//! A statement is one line of generated dependency text. Two statements are
//! the same statement exactly when their rendered lines are equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One dependency declaration line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path")]
pub enum Statement {
    /// `Import("<path>")`: script source
    Import(String),
    /// `LoadPlugin("<path>")`: native plugin binary
    LoadPlugin(String),
}

impl Statement {
    pub fn import(path: impl Into<String>) -> Self {
        Statement::Import(path.into())
    }

    pub fn load_plugin(path: impl Into<String>) -> Self {
        Statement::LoadPlugin(path.into())
    }

    /// Path the statement refers to, as supplied
    pub fn path(&self) -> &str {
        match self {
            Statement::Import(p) | Statement::LoadPlugin(p) => p,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Import(p) => write!(f, "Import(\"{}\")", p),
            Statement::LoadPlugin(p) => write!(f, "LoadPlugin(\"{}\")", p),
        }
    }
}
