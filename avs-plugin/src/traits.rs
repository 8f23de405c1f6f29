//! Plugin traits

use crate::requirements::Requirements;
use crate::Script;
use avs_core::{ScriptError, Value};
use serde::Serialize;
use std::sync::Arc;

/// What a generator returns: script text, or nothing for side-effect plugins
pub type GeneratorResult = Result<Option<String>, ScriptError>;

/// Shared code generator of a registered plugin
pub type Generator = Arc<dyn Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync>;

/// Metadata for a struct-based plugin
#[derive(Debug, Clone, Serialize)]
pub struct PluginMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Files loaded whenever the plugin is invoked
    pub load: &'static [&'static str],
    /// Directories scanned whenever the plugin is invoked
    pub autoload: &'static [&'static str],
}

impl PluginMeta {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description, load: &[], autoload: &[] }
    }

    pub fn requirements(&self) -> Requirements {
        Requirements {
            load: self.load.iter().map(|p| p.to_string()).collect(),
            autoload: self.autoload.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Script-generating plugin
///
/// The closure form registered through `PluginRegistry::register` covers
/// most uses; implement this trait when a plugin carries its own state or
/// metadata.
pub trait ScriptPlugin: Send + Sync {
    fn meta(&self) -> PluginMeta;
    fn generate(&self, script: &mut Script, args: &[Value]) -> GeneratorResult;
}
