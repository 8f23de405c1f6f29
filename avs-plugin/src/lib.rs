//! avs-script plugin system
//!
//! Provides:
//! - Name normalization (canonical keys and aliases)
//! - The plugin registry and plugin traits
//! - Dependency resolution (`load` / `autoload`)
//! - `Script`, which invokes plugins and composes the final text

pub mod naming;
mod registry;
mod requirements;
mod resolver;
mod script;
mod traits;

pub use registry::{PluginRecord, PluginRegistry};
pub use requirements::{PathList, PluginOptions, Requirements};
pub use resolver::{Resolver, ResolverConfig};
pub use script::{Invocation, Script};
pub use traits::{Generator, GeneratorResult, PluginMeta, ScriptPlugin};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        GeneratorResult, PluginMeta, PluginOptions, PluginRegistry, Script, ScriptPlugin,
    };
    pub use avs_core::prelude::*;
}
