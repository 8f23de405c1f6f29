//! avs - AviSynth script assembly
//!
//! Register plugins once, then build scripts from them:
//!
//! ```
//! use avs::{Avisynth, PluginOptions};
//!
//! let avs = Avisynth::new(Default::default());
//! avs.add_plugin_with(
//!     "DeDup",
//!     PluginOptions::new().with_load("C:/plugins/DeDup.dll"),
//!     |_, _| Ok(Some("DeDup()".to_string())),
//! )
//! .unwrap();
//!
//! let mut script = avs.script();
//! script.call("deDup").unwrap();
//! assert_eq!(script.full_code(), "LoadPlugin(\"C:/plugins/DeDup.dll\")\nDeDup()\n");
//! ```

use std::sync::{Arc, LazyLock};
use tracing::debug;

pub use avs_core::{codes, ScriptError, Statement, Value};
pub use avs_plugin::{
    naming, GeneratorResult, Invocation, PathList, PluginMeta, PluginOptions, PluginRecord,
    PluginRegistry, Requirements, Resolver, ResolverConfig, Script, ScriptPlugin,
};

static GLOBAL_REGISTRY: LazyLock<Arc<PluginRegistry>> =
    LazyLock::new(|| Arc::new(PluginRegistry::new()));

/// The process-wide registry
pub fn global_registry() -> Arc<PluginRegistry> {
    GLOBAL_REGISTRY.clone()
}

/// Register a plugin in the process-wide registry
pub fn add_plugin<F>(name: &str, generator: F) -> Result<(), ScriptError>
where
    F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
{
    GLOBAL_REGISTRY.register_fn(name, generator)
}

/// Register a plugin with requirements in the process-wide registry
pub fn add_plugin_with<F>(
    name: &str,
    options: PluginOptions,
    generator: F,
) -> Result<(), ScriptError>
where
    F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
{
    GLOBAL_REGISTRY.register(name, options, generator)
}

/// A new script over the process-wide registry
pub fn new_script() -> Script {
    Script::new(global_registry())
}

/// Main engine: a registry plus the resolver settings handed to its scripts
pub struct Avisynth {
    registry: Arc<PluginRegistry>,
    resolver_config: ResolverConfig,
}

impl Avisynth {
    pub fn new(registry: PluginRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    pub fn from_shared(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            resolver_config: ResolverConfig::default(),
        }
    }

    /// Engine over the process-wide registry
    pub fn global() -> Self {
        Self::from_shared(global_registry())
    }

    /// Engine over the process-wide registry, with extensions taken from the
    /// environment
    pub fn from_env() -> Result<Self, ScriptError> {
        let config = ResolverConfig::from_env()?;
        debug!(
            scripts = ?config.script_extensions(),
            plugins = ?config.plugin_extensions(),
            "resolver config from environment"
        );
        Ok(Self::global().with_resolver_config(config))
    }

    /// Scripts from this engine classify files with `config`, which is
    /// validated when built.
    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    pub fn script(&self) -> Script {
        Script::with_resolver(self.registry.clone(), Resolver::new(self.resolver_config.clone()))
    }

    pub fn add_plugin<F>(&self, name: &str, generator: F) -> Result<(), ScriptError>
    where
        F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
    {
        self.registry.register_fn(name, generator)
    }

    pub fn add_plugin_with<F>(
        &self,
        name: &str,
        options: PluginOptions,
        generator: F,
    ) -> Result<(), ScriptError>
    where
        F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
    {
        self.registry.register(name, options, generator)
    }

    pub fn register_plugin<P: ScriptPlugin + 'static>(&self, plugin: P) -> Result<(), ScriptError> {
        self.registry.register_plugin(plugin)
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver_config
    }
}

impl Default for Avisynth {
    fn default() -> Self {
        Self::global()
    }
}

/// Build plugin call arguments: `args!["text", 24, true]`
#[macro_export]
macro_rules! args {
    [] => { ::std::vec::Vec::<$crate::Value>::new() };
    [ $($value:expr),* $(,)? ] => {
        vec![ $( $crate::Value::from($value) ),* ]
    };
}

/// Everything a plugin author needs
pub mod prelude {
    pub use crate::{add_plugin, add_plugin_with, new_script, Avisynth};
    pub use avs_plugin::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn noop(_: &mut Script, _: &[Value]) -> GeneratorResult {
        Ok(None)
    }

    mod global {
        use super::*;

        // The process-wide registry is shared by every test in this binary,
        // so each test uses names nobody else registers.

        #[test]
        fn test_add_plugin_visible_to_existing_scripts() {
            let script = new_script();
            add_plugin("GlobalVisible", noop).unwrap();
            assert!(script.has_member("globalVisible"));
            assert!(script.references().contains(&"globalvisible".to_string()));
            assert!(global_registry().contains("GLOBALVISIBLE"));
        }

        #[test]
        fn test_global_collision() {
            add_plugin("GlobalBar", noop).unwrap();
            let err = add_plugin("globalbar", noop).unwrap_err();
            assert_eq!(err.code(), codes::NAME_COLLISION);
        }

        #[test]
        fn test_global_reserved() {
            let err = add_plugin_with("fullCode", PluginOptions::new(), noop).unwrap_err();
            assert_eq!(err.code(), codes::RESERVED_NAME);
        }

        #[test]
        fn test_engine_shares_global_registry() {
            let engine = Avisynth::global();
            let ran = Arc::new(AtomicBool::new(false));
            let flag = ran.clone();
            engine
                .add_plugin("GlobalEngine", move |_, _| {
                    flag.store(true, Ordering::SeqCst);
                    Ok(None)
                })
                .unwrap();

            let mut script = new_script();
            script.call("globalEngine").unwrap();
            assert!(ran.load(Ordering::SeqCst));
        }
    }

    mod engine {
        use super::*;

        #[test]
        fn test_isolated_registries() {
            let a = Avisynth::new(PluginRegistry::new());
            let b = Avisynth::new(PluginRegistry::new());
            a.add_plugin("Same", noop).unwrap();
            b.add_plugin("Same", noop).unwrap();
            assert!(!Arc::ptr_eq(a.registry(), b.registry()));
            assert_eq!(a.registry().len(), 1);
            assert_eq!(b.registry().len(), 1);
        }

        #[test]
        fn test_script_uses_resolver_config() {
            let dir = tempfile::tempdir().unwrap();
            for name in ["a.avs", "b.avsi", "c.so"] {
                File::create(dir.path().join(name)).unwrap();
            }
            let dir_str = dir.path().to_string_lossy().into_owned();
            let config = ResolverConfig::from_json(
                r#"{"script_extensions": ["avs"], "plugin_extensions": ["so"]}"#,
            )
            .unwrap();

            let engine = Avisynth::new(PluginRegistry::new()).with_resolver_config(config);
            engine
                .add_plugin_with("Scan", PluginOptions::new().with_autoload(dir_str), noop)
                .unwrap();
            let mut script = engine.script();
            script.call("scan").unwrap();

            let expected = format!(
                "Import(\"{}\")\nLoadPlugin(\"{}\")\n",
                dir.path().join("a.avs").to_string_lossy(),
                dir.path().join("c.so").to_string_lossy(),
            );
            assert_eq!(script.full_code(), expected);
        }

        #[test]
        fn test_hand_built_resolver_config() {
            let err = ResolverConfig::new(["dll"], ["dll"]).unwrap_err();
            assert_eq!(err.code(), codes::CONFIG);

            let dir = tempfile::tempdir().unwrap();
            for name in ["colors_rgb.avsi", "DeDup.dll"] {
                File::create(dir.path().join(name)).unwrap();
            }
            let dir_str = dir.path().to_string_lossy().into_owned();
            let config = ResolverConfig::new([".avsi"], [".dll"]).unwrap();
            let engine = Avisynth::new(PluginRegistry::new()).with_resolver_config(config);
            engine
                .add_plugin_with("Scan", PluginOptions::new().with_autoload(dir_str), noop)
                .unwrap();
            let plugin = dir.path().join("DeDup.dll").to_string_lossy().into_owned();
            engine
                .add_plugin_with("Direct", PluginOptions::new().with_load(plugin.clone()), noop)
                .unwrap();

            let mut script = engine.script();
            script.call("scan").unwrap();
            script.call("direct").unwrap();
            let expected = format!(
                "Import(\"{}\")\nLoadPlugin(\"{}\")\n",
                dir.path().join("colors_rgb.avsi").to_string_lossy(),
                plugin,
            );
            assert_eq!(script.full_code(), expected);
        }

        #[test]
        fn test_args_macro() {
            let engine = Avisynth::new(PluginRegistry::new());
            engine
                .add_plugin("Crop", |_, args| {
                    let parts: Vec<String> = args.iter().map(Value::to_script).collect();
                    Ok(Some(format!("Crop({})", parts.join(", "))))
                })
                .unwrap();
            let mut script = engine.script();
            script.invoke("crop", &args![8, 0, -8, 0]).unwrap();
            assert_eq!(script.full_code(), "Crop(8, 0, -8, 0)\n");
            assert!(args![].is_empty());
        }

        struct Trim {
            first: i64,
        }

        impl ScriptPlugin for Trim {
            fn meta(&self) -> PluginMeta {
                PluginMeta::new("Trim", "Trim to a starting frame")
            }

            fn generate(&self, _script: &mut Script, args: &[Value]) -> GeneratorResult {
                let last = args.first().and_then(Value::as_int).unwrap_or(0);
                Ok(Some(format!("Trim({}, {})", self.first, last)))
            }
        }

        #[test]
        fn test_struct_plugin() {
            let engine = Avisynth::new(PluginRegistry::new());
            engine.register_plugin(Trim { first: 10 }).unwrap();
            let mut script = engine.script();
            script.invoke("Trim", &args![200]).unwrap();
            script.call("trim").unwrap();
            assert_eq!(script.full_code(), "Trim(10, 200)\nTrim(10, 0)\n");
        }
    }
}
