//! Plugin Registry

use crate::naming::{canonicalize, derive_aliases, is_reserved};
use crate::requirements::{PluginOptions, Requirements};
use crate::traits::{Generator, GeneratorResult, ScriptPlugin};
use crate::Script;
use avs_core::{ScriptError, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A registered plugin. Immutable once stored.
pub struct PluginRecord {
    pub key: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub requirements: Requirements,
    pub description: Option<String>,
    pub generator: Generator,
}

impl PluginRecord {
    /// Key followed by aliases: every member name this record answers to
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRecord")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("requirements", &self.requirements)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Table {
    records: IndexMap<String, Arc<PluginRecord>>,
    /// member name -> canonical key
    members: HashMap<String, String>,
}

/// Central plugin registry
///
/// Append-only: records are never replaced or removed. Every `Script`
/// holding this registry sees registrations made after it was created.
#[derive(Default)]
pub struct PluginRegistry {
    table: RwLock<Table>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin without requirements
    pub fn register_fn<F>(&self, name: &str, generator: F) -> Result<(), ScriptError>
    where
        F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
    {
        self.register(name, PluginOptions::default(), generator)
    }

    pub fn register<F>(
        &self,
        name: &str,
        options: PluginOptions,
        generator: F,
    ) -> Result<(), ScriptError>
    where
        F: Fn(&mut Script, &[Value]) -> GeneratorResult + Send + Sync + 'static,
    {
        self.insert(name, options.into_requirements(), None, Arc::new(generator))
    }

    pub fn register_plugin<P: ScriptPlugin + 'static>(&self, plugin: P) -> Result<(), ScriptError> {
        let meta = plugin.meta();
        let plugin = Arc::new(plugin);
        let generator: Generator =
            Arc::new(move |script: &mut Script, args: &[Value]| plugin.generate(script, args));
        let description = (!meta.description.is_empty()).then(|| meta.description.to_string());
        self.insert(meta.name, meta.requirements(), description, generator)
    }

    fn insert(
        &self,
        name: &str,
        requirements: Requirements,
        description: Option<String>,
        generator: Generator,
    ) -> Result<(), ScriptError> {
        let key = canonicalize(name);
        if is_reserved(&key) {
            return Err(ScriptError::reserved_name(name));
        }
        if key.is_empty() {
            return Err(ScriptError::invalid_name(name));
        }

        let mut table = self.table.write();
        if table.records.contains_key(&key) {
            return Err(ScriptError::name_collision(name, key));
        }

        let record = Arc::new(PluginRecord {
            key: key.clone(),
            name: name.to_string(),
            aliases: derive_aliases(name),
            requirements,
            description,
            generator,
        });
        for member in record.member_names() {
            table.members.insert(member.to_string(), key.clone());
        }
        debug!(key = %record.key, aliases = ?record.aliases, "registered plugin");
        table.records.insert(key, record);
        Ok(())
    }

    /// Record by canonical key (or any casing of it)
    pub fn get(&self, name: &str) -> Option<Arc<PluginRecord>> {
        self.table.read().records.get(&canonicalize(name)).cloned()
    }

    /// Record answering to this exact member name (key or alias)
    pub fn resolve_member(&self, member: &str) -> Option<Arc<PluginRecord>> {
        let table = self.table.read();
        let key = table.members.get(member)?;
        table.records.get(key).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.read().records.contains_key(&canonicalize(name))
    }

    pub fn len(&self) -> usize {
        self.table.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().records.is_empty()
    }

    /// Canonical keys in registration order
    pub fn keys(&self) -> Vec<String> {
        self.table.read().records.keys().cloned().collect()
    }

    /// Every member name, in registration order, key before aliases
    pub fn member_names(&self) -> Vec<String> {
        self.table
            .read()
            .records
            .values()
            .flat_map(|r| r.member_names().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    pub fn records(&self) -> Vec<Arc<PluginRecord>> {
        self.table.read().records.values().cloned().collect()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry").field("plugins", &self.keys()).finish()
    }
}
