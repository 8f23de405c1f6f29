//! Script assembly
//!
//! A `Script` collects dependency statements and plugin output, then
//! composes them into the final program text: statements first (in the
//! order they were first required), then plugin output in call order.

use crate::registry::{PluginRecord, PluginRegistry};
use crate::requirements::Requirements;
use crate::resolver::Resolver;
use avs_core::{ScriptError, Statement, Value};
use indexmap::IndexSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// One plugin member call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Canonical key of the invoked plugin
    pub plugin: String,
    /// Text the generator returned, if any
    pub output: Option<String>,
}

/// Script under construction
pub struct Script {
    registry: Arc<PluginRegistry>,
    resolver: Resolver,
    invocations: Vec<Invocation>,
    statements: IndexSet<Statement>,
}

impl Script {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self::with_resolver(registry, Resolver::default())
    }

    pub fn with_resolver(registry: Arc<PluginRegistry>, resolver: Resolver) -> Self {
        Self {
            registry,
            resolver,
            invocations: Vec::new(),
            statements: IndexSet::new(),
        }
    }

    /// Invoke a plugin member by key or alias.
    ///
    /// Requirements are resolved before anything is recorded. If resolution
    /// or the generator fails, the script is left as it was before the call.
    pub fn invoke(&mut self, member: &str, args: &[Value]) -> Result<Option<String>, ScriptError> {
        let record = self
            .registry
            .resolve_member(member)
            .ok_or_else(|| ScriptError::unknown_plugin(member))?;
        self.run(&record, args)
    }

    /// Invoke a plugin member without arguments
    pub fn call(&mut self, member: &str) -> Result<Option<String>, ScriptError> {
        self.invoke(member, &[])
    }

    fn run(
        &mut self,
        record: &PluginRecord,
        args: &[Value],
    ) -> Result<Option<String>, ScriptError> {
        let resolved = self.resolver.resolve(&record.requirements)?;
        let checkpoint = (self.statements.len(), self.invocations.len());
        self.statements.extend(resolved);

        trace!(plugin = %record.key, args = args.len(), "invoking plugin");
        let output = match (record.generator)(self, args) {
            Ok(output) => output,
            Err(e) => {
                self.statements.truncate(checkpoint.0);
                self.invocations.truncate(checkpoint.1);
                return Err(e);
            }
        };

        self.invocations.push(Invocation {
            plugin: record.key.clone(),
            output: output.clone().filter(|text| !text.is_empty()),
        });
        Ok(output)
    }

    /// Require a single file, classified by extension
    pub fn load(&mut self, path: &str) -> Result<(), ScriptError> {
        self.require(&Requirements { load: vec![path.to_string()], autoload: Vec::new() })
    }

    /// Require every recognised file in `dir`
    pub fn autoload(&mut self, dir: &str) -> Result<(), ScriptError> {
        self.require(&Requirements { load: Vec::new(), autoload: vec![dir.to_string()] })
    }

    fn require(&mut self, reqs: &Requirements) -> Result<(), ScriptError> {
        let resolved = self.resolver.resolve(reqs)?;
        self.statements.extend(resolved);
        Ok(())
    }

    /// Canonical keys of every plugin known to the registry
    pub fn references(&self) -> Vec<String> {
        self.registry.keys()
    }

    /// Every callable member name, keys and aliases
    pub fn all_references(&self) -> Vec<String> {
        self.registry.member_names()
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.registry.resolve_member(member).is_some()
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Composed text: every line newline-terminated, empty if nothing was added
    pub fn full_code(&self) -> String {
        let mut output = String::new();
        for statement in &self.statements {
            output.push_str(&statement.to_string());
            output.push('\n');
        }
        for text in self.invocations.iter().filter_map(|i| i.output.as_deref()) {
            output.push_str(text);
            output.push('\n');
        }
        output
    }
}
