//! Dependency resolution
//!
//! Turns a plugin's `load` and `autoload` requirements into statements.
//! `load` paths are classified by extension only; `autoload` directories
//! are listed (non-recursively) and every recognised file becomes a
//! statement. Nothing here deduplicates across plugins: that is the
//! script's job.

use crate::requirements::Requirements;
use avs_core::{ScriptError, Statement};
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::debug;

const SCRIPT_EXTENSIONS_VAR: &str = "AVS_SCRIPT_EXTENSIONS";
const PLUGIN_EXTENSIONS_VAR: &str = "AVS_PLUGIN_EXTENSIONS";

/// How files are classified, by extension (without the dot)
///
/// Only built through [`ResolverConfig::new`] (or deserialization, which
/// goes through it), so every instance is normalized and has no extension
/// listed as both kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExtensionLists")]
pub struct ResolverConfig {
    script_extensions: Vec<String>,
    plugin_extensions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ExtensionLists {
    script_extensions: Vec<String>,
    plugin_extensions: Vec<String>,
}

impl Default for ExtensionLists {
    fn default() -> Self {
        Self {
            script_extensions: vec!["avsi".to_string()],
            plugin_extensions: vec!["dll".to_string()],
        }
    }
}

impl TryFrom<ExtensionLists> for ResolverConfig {
    type Error = ScriptError;

    fn try_from(lists: ExtensionLists) -> Result<Self, ScriptError> {
        Self::new(lists.script_extensions, lists.plugin_extensions)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let lists = ExtensionLists::default();
        Self {
            script_extensions: lists.script_extensions,
            plugin_extensions: lists.plugin_extensions,
        }
    }
}

impl ResolverConfig {
    /// Leading dots are stripped and extensions lowercased. Fails if an
    /// extension is empty or listed as both a script and a plugin extension.
    pub fn new<S, P>(script_extensions: S, plugin_extensions: P) -> Result<Self, ScriptError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let script_extensions = normalize_extensions(script_extensions)?;
        let plugin_extensions = normalize_extensions(plugin_extensions)?;
        if let Some(ext) = script_extensions.iter().find(|ext| plugin_extensions.contains(ext)) {
            return Err(ScriptError::config(format!(
                "extension '{}' is both a script and a plugin extension",
                ext
            )));
        }
        Ok(Self { script_extensions, plugin_extensions })
    }

    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by `AVS_SCRIPT_EXTENSIONS` / `AVS_PLUGIN_EXTENSIONS`
    /// (comma separated, leading dots allowed).
    pub fn from_env() -> Result<Self, ScriptError> {
        Self::from_lookup(|var| match env::var(var) {
            Ok(raw) => Ok(Some(raw)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(ScriptError::config(format!("{} is not valid unicode", var)))
            }
        })
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> Result<Option<String>, ScriptError>,
    {
        let defaults = ExtensionLists::default();
        let script_extensions = match lookup(SCRIPT_EXTENSIONS_VAR)? {
            Some(raw) => parse_extension_list(&raw),
            None => defaults.script_extensions,
        };
        let plugin_extensions = match lookup(PLUGIN_EXTENSIONS_VAR)? {
            Some(raw) => parse_extension_list(&raw),
            None => defaults.plugin_extensions,
        };
        Self::new(script_extensions, plugin_extensions)
    }

    pub fn script_extensions(&self) -> &[String] {
        &self.script_extensions
    }

    pub fn plugin_extensions(&self) -> &[String] {
        &self.plugin_extensions
    }

    fn is_script(&self, path: &Path) -> bool {
        has_extension(path, &self.script_extensions)
    }

    fn is_plugin(&self, path: &Path) -> bool {
        has_extension(path, &self.plugin_extensions)
    }
}

fn normalize_extensions<I>(extensions: I) -> Result<Vec<String>, ScriptError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| {
            let ext = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
            if ext.is_empty() {
                Err(ScriptError::config("empty file extension"))
            } else {
                Ok(ext)
            }
        })
        .collect()
}

fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

fn join(dir: &str, name: &OsStr) -> String {
    Path::new(dir).join(name).to_string_lossy().into_owned()
}

/// Resolves requirements into dependency statements
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// `config` is already validated; see [`ResolverConfig::new`].
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// All statements for `reqs`: `load` entries first, then each `autoload`
    /// directory in declared order.
    pub fn resolve(&self, reqs: &Requirements) -> Result<Vec<Statement>, ScriptError> {
        let mut statements: Vec<Statement> = reqs.load.iter().map(|p| self.classify(p)).collect();
        for dir in &reqs.autoload {
            statements.extend(self.scan(dir)?);
        }
        Ok(statements)
    }

    /// Statement for an explicitly loaded path; never touches the filesystem.
    pub fn classify(&self, path: &str) -> Statement {
        if self.config.is_plugin(Path::new(path)) {
            Statement::load_plugin(path)
        } else {
            Statement::import(path)
        }
    }

    /// Statements for one autoload directory: script sources then native
    /// plugins, each sorted by file name.
    pub fn scan(&self, dir: &str) -> Result<Vec<Statement>, ScriptError> {
        let entries = fs::read_dir(dir).map_err(|e| ScriptError::requirement(dir, e))?;

        let mut scripts = Vec::new();
        let mut plugins = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScriptError::requirement(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if self.config.is_script(&path) {
                scripts.push(entry.file_name());
            } else if self.config.is_plugin(&path) {
                plugins.push(entry.file_name());
            }
        }
        scripts.sort();
        plugins.sort();

        debug!(dir, scripts = scripts.len(), plugins = plugins.len(), "autoload scan");

        let statements = scripts
            .iter()
            .map(|name| Statement::import(join(dir, name)))
            .chain(plugins.iter().map(|name| Statement::load_plugin(join(dir, name))))
            .collect();
        Ok(statements)
    }
}
