//! Configuration layering, fallback logic, and environment overrides
//!
//! Layers from lowest to highest precedence: global `~/.loadout/config.toml`,
//! the nearest project `loadout.toml`, `LOADOUT_*` environment variables,
//! command-line flags.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use loadout_core::error::LoadoutError;

use crate::settings::{load_from_file, LoadoutToml};
use crate::ConfigResult;

/// Project settings file name
pub const CONFIG_FILE: &str = "loadout.toml";

/// Environment variable holding a comma-separated priority list
pub const ENV_PRIORITY: &str = "LOADOUT_PRIORITY";
/// Environment variable holding a catalog path
pub const ENV_CATALOG: &str = "LOADOUT_CATALOG";
/// Environment variable toggling strict resolution
pub const ENV_STRICT: &str = "LOADOUT_STRICT";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// `LOADOUT_*` variables seen by the loader
    env: HashMap<String, String>,
    /// Global settings file; `None` skips the global layer
    global_path: Option<Utf8PathBuf>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project loadout.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

/// Settings after layering, with the sources that contributed
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub settings: LoadoutToml,
    pub sources: Vec<ConfigSource>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

impl ConfigLoader {
    /// Create a loader reading the process environment and the home directory
    ///
    /// A missing home directory only skips the global layer.
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_path = match Self::global_config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("Skipping global settings: {}", e);
                None
            },
        };

        Self {
            cwd,
            env: ConfigLayering::collect_env_overrides(),
            global_path,
        }
    }

    /// Replace the environment the loader reads overrides from
    pub fn with_env<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env = ConfigLayering::collect_overrides_from(vars);
        self
    }

    /// Replace the global settings file location
    pub fn with_global_path(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    /// Working directory the loader searches from
    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find a file in the working directory or its ancestors
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.exists() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load the nearest project loadout.toml, if any
    ///
    /// A relative catalog path is made relative to the settings file.
    pub async fn load_project_config(&self) -> ConfigResult<Option<(LoadoutToml, Utf8PathBuf)>> {
        let Some(path) = self.resolve_config_path(CONFIG_FILE) else {
            return Ok(None);
        };

        let mut config = load_from_file(&path).await?;
        if let Some(dir) = path.parent() {
            config.rebase_catalog_path(dir);
        }
        debug!(path = %path, "Loaded project settings");
        Ok(Some((config, path)))
    }

    /// Path of the global settings file
    pub fn global_config_path() -> ConfigResult<Utf8PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| LoadoutError::invalid("home_dir", "Could not determine home directory"))?;

        let home_dir = Utf8PathBuf::try_from(home_dir)
            .map_err(|e| LoadoutError::invalid("home_dir", format!("Invalid home directory path: {}", e)))?;

        Ok(home_dir.join(".loadout").join("config.toml"))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(LoadoutToml, Utf8PathBuf)>> {
        let Some(path) = self.global_path.clone() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let mut config = load_from_file(&path).await?;
        if let Some(dir) = path.parent() {
            config.rebase_catalog_path(dir);
        }
        debug!(path = %path, "Loaded global settings");
        Ok(Some((config, path)))
    }

    /// Load every layer and merge them
    pub async fn load(&self, cli_overrides: HashMap<String, String>) -> ConfigResult<LoadedConfig> {
        let global = self.load_global_config().await?;
        let project = self.load_project_config().await?;
        let env_overrides = self.env.clone();

        let mut sources = Vec::new();
        if let Some((_, path)) = &global {
            sources.push(ConfigSource::Global(path.clone()));
        }
        if let Some((_, path)) = &project {
            sources.push(ConfigSource::Project(path.clone()));
        }
        let mut env_keys: Vec<&String> = env_overrides.keys().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(|key| ConfigSource::Environment(key.clone())));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let settings = ConfigLayering::merge_configs(
            global.map(|(config, _)| config),
            project.map(|(config, _)| config),
            env_overrides,
            cli_overrides,
        )?;

        Ok(LoadedConfig { settings, sources })
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers
    ///
    /// The project replaces the global priority list and catalog path when it
    /// sets them; custom categories from both are kept, and project package
    /// assignments win field by field over global ones.
    pub fn merge_configs(
        global_config: Option<LoadoutToml>,
        project_config: Option<LoadoutToml>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<LoadoutToml> {
        let mut merged = global_config.unwrap_or_default();

        if let Some(project) = project_config {
            if !project.priority.categories.is_empty() {
                merged.priority = project.priority;
            }
            for category in project.categories.custom {
                if !merged.categories.custom.contains(&category) {
                    merged.categories.custom.push(category);
                }
            }
            if project.catalog.path.is_some() {
                merged.catalog = project.catalog;
            }
            if project.resolve.strict.is_some() {
                merged.resolve.strict = project.resolve.strict;
            }
            merged.merge_packages(project.packages);
        }

        // Apply environment variable overrides
        Self::apply_overrides(&mut merged, &env_overrides, |key| match key {
            ENV_PRIORITY => Some(Override::Priority),
            ENV_CATALOG => Some(Override::Catalog),
            ENV_STRICT => Some(Override::Strict),
            _ => None,
        })?;

        // Apply CLI flag overrides (highest priority)
        Self::apply_overrides(&mut merged, &cli_overrides, |key| match key {
            "priority" => Some(Override::Priority),
            "catalog" => Some(Override::Catalog),
            "strict" => Some(Override::Strict),
            _ => None,
        })?;

        Ok(merged)
    }

    fn apply_overrides<F>(config: &mut LoadoutToml, overrides: &HashMap<String, String>, target: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<Override>,
    {
        // Sorted so a bad value reports the same key on every run
        let mut keys: Vec<&String> = overrides.keys().collect();
        keys.sort();

        for key in keys {
            let value = &overrides[key];
            match target(key) {
                Some(Override::Priority) => {
                    config.priority.categories = parse_list(value);
                },
                Some(Override::Catalog) => {
                    if value.trim().is_empty() {
                        return Err(LoadoutError::invalid(key.as_str(), "catalog path must not be empty"));
                    }
                    config.catalog.path = Some(Utf8PathBuf::from(value.trim()));
                },
                Some(Override::Strict) => {
                    config.resolve.strict = Some(parse_flag(key, value)?);
                },
                None => {
                    // Unknown override, ignore
                },
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        Self::collect_overrides_from(std::env::vars())
    }

    /// Keep only `LOADOUT_*` variables
    pub fn collect_overrides_from<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter(|(key, _)| key.starts_with("LOADOUT_"))
            .collect()
    }
}

/// Setting an override key maps to
#[derive(Debug, Clone, Copy)]
enum Override {
    Priority,
    Catalog,
    Strict,
}

/// Split a comma-separated list, dropping blank entries
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(LoadoutError::invalid(
            key,
            format!("expected a boolean, got '{}'", other),
        )),
    }
}
