use crate::error::{ConfigErrorKind, InfraError};
use crate::renderer::translate_color_codes;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Settings of the server process hosting the plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Plugin folder holding `config.yml` and `chests.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Worlds loaded at startup
    #[serde(default = "default_worlds")]
    pub worlds: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("plugins/chestkeeper")
}

fn default_worlds() -> Vec<String> {
    ["world", "world_nether", "world_the_end"].map(String::from).to_vec()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let config_err = |source| InfraError::Config {
            path: path.to_path_buf(),
            source,
        };
        let data = std::fs::read_to_string(path).map_err(|e| config_err(ConfigErrorKind::Read(e)))?;
        let cfg: Self = toml::from_str(&data).map_err(|e| config_err(ConfigErrorKind::Parse(e)))?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self, InfraError> {
        let _ = dotenvy::from_filename(".env");
        let worlds = match std::env::var("CHESTKEEPER_WORLDS") {
            Ok(list) => {
                let worlds: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(String::from)
                    .collect();
                if worlds.is_empty() {
                    return Err(InfraError::Config {
                        path: PathBuf::from(".env"),
                        source: ConfigErrorKind::InvalidEnv("CHESTKEEPER_WORLDS".into(), list),
                    });
                }
                worlds
            }
            Err(_) => default_worlds(),
        };

        let cfg = Self {
            data_dir: std::env::var("CHESTKEEPER_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| default_data_dir()),
            worlds,
        };

        Ok(cfg)
    }
}

/// Name of the plugin configuration inside the data directory.
pub const PLUGIN_CONFIG_FILE: &str = "config.yml";

/// Shipped plugin configuration, written on first run and used for missing keys.
pub const DEFAULT_PLUGIN_CONFIG: &str = include_str!("../resources/config.yml");

static DEFAULTS: Lazy<Value> =
    Lazy::new(|| serde_yaml::from_str(DEFAULT_PLUGIN_CONFIG).expect("bundled config.yml is valid YAML"));

/// Plugin settings and the message catalog from `config.yml`.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Deny re-opening a chest whose cached inventory the player already emptied
    pub block_empty_chest: bool,
    root: Value,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::from_value(DEFAULTS.clone())
    }
}

impl PluginConfig {
    /// Reads `config.yml` from the data directory, writing the default one first if
    /// there is none.
    pub fn load(data_dir: &Path) -> Result<Self, InfraError> {
        let path = data_dir.join(PLUGIN_CONFIG_FILE);
        let config_err = |source| InfraError::Config {
            path: path.clone(),
            source,
        };

        if !path.exists() {
            std::fs::create_dir_all(data_dir)?;
            std::fs::write(&path, DEFAULT_PLUGIN_CONFIG).map_err(|e| config_err(ConfigErrorKind::Write(e)))?;
            tracing::info!(path = %path.display(), "wrote default plugin configuration");
        }

        let text = std::fs::read_to_string(&path).map_err(|e| config_err(ConfigErrorKind::Read(e)))?;
        Self::from_yaml(&text).map_err(|e| config_err(ConfigErrorKind::ParseYaml(e)))
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        let root: Value = serde_yaml::from_str(text)?;
        Ok(Self::from_value(root))
    }

    fn from_value(root: Value) -> Self {
        let block_empty_chest = lookup(&root, "block_empty_chest")
            .or_else(|| lookup(&DEFAULTS, "block_empty_chest"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self { block_empty_chest, root }
    }

    /// Message at a dotted path (eg: "message.command.add.success_new") with `&` color
    /// codes translated. Falls back to the bundled default, then to the path itself.
    pub fn message(&self, path: &str) -> String {
        let value = lookup(&self.root, path).or_else(|| lookup(&DEFAULTS, path));
        let raw = match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => {
                tracing::warn!(path, "missing message in config.yml");
                return path.to_string();
            }
        };
        translate_color_codes(&raw)
    }

    /// Like `message`, replacing `%count%` with `count`.
    pub fn message_count(&self, path: &str, count: usize) -> String {
        self.message(path).replace("%count%", &count.to_string())
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}
