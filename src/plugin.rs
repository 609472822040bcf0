use crate::config::PluginConfig;
use crate::error::AppResult;
use crate::host::Host;
use crate::services::chests::ChestRegistry;
use crate::storage::ChestFile;
use std::path::PathBuf;

pub const NAME: &str = "ChestKeeper";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// Capability every chest command requires.
pub const ADMIN_PERMISSION: &str = "chestkeeper.admin";

/// Plugin-wide state, handed explicitly to the command surface and the event bridge.
#[derive(Debug)]
pub struct Plugin {
    pub config: PluginConfig,
    pub chests: ChestRegistry,
    data_dir: PathBuf,
}

impl Plugin {
    /// Plugin with the bundled configuration and no chests. Nothing is read from disk.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            config: PluginConfig::default(),
            chests: ChestRegistry::new(ChestFile::in_dir(&data_dir)),
            data_dir,
        }
    }

    /// Loads `config.yml` and `chests.json` from `data_dir`, creating both on first run.
    pub fn enable(data_dir: impl Into<PathBuf>, host: &dyn Host) -> AppResult<Self> {
        let mut plugin = Self::new(data_dir);
        plugin.config = PluginConfig::load(&plugin.data_dir)?;
        let count = plugin.chests.load(host)?;
        tracing::info!(data_dir = %plugin.data_dir.display(), chests = count, "{NAME} {VERSION} enabled");
        Ok(plugin)
    }

    /// Re-reads configuration and chests. Each part keeps its current state when its
    /// file fails to load.
    pub fn reload(&mut self, host: &dyn Host) -> AppResult<usize> {
        match PluginConfig::load(&self.data_dir) {
            Ok(config) => self.config = config,
            Err(e) => {
                tracing::error!(error = %e, "failed to reload plugin configuration");
                return Err(e.into());
            }
        }
        self.chests.load(host)
    }

    /// Shortcut for `config.message`.
    pub fn message(&self, path: &str) -> String {
        self.config.message(path)
    }
}
