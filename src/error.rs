use crate::models::types::{LootTableKey, WorldName};
use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// World is not loaded on the host
    #[error("unknown world: {0}")]
    UnknownWorld(WorldName),

    /// Host has no loot table with this key
    #[error("unknown loot table: {0}")]
    UnknownLootTable(LootTableKey),

    #[error("invalid loot table reference: {0:?}")]
    InvalidLootTable(String),

    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

#[derive(Debug, Error)]
pub enum ConfigErrorKind {
    #[error("failed to read file: {0}")]
    Read(std::io::Error),

    #[error("failed to write file: {0}")]
    Write(std::io::Error),

    #[error("failed to parse file: {0}")]
    Parse(toml::de::Error),

    #[error("failed to parse file: {0}")]
    ParseYaml(serde_yaml::Error),

    #[error("invalid environment variable {0}: {1}")]
    InvalidEnv(String, String),
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: std::path::PathBuf,
        #[source]
        source: ConfigErrorKind,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
