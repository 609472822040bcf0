pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod input;
pub mod models;
pub mod plugin;
pub mod renderer;
pub mod services;
pub mod storage;

// Convenient re-exports (so call sites can do `chestkeeper::Plugin`, etc.)
pub use commands::{CmdCtx, process_command};
pub use events::{OpenOverride, on_chest_open_attempt};
pub use plugin::Plugin;
