//! Boundary to the game server.
//!
//! The plugin never touches the engine directly: worlds, loot tables, chat and the
//! command sender are reached through the traits below. A real server binds them to its
//! own API; `memory` provides an in-process implementation for the console binary and tests.

use crate::error::AppResult;
use crate::models::block::BlockState;
use crate::models::inventory::Inventory;
use crate::models::types::{Location, LootTableKey, PlayerId, WorldName};
use rand::RngCore;

pub mod memory;

pub use memory::{MemoryHost, MemorySender};

/// Parameters handed to the loot generator.
#[derive(Debug, Clone, Copy)]
pub struct LootContext<'a> {
    /// Where the loot is generated
    pub location: &'a Location,
    /// The opening player's luck attribute
    pub luck: f32,
}

pub trait WorldAccess {
    /// Whether a world with this name is loaded.
    fn has_world(&self, world: &WorldName) -> bool;

    /// Current block at `location`. Fails with `UnknownWorld` when the world is not loaded.
    fn block_at(&self, location: &Location) -> AppResult<BlockState>;

    /// Commits a block state. `force` overrides the host's update validation.
    fn set_block(&mut self, location: &Location, block: BlockState, force: bool) -> AppResult<()>;
}

pub trait LootTables {
    fn has_loot_table(&self, key: &LootTableKey) -> bool;

    /// Fills `inventory` from the loot table `key`.
    fn fill_inventory(
        &self,
        key: &LootTableKey,
        inventory: &mut Inventory,
        rng: &mut dyn RngCore,
        ctx: &LootContext<'_>,
    ) -> AppResult<()>;
}

pub trait Broadcaster {
    /// Sends a chat message to everyone connected.
    fn broadcast(&mut self, message: &str);
}

/// Everything the plugin needs from the server.
pub trait Host: WorldAccess + LootTables + Broadcaster {}

impl<T: WorldAccess + LootTables + Broadcaster + ?Sized> Host for T {}

/// A player as seen by a command: identity, current world and the block in sight.
#[derive(Debug, Clone)]
pub struct PlayerContext {
    pub id: PlayerId,
    pub world: WorldName,
    /// Block the player is looking at within reach, if any
    pub target_block: Option<Location>,
    pub luck: f32,
}

/// Whoever invoked a command: a player or the server console.
pub trait CommandSender {
    fn name(&self) -> &str;

    fn has_permission(&self, permission: &str) -> bool;

    fn send_message(&mut self, message: &str);

    /// `None` for senders without a position (eg: the console).
    fn player(&self) -> Option<&PlayerContext>;
}
