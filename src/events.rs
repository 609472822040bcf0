//! Inventory-open notifications from the host.
//!
//! The host asks before it shows a container. Returning `None` lets it carry on with its
//! own behavior; any `OpenOverride` means the native open is cancelled and replaced.

use crate::error::AppResult;
use crate::host::LootTables;
use crate::models::inventory::InventoryHandle;
use crate::models::types::{Location, PlayerId};
use crate::plugin::Plugin;
use rand::RngCore;

#[derive(Debug, Clone)]
pub enum OpenOverride {
    /// Show this inventory instead of the chest block's own
    Present(InventoryHandle),
    /// Show nothing and tell the player this message
    AlreadyLooted(String),
}

/// Routes a container opened at `location` by `player` to the special chest registered
/// there, if any.
pub fn on_chest_open_attempt<L: LootTables + ?Sized>(
    plugin: &mut Plugin,
    loot: &L,
    location: &Location,
    player: PlayerId,
    luck: f32,
    rng: &mut dyn RngCore,
) -> AppResult<Option<OpenOverride>> {
    let Some(chest) = plugin.chests.get_mut(location) else {
        return Ok(None);
    };

    if plugin.config.block_empty_chest
        && let Some(inv) = chest.inventory(&player)
        && inv.borrow().is_empty()
    {
        tracing::debug!(%location, %player, "chest already looted");
        let message = plugin.config.message("message.event.chest_already_looted");
        return Ok(Some(OpenOverride::AlreadyLooted(message)));
    }

    let inventory = chest.open(player, luck, loot, rng)?;
    Ok(Some(OpenOverride::Present(inventory)))
}
