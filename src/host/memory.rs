use crate::error::{AppResult, DomainError};
use crate::host::{Broadcaster, CommandSender, LootContext, LootTables, PlayerContext, WorldAccess};
use crate::models::block::BlockState;
use crate::models::inventory::{Inventory, ItemStack};
use crate::models::types::{Location, LootTableKey, WorldName};
use rand::{Rng, RngCore};
use std::collections::{HashMap, HashSet};

/// A sparse block grid. Unset positions are air.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    blocks: HashMap<(i32, i32, i32), BlockState>,
}

impl MemoryWorld {
    fn get(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.blocks.get(&(x, y, z)).cloned().unwrap_or(BlockState::Air)
    }

    fn set(&mut self, x: i32, y: i32, z: i32, block: BlockState) {
        if block.is_empty() {
            self.blocks.remove(&(x, y, z));
        } else {
            self.blocks.insert((x, y, z), block);
        }
    }
}

#[derive(Debug, Clone)]
struct LootDrop {
    item: String,
    min: u32,
    max: u32,
    chance: f32,
    /// Extra chance per point of luck
    quality: f32,
}

/// A flat list of independent drops.
#[derive(Debug, Clone, Default)]
pub struct LootTable {
    drops: Vec<LootDrop>,
}

impl LootTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drop(mut self, item: impl Into<String>, min: u32, max: u32, chance: f32) -> Self {
        self.drops.push(LootDrop {
            item: item.into(),
            min,
            max: max.max(min),
            chance,
            quality: 0.0,
        });
        self
    }

    /// Like `with_drop`, with the chance growing by `quality` per point of luck.
    pub fn with_lucky_drop(mut self, item: impl Into<String>, min: u32, max: u32, chance: f32, quality: f32) -> Self {
        self = self.with_drop(item, min, max, chance);
        if let Some(last) = self.drops.last_mut() {
            last.quality = quality;
        }
        self
    }

    pub fn roll(&self, rng: &mut dyn RngCore, luck: f32) -> Vec<ItemStack> {
        let mut stacks = Vec::new();
        for drop in &self.drops {
            let chance = (drop.chance + drop.quality * luck).clamp(0.0, 1.0);
            if chance <= 0.0 || rng.random::<f32>() >= chance {
                continue;
            }

            let count = if drop.min == drop.max {
                drop.min
            } else {
                rng.random_range(drop.min..=drop.max)
            };

            if count > 0 {
                stacks.push(ItemStack::new(drop.item.clone(), count));
            }
        }
        stacks
    }
}

/// In-process server: worlds, loot tables and a chat log.
#[derive(Debug, Default)]
pub struct MemoryHost {
    worlds: HashMap<WorldName, MemoryWorld>,
    loot_tables: HashMap<LootTableKey, LootTable>,
    /// Every broadcast message, oldest first
    pub broadcasts: Vec<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with the given worlds loaded and the builtin loot tables registered.
    pub fn with_worlds<I, S>(worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut host = Self::new();
        for world in worlds {
            host.add_world(WorldName::new(world));
        }
        for (key, table) in builtin_loot_tables() {
            host.register_loot_table(key, table);
        }
        host
    }

    pub fn add_world(&mut self, name: WorldName) {
        self.worlds.entry(name).or_default();
    }

    pub fn register_loot_table(&mut self, key: LootTableKey, table: LootTable) {
        self.loot_tables.insert(key, table);
    }

    fn world(&self, name: &WorldName) -> AppResult<&MemoryWorld> {
        self.worlds
            .get(name)
            .ok_or_else(|| DomainError::UnknownWorld(name.clone()))
    }
}

impl WorldAccess for MemoryHost {
    fn has_world(&self, world: &WorldName) -> bool {
        self.worlds.contains_key(world)
    }

    fn block_at(&self, location: &Location) -> AppResult<BlockState> {
        let world = self.world(&location.world)?;
        Ok(world.get(location.x, location.y, location.z))
    }

    fn set_block(&mut self, location: &Location, block: BlockState, _force: bool) -> AppResult<()> {
        // Nothing else mutates blocks in between, so the update never goes stale
        // and `force` has nothing to override here.
        let world = self
            .worlds
            .get_mut(&location.world)
            .ok_or_else(|| DomainError::UnknownWorld(location.world.clone()))?;
        world.set(location.x, location.y, location.z, block);
        Ok(())
    }
}

impl LootTables for MemoryHost {
    fn has_loot_table(&self, key: &LootTableKey) -> bool {
        self.loot_tables.contains_key(key)
    }

    fn fill_inventory(
        &self,
        key: &LootTableKey,
        inventory: &mut Inventory,
        rng: &mut dyn RngCore,
        ctx: &LootContext<'_>,
    ) -> AppResult<()> {
        let table = self
            .loot_tables
            .get(key)
            .ok_or_else(|| DomainError::UnknownLootTable(key.clone()))?;

        // Scatter the drops over random free slots, the way vanilla chests look.
        for stack in table.roll(rng, ctx.luck) {
            let free: Vec<usize> = (0..inventory.size()).filter(|&i| inventory.get(i).is_none()).collect();
            if free.is_empty() {
                tracing::warn!(loot_table = %key, location = %ctx.location, "inventory full, dropping loot");
                break;
            }
            let slot = free[rng.random_range(0..free.len())];
            inventory.set(slot, Some(stack));
        }
        Ok(())
    }
}

impl Broadcaster for MemoryHost {
    fn broadcast(&mut self, message: &str) {
        tracing::info!(target: "chat", "{}", message);
        self.broadcasts.push(message.to_string());
    }
}

/// A command sender that records what it is told.
#[derive(Debug, Clone)]
pub struct MemorySender {
    name: String,
    /// `None` grants every permission
    permissions: Option<HashSet<String>>,
    player: Option<PlayerContext>,
    /// Messages sent to this sender, oldest first
    pub inbox: Vec<String>,
}

impl MemorySender {
    /// The server console: every permission, no position.
    pub fn console() -> Self {
        Self {
            name: "CONSOLE".to_string(),
            permissions: None,
            player: None,
            inbox: Vec::new(),
        }
    }

    pub fn player(name: impl Into<String>, ctx: PlayerContext) -> Self {
        Self {
            name: name.into(),
            permissions: Some(HashSet::new()),
            player: Some(ctx),
            inbox: Vec::new(),
        }
    }

    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        if let Some(p) = self.permissions.as_mut() {
            p.insert(permission.into());
        }
        self
    }

    pub fn last_message(&self) -> Option<&str> {
        self.inbox.last().map(|s| s.as_str())
    }
}

impl CommandSender for MemorySender {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.as_ref().is_none_or(|p| p.contains(permission))
    }

    fn send_message(&mut self, message: &str) {
        tracing::debug!(to = %self.name, "{}", message);
        self.inbox.push(message.to_string());
    }

    fn player(&self) -> Option<&PlayerContext> {
        self.player.as_ref()
    }
}

/// A handful of vanilla-like tables so a fresh console host has something to roll.
pub fn builtin_loot_tables() -> Vec<(LootTableKey, LootTable)> {
    vec![
        (
            LootTableKey::new("minecraft", "chests/simple_dungeon"),
            LootTable::new()
                .with_drop("minecraft:bread", 1, 3, 0.6)
                .with_drop("minecraft:bone", 1, 8, 0.7)
                .with_drop("minecraft:rotten_flesh", 1, 8, 0.7)
                .with_drop("minecraft:string", 1, 8, 0.5)
                .with_drop("minecraft:saddle", 1, 1, 0.2)
                .with_lucky_drop("minecraft:golden_apple", 1, 1, 0.1, 0.05),
        ),
        (
            LootTableKey::new("minecraft", "chests/abandoned_mineshaft"),
            LootTable::new()
                .with_drop("minecraft:rail", 4, 8, 0.8)
                .with_drop("minecraft:torch", 1, 16, 0.6)
                .with_drop("minecraft:iron_ingot", 1, 5, 0.4)
                .with_lucky_drop("minecraft:diamond", 1, 2, 0.1, 0.05),
        ),
        (
            LootTableKey::new("minecraft", "chests/buried_treasure"),
            LootTable::new()
                .with_drop("minecraft:heart_of_the_sea", 1, 1, 1.0)
                .with_drop("minecraft:gold_ingot", 1, 4, 0.8)
                .with_drop("minecraft:emerald", 4, 8, 0.5)
                .with_lucky_drop("minecraft:diamond", 1, 2, 0.3, 0.1),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn unset_blocks_are_air() {
        let host = MemoryHost::with_worlds(["world"]);
        let block = host.block_at(&Location::new("world", 1, 2, 3)).unwrap();
        assert_eq!(block, BlockState::Air);
    }

    #[test]
    fn unknown_world_is_an_error() {
        let host = MemoryHost::with_worlds(["world"]);
        let err = host.block_at(&Location::new("nowhere", 0, 0, 0)).unwrap_err();
        assert!(matches!(err, DomainError::UnknownWorld(_)));
    }

    #[test]
    fn certain_drops_always_roll() {
        let table = LootTable::new().with_drop("minecraft:stone", 2, 2, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(table.roll(&mut rng, 0.0), vec![ItemStack::new("minecraft:stone", 2)]);
        }
    }

    #[test]
    fn luck_raises_drop_chance() {
        let table = LootTable::new().with_lucky_drop("minecraft:diamond", 1, 1, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(table.roll(&mut rng, 0.0).is_empty());
        assert_eq!(table.roll(&mut rng, 1.0).len(), 1);
    }

    #[test]
    fn permissions_are_checked_for_players() {
        let ctx = PlayerContext {
            id: crate::models::types::PlayerId::new(),
            world: WorldName::new("world"),
            target_block: None,
            luck: 0.0,
        };
        let player = MemorySender::player("alex", ctx);
        assert!(!player.has_permission("chestkeeper.admin"));
        let player = player.grant("chestkeeper.admin");
        assert!(player.has_permission("chestkeeper.admin"));
        assert!(MemorySender::console().has_permission("anything"));
    }
}
