use crate::error::AppResult;
use crate::host::{LootContext, LootTables, WorldAccess};
use crate::models::block::{BlockState, ChestBlock, ChestKind};
use crate::models::inventory::{Inventory, InventoryHandle};
use crate::models::types::{Facing, Location, LootTableKey, PlayerId};
use crate::renderer::translate_color_codes;
use rand::{Rng, RngCore};
use std::collections::{BTreeSet, HashMap};

/// Group tag that matches every chest.
pub const ALL_GROUP: &str = "all";

/// Persisted description of a special chest. Built once through `ChestBuilder`
/// and never edited field by field afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ChestDefinition {
    pub location: Location,
    pub loot_table: LootTableKey,
    /// Chance of materializing on a probabilistic placement, not clamped
    pub probability: f64,
    /// Display name, may contain `&` color codes
    pub custom_name: Option<String>,
    /// Key required by the host to open the physical chest
    pub lock: Option<String>,
    pub facing: Option<Facing>,
    pub waterlogged: bool,
    pub groups: BTreeSet<String>,
}

impl ChestDefinition {
    pub fn builder(location: Location, loot_table: LootTableKey) -> ChestBuilder {
        ChestBuilder::new(location, loot_table)
    }
}

#[derive(Debug, Clone)]
pub struct ChestBuilder {
    location: Location,
    loot_table: LootTableKey,
    probability: f64,
    custom_name: Option<String>,
    lock: Option<String>,
    facing: Option<Facing>,
    waterlogged: bool,
    groups: BTreeSet<String>,
}

impl ChestBuilder {
    pub fn new(location: Location, loot_table: LootTableKey) -> Self {
        Self {
            location,
            loot_table,
            probability: 1.0,
            custom_name: None,
            lock: None,
            facing: None,
            waterlogged: false,
            groups: BTreeSet::new(),
        }
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn waterlogged(mut self, waterlogged: bool) -> Self {
        self.waterlogged = waterlogged;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> ChestDefinition {
        ChestDefinition {
            location: self.location,
            loot_table: self.loot_table,
            probability: self.probability,
            custom_name: self.custom_name,
            lock: self.lock,
            facing: self.facing,
            waterlogged: self.waterlogged,
            groups: self.groups,
        }
    }
}

impl From<ChestDefinition> for ChestBuilder {
    fn from(def: ChestDefinition) -> Self {
        Self {
            location: def.location,
            loot_table: def.loot_table,
            probability: def.probability,
            custom_name: def.custom_name,
            lock: def.lock,
            facing: def.facing,
            waterlogged: def.waterlogged,
            groups: def.groups,
        }
    }
}

/// A registered chest: its definition plus the inventories players have opened
/// during the current generation.
#[derive(Debug)]
pub struct SpecialChest {
    def: ChestDefinition,
    opened: HashMap<PlayerId, InventoryHandle>,
}

impl SpecialChest {
    pub fn new(def: ChestDefinition) -> Self {
        Self {
            def,
            opened: HashMap::new(),
        }
    }

    #[inline]
    pub fn definition(&self) -> &ChestDefinition {
        &self.def
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.def.location
    }

    /// Returns the inventory `player` sees in this chest, generating it from the loot
    /// table on the first open of the generation. Later calls hand back the same handle.
    pub fn open<L: LootTables + ?Sized>(
        &mut self,
        player: PlayerId,
        luck: f32,
        loot: &L,
        rng: &mut dyn RngCore,
    ) -> AppResult<InventoryHandle> {
        if let Some(inv) = self.opened.get(&player) {
            return Ok(inv.clone());
        }

        let title = self.def.custom_name.as_deref().map(translate_color_codes);
        let mut inventory = Inventory::chest(title);
        let ctx = LootContext {
            location: &self.def.location,
            luck,
        };
        loot.fill_inventory(&self.def.loot_table, &mut inventory, rng, &ctx)?;

        tracing::debug!(
            location = %self.def.location,
            %player,
            items = inventory.contents().count(),
            "generated chest inventory"
        );

        let handle = inventory.into_handle();
        self.opened.insert(player, handle.clone());
        Ok(handle)
    }

    /// Cached inventory of `player`, if they opened the chest this generation.
    pub fn inventory(&self, player: &PlayerId) -> Option<InventoryHandle> {
        self.opened.get(player).cloned()
    }

    pub fn opened_count(&self) -> usize {
        self.opened.len()
    }

    /// Starts a new generation: every player rolls fresh loot on the next open.
    pub fn reset_inventory(&mut self) {
        self.opened.clear();
    }

    /// Puts the chest block into the world. Without `force` an occupied block is left
    /// alone and `false` is returned.
    pub fn place<W: WorldAccess + ?Sized>(&mut self, world: &mut W, force: bool) -> AppResult<bool> {
        let loc = &self.def.location;
        if !force && !world.block_at(loc)?.is_empty() {
            return Ok(false);
        }

        let block = ChestBlock {
            kind: ChestKind::Single,
            facing: self.def.facing,
            waterlogged: self.def.waterlogged,
            custom_name: self.def.custom_name.as_deref().map(translate_color_codes),
            lock: self.def.lock.as_deref().map(translate_color_codes),
        };
        world.set_block(loc, BlockState::Chest(block), force)?;
        self.reset_inventory();

        Ok(true)
    }

    /// Places the chest with its configured probability. Exactly one sample is drawn
    /// from `rng` per call, whether or not the chest ends up placed.
    pub fn place_with_chance<W: WorldAccess + ?Sized, R: Rng + ?Sized>(
        &mut self,
        world: &mut W,
        force: bool,
        rng: &mut R,
    ) -> AppResult<bool> {
        let sample: f64 = rng.random();
        if self.def.probability > sample {
            self.place(world, force)
        } else {
            Ok(false)
        }
    }

    /// Takes the physical chest out of the world, leaving water behind when the chest
    /// block was waterlogged. Returns `false` when there is no chest at the location.
    pub fn remove<W: WorldAccess + ?Sized>(&self, world: &mut W) -> AppResult<bool> {
        let loc = &self.def.location;
        let replacement = match world.block_at(loc)? {
            BlockState::Chest(c) if c.waterlogged => BlockState::Water,
            BlockState::Chest(_) => BlockState::Air,
            _ => return Ok(false),
        };
        world.set_block(loc, replacement, false)?;
        Ok(true)
    }

    pub fn is_in_group(&self, group: &str) -> bool {
        group == ALL_GROUP || self.def.groups.contains(group)
    }

    pub fn is_in_any_group<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        groups.iter().any(|g| self.is_in_group(g.as_ref()))
    }
}

impl From<ChestDefinition> for SpecialChest {
    fn from(def: ChestDefinition) -> Self {
        Self::new(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::host::memory::LootTable;
    use crate::models::inventory::ItemStack;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::rc::Rc;

    fn dungeon() -> LootTableKey {
        LootTableKey::new("minecraft", "chests/simple_dungeon")
    }

    fn host() -> MemoryHost {
        let mut host = MemoryHost::with_worlds(["world"]);
        host.register_loot_table(
            LootTableKey::new("test", "full"),
            LootTable::new().with_drop("minecraft:gold_ingot", 1, 5, 1.0),
        );
        host
    }

    fn chest_at(x: i32, y: i32, z: i32) -> ChestBuilder {
        ChestDefinition::builder(Location::new("world", x, y, z), dungeon())
    }

    /// Always yields the same value from `random::<f64>()`.
    struct FixedRng(u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, b) in dst.iter_mut().enumerate() {
                *b = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    #[test]
    fn builder_defaults() {
        let def = chest_at(0, 0, 0).build();
        assert_eq!(def.probability, 1.0);
        assert!(def.custom_name.is_none());
        assert!(def.lock.is_none());
        assert!(def.facing.is_none());
        assert!(!def.waterlogged);
        assert!(def.groups.is_empty());
    }

    #[test]
    fn open_is_cached_per_player() {
        let host = host();
        let mut rng = StdRng::seed_from_u64(1);
        let mut chest = SpecialChest::new(chest_at(0, 64, 0).build());
        let alex = PlayerId::new();
        let steve = PlayerId::new();

        let first = chest.open(alex, 0.0, &host, &mut rng).unwrap();
        let second = chest.open(alex, 0.0, &host, &mut rng).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let other = chest.open(steve, 0.0, &host, &mut rng).unwrap();
        assert!(!Rc::ptr_eq(&first, &other));
        assert_eq!(chest.opened_count(), 2);
    }

    #[test]
    fn reset_forces_a_new_inventory() {
        let host = host();
        let mut rng = StdRng::seed_from_u64(2);
        let mut chest = SpecialChest::new(chest_at(0, 64, 0).build());
        let alex = PlayerId::new();

        let first = chest.open(alex, 0.0, &host, &mut rng).unwrap();
        chest.reset_inventory();
        assert!(chest.inventory(&alex).is_none());
        let second = chest.open(alex, 0.0, &host, &mut rng).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn open_uses_translated_custom_name_as_title() {
        let host = host();
        let mut rng = StdRng::seed_from_u64(3);
        let mut chest = SpecialChest::new(chest_at(0, 64, 0).custom_name("&6Treasure").build());
        let inv = chest.open(PlayerId::new(), 0.0, &host, &mut rng).unwrap();
        assert_eq!(inv.borrow().title.as_deref(), Some("§6Treasure"));
    }

    #[test]
    fn open_fills_from_loot_table() {
        let host = host();
        let mut rng = StdRng::seed_from_u64(4);
        let def = ChestDefinition::builder(Location::new("world", 0, 64, 0), LootTableKey::new("test", "full")).build();
        let mut chest = SpecialChest::new(def);
        let inv = chest.open(PlayerId::new(), 0.0, &host, &mut rng).unwrap();
        let items: Vec<ItemStack> = inv.borrow().contents().cloned().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item, "minecraft:gold_ingot");
    }

    #[test]
    fn place_without_force_keeps_occupied_block() {
        let mut host = host();
        let loc = Location::new("world", 5, 64, 5);
        host.set_block(&loc, BlockState::Other("stone".into()), true).unwrap();

        let mut chest = SpecialChest::new(chest_at(5, 64, 5).build());
        assert!(!chest.place(&mut host, false).unwrap());
        assert_eq!(host.block_at(&loc).unwrap(), BlockState::Other("stone".into()));

        assert!(chest.place(&mut host, true).unwrap());
        assert!(host.block_at(&loc).unwrap().is_chest());
    }

    #[test]
    fn place_applies_block_attributes_and_clears_cache() {
        let mut host = host();
        let mut rng = StdRng::seed_from_u64(5);
        let def = chest_at(1, 70, 1)
            .custom_name("&aLoot")
            .lock("&cKey")
            .facing(Facing::East)
            .waterlogged(true)
            .build();
        let mut chest = SpecialChest::new(def);
        chest.open(PlayerId::new(), 0.0, &host, &mut rng).unwrap();

        assert!(chest.place(&mut host, false).unwrap());
        let block = host.block_at(chest.location()).unwrap();
        let c = block.as_chest().unwrap();
        assert_eq!(c.kind, ChestKind::Single);
        assert_eq!(c.facing, Some(Facing::East));
        assert!(c.waterlogged);
        assert_eq!(c.custom_name.as_deref(), Some("§aLoot"));
        assert_eq!(c.lock.as_deref(), Some("§cKey"));
        assert_eq!(chest.opened_count(), 0);
    }

    #[test]
    fn zero_probability_never_places() {
        let mut host = host();
        let mut chest = SpecialChest::new(chest_at(2, 64, 2).probability(0.0).build());
        assert!(!chest.place_with_chance(&mut host, false, &mut FixedRng(0)).unwrap());
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            assert!(!chest.place_with_chance(&mut host, true, &mut rng).unwrap());
        }
        assert!(host.block_at(chest.location()).unwrap().is_empty());
    }

    #[test]
    fn full_probability_always_places() {
        let mut host = host();
        let mut chest = SpecialChest::new(chest_at(3, 64, 3).probability(1.0).build());
        assert!(chest.place_with_chance(&mut host, true, &mut FixedRng(u64::MAX)).unwrap());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(chest.place_with_chance(&mut host, true, &mut rng).unwrap());
        }
    }

    #[test]
    fn failed_chance_keeps_cache() {
        let mut host = host();
        let mut rng = StdRng::seed_from_u64(8);
        let mut chest = SpecialChest::new(chest_at(4, 64, 4).probability(0.0).build());
        chest.open(PlayerId::new(), 0.0, &host, &mut rng).unwrap();
        assert!(!chest.place_with_chance(&mut host, true, &mut rng).unwrap());
        assert_eq!(chest.opened_count(), 1);
    }

    #[test]
    fn remove_restores_water_or_air() {
        let mut host = host();
        let mut dry = SpecialChest::new(chest_at(0, 60, 0).build());
        let mut wet = SpecialChest::new(chest_at(1, 60, 0).waterlogged(true).build());
        dry.place(&mut host, true).unwrap();
        wet.place(&mut host, true).unwrap();

        assert!(dry.remove(&mut host).unwrap());
        assert!(wet.remove(&mut host).unwrap());
        assert_eq!(host.block_at(dry.location()).unwrap(), BlockState::Air);
        assert_eq!(host.block_at(wet.location()).unwrap(), BlockState::Water);

        // Nothing left to remove
        assert!(!dry.remove(&mut host).unwrap());
    }

    #[test]
    fn remove_ignores_other_blocks() {
        let mut host = host();
        let chest = SpecialChest::new(chest_at(9, 64, 9).build());
        host.set_block(chest.location(), BlockState::Other("dirt".into()), true).unwrap();
        assert!(!chest.remove(&mut host).unwrap());
        assert_eq!(host.block_at(chest.location()).unwrap(), BlockState::Other("dirt".into()));
    }

    #[test]
    fn all_matches_chests_without_groups() {
        let chest = SpecialChest::new(chest_at(0, 0, 0).build());
        assert!(chest.is_in_any_group(&["all"]));
        assert!(chest.is_in_group("all"));
        assert!(!chest.is_in_group("treasure"));
    }

    #[test]
    fn any_group_matches_membership() {
        let chest = SpecialChest::new(chest_at(0, 0, 0).groups(["treasure", "cave"]).build());
        assert!(chest.is_in_any_group(&["nether", "cave"]));
        assert!(!chest.is_in_any_group(&["nether"]));
        assert!(!chest.is_in_any_group::<&str>(&[]));
    }
}
