use crate::error::AppResult;
use crate::host::Host;
use crate::models::chest::{ChestDefinition, SpecialChest};
use crate::models::types::Location;
use crate::storage::{ChestFile, codec};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Which registered chests a command applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ChestSelector {
    /// The chest at exactly this location
    At(Location),
    /// Every chest in at least one of these groups; "all" selects everything
    Groups(Vec<String>),
}

/// All special chests by location, backed by the chest file.
#[derive(Debug)]
pub struct ChestRegistry {
    file: ChestFile,
    chests: BTreeMap<Location, SpecialChest>,
}

impl ChestRegistry {
    /// An empty registry. Nothing is read until `load` is called.
    pub fn new(file: ChestFile) -> Self {
        Self {
            file,
            chests: BTreeMap::new(),
        }
    }

    /// Replaces the in-memory chests with the content of the chest file, creating the
    /// file on first run. On failure the current chests are left untouched.
    pub fn load(&mut self, host: &dyn Host) -> AppResult<usize> {
        let loaded = self.read_file(host).inspect_err(|e| {
            tracing::error!(path = %self.file.path().display(), error = %e, "failed to load chests");
        })?;

        let mut chests = BTreeMap::new();
        for def in loaded {
            match chests.entry(def.location.clone()) {
                Entry::Vacant(v) => {
                    v.insert(SpecialChest::new(def));
                }
                Entry::Occupied(_) => {
                    tracing::warn!(location = %def.location, "duplicate chest in file, keeping the first one");
                }
            }
        }

        self.chests = chests;
        tracing::info!(count = self.chests.len(), "loaded chests");
        Ok(self.chests.len())
    }

    fn read_file(&self, host: &dyn Host) -> AppResult<Vec<ChestDefinition>> {
        self.file.ensure_exists()?;
        let text = self.file.read()?;
        Ok(codec::decode(&text, host)?)
    }

    /// Writes every chest to the chest file.
    pub fn save(&self) -> AppResult<()> {
        let text = codec::encode(self.chests.values().map(SpecialChest::definition))?;
        self.file.write(&text).inspect_err(|e| {
            tracing::error!(error = %e, "failed to save chests");
        })?;
        tracing::debug!(count = self.chests.len(), "saved chests");
        Ok(())
    }

    /// Inserts a chest, replacing whatever was registered at its location (including that
    /// chest's opened inventories). Returns whether a chest was replaced.
    pub fn put(&mut self, chest: impl Into<SpecialChest>) -> bool {
        let chest = chest.into();
        self.chests.insert(chest.location().clone(), chest).is_some()
    }

    pub fn remove(&mut self, location: &Location) -> Option<SpecialChest> {
        self.chests.remove(location)
    }

    pub fn get(&self, location: &Location) -> Option<&SpecialChest> {
        self.chests.get(location)
    }

    pub fn get_mut(&mut self, location: &Location) -> Option<&mut SpecialChest> {
        self.chests.get_mut(location)
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.chests.contains_key(location)
    }

    pub fn values(&self) -> impl Iterator<Item = &SpecialChest> {
        self.chests.values()
    }

    pub fn len(&self) -> usize {
        self.chests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chests.is_empty()
    }

    /// Locations of the chests matched by `selector`, in registry order.
    pub fn select(&self, selector: &ChestSelector) -> Vec<Location> {
        match selector {
            ChestSelector::At(loc) => self.chests.get_key_value(loc).map(|(k, _)| k.clone()).into_iter().collect(),
            ChestSelector::Groups(groups) => self
                .chests
                .values()
                .filter(|c| c.is_in_any_group(groups.as_slice()))
                .map(|c| c.location().clone())
                .collect(),
        }
    }
}
