use std::cell::RefCell;
use std::rc::Rc;

/// Number of slots in a single chest inventory (3 rows x 9 columns).
pub const CHEST_SLOT_COUNT: usize = 27;

/// A stack of a single item kind inside an inventory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Host item key (eg: "minecraft:diamond")
    pub item: String,
    /// Stack size, never zero for a stored stack
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

/// Container contents as presented to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Window title, `None` uses the host default ("Chest")
    pub title: Option<String>,
    slots: Vec<Option<ItemStack>>,
}

/// Shared handle to a materialized inventory. The host mutates the contents while the
/// player moves items around; the chest cache keeps seeing the same container.
pub type InventoryHandle = Rc<RefCell<Inventory>>;

impl Inventory {
    pub fn chest(title: Option<String>) -> Self {
        Self {
            title,
            slots: vec![None; CHEST_SLOT_COUNT],
        }
    }

    pub fn into_handle(self) -> InventoryHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Puts a stack into the given slot, returning whatever was there.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        let stack = stack.filter(|s| s.count > 0);
        match self.slots.get_mut(slot) {
            Some(s) => std::mem::replace(s, stack),
            None => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    pub fn contents(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}
