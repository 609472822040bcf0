use crate::models::types::Facing;

/// Shape of a chest block. Special chests are always placed as `Single`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChestKind {
    #[default]
    Single,
    Left,
    Right,
}

/// Block state of a placed chest, including its tile entity data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChestBlock {
    pub kind: ChestKind,
    /// `None` leaves the direction to the host
    pub facing: Option<Facing>,
    pub waterlogged: bool,
    pub custom_name: Option<String>,
    pub lock: Option<String>,
}

/// The parts of a block the plugin cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockState {
    Air,
    Water,
    Chest(ChestBlock),
    /// Anything else, keyed by the host's material name
    Other(String),
}

impl BlockState {
    /// Only air counts as empty; water and every solid block occupy the space.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, BlockState::Air)
    }

    #[inline]
    pub fn is_chest(&self) -> bool {
        matches!(self, BlockState::Chest(_))
    }

    pub fn as_chest(&self) -> Option<&ChestBlock> {
        match self {
            BlockState::Chest(c) => Some(c),
            _ => None,
        }
    }

    pub fn material(&self) -> &str {
        match self {
            BlockState::Air => "air",
            BlockState::Water => "water",
            BlockState::Chest(_) => "chest",
            BlockState::Other(m) => m.as_str(),
        }
    }
}
