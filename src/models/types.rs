use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)] // JSON = plain UUID string
        pub struct $name(pub uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
            #[inline]
            pub fn from_uuid(u: uuid::Uuid) -> Self {
                Self(u)
            }
            #[inline]
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = uuid::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(v: uuid::Uuid) -> Self {
                Self(v)
            }
        }
    };
}

define_id!(PlayerId);

/// Name of a world as the host knows it (eg: "world", "world_nether").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldName(pub String);

impl WorldName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for WorldName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Block position inside a world. Two locations are the same chest slot only when
/// the world and all three coordinates match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub world: WorldName,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub fn new(world: impl Into<WorldName>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ({})", self.x, self.y, self.z, self.world)
    }
}

/// Horizontal direction a chest block can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::North => "NORTH",
            Facing::East => "EAST",
            Facing::South => "SOUTH",
            Facing::West => "WEST",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Facing::North),
            "e" | "east" => Ok(Facing::East),
            "s" | "south" => Ok(Facing::South),
            "w" | "west" => Ok(Facing::West),
            _ => Err(DomainError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for Facing {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Facing> for String {
    fn from(f: Facing) -> String {
        f.as_str().to_string()
    }
}

/// Namespaced reference to a loot table owned by the host (eg: "minecraft:chests/simple_dungeon").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LootTableKey {
    pub namespace: String,
    pub name: String,
}

impl LootTableKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for LootTableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for LootTableKey {
    type Err = DomainError;

    /// Splits on the first colon only, the name part may contain further colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidLootTable(s.to_string()))?;
        if namespace.is_empty() || name.is_empty() {
            return Err(DomainError::InvalidLootTable(s.to_string()));
        }

        Ok(Self::new(namespace, name))
    }
}

impl TryFrom<String> for LootTableKey {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LootTableKey> for String {
    fn from(k: LootTableKey) -> String {
        k.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_accepts_short_and_long_names() {
        assert_eq!("n".parse::<Facing>().unwrap(), Facing::North);
        assert_eq!("EAST".parse::<Facing>().unwrap(), Facing::East);
        assert_eq!("South".parse::<Facing>().unwrap(), Facing::South);
        assert_eq!("w".parse::<Facing>().unwrap(), Facing::West);
        assert!("up".parse::<Facing>().is_err());
    }

    #[test]
    fn loot_table_key_splits_on_first_colon() {
        let key: LootTableKey = "minecraft:chests/simple_dungeon".parse().unwrap();
        assert_eq!(key.namespace, "minecraft");
        assert_eq!(key.name, "chests/simple_dungeon");

        let key: LootTableKey = "custom:a:b".parse().unwrap();
        assert_eq!(key.namespace, "custom");
        assert_eq!(key.name, "a:b");
        assert_eq!(key.to_string(), "custom:a:b");
    }

    #[test]
    fn loot_table_key_rejects_missing_parts() {
        assert!("chests/simple_dungeon".parse::<LootTableKey>().is_err());
        assert!(":name".parse::<LootTableKey>().is_err());
        assert!("ns:".parse::<LootTableKey>().is_err());
    }

    #[test]
    fn locations_compare_on_all_fields() {
        let a = Location::new("world", 10, 64, 10);
        assert_eq!(a, Location::new("world", 10, 64, 10));
        assert_ne!(a, Location::new("world_nether", 10, 64, 10));
        assert_ne!(a, Location::new("world", 10, 65, 10));
    }
}
