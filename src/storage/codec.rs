//! JSON schema of `chests.json`.
//!
//! The file is a pretty-printed array with one object per chest. Optional fields are only
//! written when they differ from their default so the file stays small and diffs stay readable:
//!
//! ```json
//! [
//!   {
//!     "location": { "world": "world", "x": 10, "y": 64, "z": 10 },
//!     "loot_table": "minecraft:chests/simple_dungeon",
//!     "probability": 0.5
//!   }
//! ]
//! ```

use crate::host::Host;
use crate::models::chest::ChestDefinition;
use crate::models::types::{Facing, Location, LootTableKey, WorldName};
use crate::storage::StorageError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Serialize, Deserialize)]
struct LocationRecord {
    world: String,
    #[serde(deserialize_with = "block_coord")]
    x: i32,
    #[serde(deserialize_with = "block_coord")]
    y: i32,
    #[serde(deserialize_with = "block_coord")]
    z: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChestRecord {
    location: LocationRecord,
    loot_table: String,
    #[serde(default = "default_probability")]
    probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facing: Option<Facing>,
    #[serde(default, skip_serializing_if = "is_false")]
    waterlogged: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    groups: BTreeSet<String>,
}

fn default_probability() -> f64 {
    1.0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Older files may carry fractional coordinates; they address the block they fall in.
fn block_coord<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let v = f64::deserialize(d)?.floor();
    if !v.is_finite() || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("coordinate out of range: {v}")));
    }
    Ok(v as i32)
}

impl From<&ChestDefinition> for ChestRecord {
    fn from(def: &ChestDefinition) -> Self {
        Self {
            location: LocationRecord {
                world: def.location.world.to_string(),
                x: def.location.x,
                y: def.location.y,
                z: def.location.z,
            },
            loot_table: def.loot_table.to_string(),
            probability: def.probability,
            custom_name: def.custom_name.clone(),
            lock: def.lock.clone(),
            facing: def.facing,
            waterlogged: def.waterlogged,
            groups: def.groups.clone(),
        }
    }
}

/// Serialize chest definitions into the pretty-printed file format. JSON has no
/// representation for NaN or infinity, so a non-finite probability fails the whole document.
pub fn encode<'a, I>(chests: I) -> Result<String, StorageError>
where
    I: IntoIterator<Item = &'a ChestDefinition>,
{
    let records = chests
        .into_iter()
        .map(|def| {
            if !def.probability.is_finite() {
                return Err(StorageError::Encode {
                    location: def.location.to_string(),
                    message: format!("probability {} is not a finite number", def.probability),
                });
            }
            Ok(ChestRecord::from(def))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse the file format back into chest definitions, resolving every loot table against
/// the host. An unknown loot table fails the whole document. Worlds the host does not know
/// are kept by name; operations on them fail later with `UnknownWorld`.
pub fn decode(text: &str, host: &dyn Host) -> Result<Vec<ChestDefinition>, StorageError> {
    let records: Vec<ChestRecord> = serde_json::from_str(text)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| resolve(index, record, host))
        .collect()
}

fn resolve(index: usize, record: ChestRecord, host: &dyn Host) -> Result<ChestDefinition, StorageError> {
    let loot_table: LootTableKey = record.loot_table.parse().map_err(|e| StorageError::Decode {
        index,
        message: format!("{e}"),
    })?;
    if !host.has_loot_table(&loot_table) {
        return Err(StorageError::Decode {
            index,
            message: format!("unknown loot table {loot_table}"),
        });
    }

    let world = WorldName::new(record.location.world);
    if !host.has_world(&world) {
        tracing::warn!(%world, index, "chest refers to a world that is not loaded");
    }
    let location = Location::new(world, record.location.x, record.location.y, record.location.z);

    Ok(ChestDefinition {
        location,
        loot_table,
        probability: record.probability,
        custom_name: record.custom_name,
        lock: record.lock,
        facing: record.facing,
        waterlogged: record.waterlogged,
        groups: record.groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use serde_json::{Value, json};

    fn host() -> MemoryHost {
        MemoryHost::with_worlds(["world", "world_nether"])
    }

    fn dungeon() -> LootTableKey {
        LootTableKey::new("minecraft", "chests/simple_dungeon")
    }

    #[test]
    fn minimal_chest_omits_defaults() {
        let def = ChestDefinition::builder(Location::new("world", 10, 64, 10), dungeon())
            .probability(0.5)
            .build();
        let text = encode([&def]).unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            v,
            json!([{
                "location": { "world": "world", "x": 10, "y": 64, "z": 10 },
                "loot_table": "minecraft:chests/simple_dungeon",
                "probability": 0.5
            }])
        );
    }

    #[test]
    fn full_chest_writes_every_field() {
        let def = ChestDefinition::builder(Location::new("world_nether", -3, 40, 7), dungeon())
            .custom_name("&6Gold")
            .lock("secret key")
            .facing(Facing::West)
            .waterlogged(true)
            .groups(["treasure", "nether"])
            .build();
        let v: Value = serde_json::from_str(&encode([&def]).unwrap()).unwrap();
        assert_eq!(
            v,
            json!([{
                "location": { "world": "world_nether", "x": -3, "y": 40, "z": 7 },
                "loot_table": "minecraft:chests/simple_dungeon",
                "probability": 1.0,
                "custom_name": "&6Gold",
                "lock": "secret key",
                "facing": "WEST",
                "waterlogged": true,
                "groups": ["nether", "treasure"]
            }])
        );
    }

    #[test]
    fn round_trip_keeps_optional_fields_exact() {
        let plain = ChestDefinition::builder(Location::new("world", 0, 0, 0), dungeon()).build();
        let full = ChestDefinition::builder(Location::new("world", 1, 2, 3), dungeon())
            .probability(0.25)
            .custom_name("Name with spaces")
            .lock("k")
            .facing(Facing::North)
            .waterlogged(true)
            .group("a")
            .build();
        let only_groups = ChestDefinition::builder(Location::new("world", 4, 5, 6), dungeon())
            .group("b")
            .build();

        let text = encode([&plain, &full, &only_groups]).unwrap();
        let decoded = decode(&text, &host()).unwrap();
        assert_eq!(decoded, vec![plain, full, only_groups]);
    }

    #[test]
    fn output_is_pretty_printed() {
        let def = ChestDefinition::builder(Location::new("world", 0, 0, 0), dungeon()).build();
        let text = encode([&def]).unwrap();
        assert!(text.starts_with("[\n  {\n    \"location\""));
    }

    #[test]
    fn non_finite_probability_is_not_encoded() {
        for p in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let ok = ChestDefinition::builder(Location::new("world", 0, 0, 0), dungeon()).build();
            let bad = ChestDefinition::builder(Location::new("world", 1, 2, 3), dungeon())
                .probability(p)
                .build();
            let err = encode([&ok, &bad]).unwrap_err();
            assert!(matches!(err, StorageError::Encode { .. }), "{p}: {err}");
        }
    }

    #[test]
    fn missing_probability_defaults_to_one() {
        let text = r#"[{"location":{"world":"world","x":1,"y":2,"z":3},"loot_table":"minecraft:chests/simple_dungeon"}]"#;
        let decoded = decode(text, &host()).unwrap();
        assert_eq!(decoded[0].probability, 1.0);
    }

    #[test]
    fn fractional_coordinates_are_floored() {
        let text = r#"[{"location":{"world":"world","x":1.5,"y":64.0,"z":-0.5},"loot_table":"minecraft:chests/simple_dungeon","probability":1.0}]"#;
        let decoded = decode(text, &host()).unwrap();
        assert_eq!(decoded[0].location, Location::new("world", 1, 64, -1));
    }

    #[test]
    fn facing_is_case_insensitive() {
        let text = r#"[{"location":{"world":"world","x":0,"y":0,"z":0},"loot_table":"minecraft:chests/simple_dungeon","facing":"south"}]"#;
        let decoded = decode(text, &host()).unwrap();
        assert_eq!(decoded[0].facing, Some(Facing::South));
    }

    #[test]
    fn unknown_loot_table_fails_decoding() {
        let text = r#"[{"location":{"world":"world","x":0,"y":0,"z":0},"loot_table":"custom:nothing"}]"#;
        let err = decode(text, &host()).unwrap_err();
        assert!(matches!(err, StorageError::Decode { index: 0, .. }));
    }

    #[test]
    fn loot_table_without_namespace_fails_decoding() {
        let text = r#"[{"location":{"world":"world","x":0,"y":0,"z":0},"loot_table":"chests/simple_dungeon"}]"#;
        assert!(decode(text, &host()).is_err());
    }

    #[test]
    fn unknown_world_is_kept_by_name() {
        let text = r#"[{"location":{"world":"skylands","x":0,"y":0,"z":0},"loot_table":"minecraft:chests/simple_dungeon"}]"#;
        let decoded = decode(text, &host()).unwrap();
        assert_eq!(decoded[0].location.world, WorldName::new("skylands"));
    }

    #[test]
    fn empty_document() {
        assert!(decode("[]", &host()).unwrap().is_empty());
        assert_eq!(encode(std::iter::empty()).unwrap(), "[]");
    }
}
