use crate::commands::{CmdCtx, CommandError, CommandResult, resolve_location};
use crate::models::chest::ChestDefinition;
use crate::models::types::{Facing, LootTableKey};
use clap::Parser;

/// add [options] <loot_table> [<x> <y> <z> [<world>]]
#[derive(Debug, Parser)]
#[command(
    name = "add",
    no_binary_name = true,
    disable_help_flag = true,
    allow_negative_numbers = true
)]
struct AddArgs {
    /// Finite number; 0 or less never places, 1 or more always does
    #[arg(short, long, value_parser = parse_probability)]
    probability: Option<f64>,

    /// Display name, `&` color codes allowed
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    lock: Option<String>,

    /// n, north, e, east, s, south, w, west
    #[arg(short, long, value_parser = parse_facing)]
    facing: Option<Facing>,

    #[arg(short, long)]
    waterlogged: bool,

    /// Comma separated
    #[arg(short, long)]
    groups: Option<String>,

    #[arg(short = 'B', long)]
    broadcast: bool,

    loot_table: String,

    location: Vec<String>,
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let p: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if p.is_finite() {
        Ok(p)
    } else {
        Err(format!("probability must be a finite number, got {raw}"))
    }
}

fn parse_facing(raw: &str) -> Result<Facing, String> {
    raw.parse::<Facing>().map_err(|e| e.to_string())
}

pub fn add(ctx: &mut CmdCtx<'_>, args: &[String]) -> CommandResult {
    let args = AddArgs::try_parse_from(args)?;

    let loot_table = match args.loot_table.parse::<LootTableKey>() {
        Ok(key) if ctx.host.has_loot_table(&key) => key,
        _ => {
            let msg = ctx.message("message.command.add.error_loot_table_unknown");
            ctx.reply(&msg);
            return Ok(true);
        }
    };

    let location = resolve_location(&*ctx.sender, &args.location)?.ok_or(CommandError::LocationMissing)?;
    if !ctx.host.has_world(&location.world) {
        ctx.world_unknown(&location.world);
        return Ok(true);
    }

    let mut chest = ChestDefinition::builder(location, loot_table).waterlogged(args.waterlogged);
    if let Some(p) = args.probability {
        chest = chest.probability(p);
    }
    if let Some(name) = args.name {
        chest = chest.custom_name(name);
    }
    if let Some(lock) = args.lock {
        chest = chest.lock(lock);
    }
    if let Some(facing) = args.facing {
        chest = chest.facing(facing);
    }
    if let Some(groups) = args.groups.as_deref() {
        chest = chest.groups(super::split_groups(groups));
    }
    let chest = chest.build();

    tracing::info!(location = %chest.location, loot_table = %chest.loot_table, "adding special chest");
    let overwriting = ctx.plugin.chests.put(chest);

    if ctx.plugin.chests.save().is_err() {
        let msg = ctx.message("message.command.add.error_file_write");
        ctx.reply(&msg);
    }

    let msg = ctx.message(if overwriting {
        "message.command.add.success_change"
    } else {
        "message.command.add.success_new"
    });
    ctx.send_or_broadcast(&msg, args.broadcast);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<AddArgs, clap::Error> {
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        AddArgs::try_parse_from(tokens)
    }

    #[test]
    fn short_and_long_options() {
        let a = parse("-p 0.25 --name Old -l key -f n -w -g a,b -B minecraft:x 1 2 3 world").unwrap();
        assert_eq!(a.probability, Some(0.25));
        assert_eq!(a.name.as_deref(), Some("Old"));
        assert_eq!(a.lock.as_deref(), Some("key"));
        assert_eq!(a.facing, Some(Facing::North));
        assert!(a.waterlogged);
        assert_eq!(a.groups.as_deref(), Some("a,b"));
        assert!(a.broadcast);
        assert_eq!(a.loot_table, "minecraft:x");
        assert_eq!(a.location, vec!["1", "2", "3", "world"]);
    }

    #[test]
    fn negative_coordinates_are_positionals() {
        let a = parse("minecraft:x -10 64 -3").unwrap();
        assert_eq!(a.location, vec!["-10", "64", "-3"]);
        assert!(!a.waterlogged);
    }

    #[test]
    fn loot_table_is_required() {
        assert!(parse("-w").is_err());
    }

    #[test]
    fn probability_must_be_finite() {
        assert!(parse("-p inf minecraft:x").is_err());
        assert!(parse("-p -inf minecraft:x").is_err());
        assert!(parse("-p NaN minecraft:x").is_err());
        assert!(parse("-p 1e400 minecraft:x").is_err());
        assert_eq!(parse("-p -0.5 minecraft:x").unwrap().probability, Some(-0.5));
        assert_eq!(parse("-p 2 minecraft:x").unwrap().probability, Some(2.0));
    }

    #[test]
    fn invalid_facing_is_rejected() {
        assert!(parse("-f up minecraft:x").is_err());
    }
}
