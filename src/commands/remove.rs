use crate::commands::{CmdCtx, CommandError, CommandResult, count_message, resolve_targets};
use crate::error::DomainError;
use clap::Parser;

/// remove [options] (<x> <y> <z> [<world>] | <groups>)
#[derive(Debug, Parser)]
#[command(
    name = "remove",
    no_binary_name = true,
    disable_help_flag = true,
    allow_negative_numbers = true
)]
struct RemoveArgs {
    /// Forget every player's generated loot
    #[arg(short, long)]
    inventory: bool,

    /// Take the chest blocks out of the world
    #[arg(short, long)]
    world: bool,

    /// Delete the chests from the chest file
    #[arg(short, long)]
    file: bool,

    #[arg(short = 'B', long)]
    broadcast: bool,

    target: Vec<String>,
}

pub fn remove(ctx: &mut CmdCtx<'_>, args: &[String]) -> CommandResult {
    let args = RemoveArgs::try_parse_from(args)?;
    if !(args.inventory || args.world || args.file) {
        return Err(CommandError::Usage("at least one of --inventory, --world, --file".into()));
    }
    let targets = resolve_targets(ctx, &args.target)?;

    if args.inventory {
        for loc in &targets {
            if let Some(chest) = ctx.plugin.chests.get_mut(loc) {
                chest.reset_inventory();
            }
        }
        let msg = count_message(ctx, "message.command.remove.success_inventory", targets.len());
        ctx.send_or_broadcast(&msg, args.broadcast);
    }

    if args.world {
        let mut removed = 0;
        for loc in &targets {
            let Some(chest) = ctx.plugin.chests.get(loc) else {
                continue;
            };
            match chest.remove(&mut *ctx.host) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(DomainError::UnknownWorld(world)) => ctx.world_unknown(&world),
                Err(e) => return Err(e.into()),
            }
        }
        let msg = count_message(ctx, "message.command.remove.success_world", removed);
        ctx.send_or_broadcast(&msg, args.broadcast);
    }

    if args.file {
        for loc in &targets {
            ctx.plugin.chests.remove(loc);
        }
        if ctx.plugin.chests.save().is_err() {
            let msg = ctx.message("message.command.remove.error_file_write");
            ctx.reply(&msg);
            return Ok(true);
        }
        let msg = count_message(ctx, "message.command.remove.success_file", targets.len());
        ctx.send_or_broadcast(&msg, args.broadcast);
    }

    tracing::info!(
        selected = targets.len(),
        inventory = args.inventory,
        world = args.world,
        file = args.file,
        "removed special chests"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_in_any_order() {
        let a = RemoveArgs::try_parse_from(["treasure", "-f", "-i"]).unwrap();
        assert!(a.inventory && a.file && !a.world);
        assert_eq!(a.target, vec!["treasure"]);
    }

    #[test]
    fn combined_short_flags() {
        let a = RemoveArgs::try_parse_from(["-iwfB", "1", "-2", "3", "world"]).unwrap();
        assert!(a.inventory && a.world && a.file && a.broadcast);
        assert_eq!(a.target, vec!["1", "-2", "3", "world"]);
    }
}
