use crate::commands::{CmdCtx, CommandResult, count_message, resolve_targets};
use crate::error::DomainError;
use clap::Parser;

/// place [options] (<x> <y> <z> [<world>] | <groups>)
#[derive(Debug, Parser)]
#[command(
    name = "place",
    no_binary_name = true,
    disable_help_flag = true,
    allow_negative_numbers = true
)]
struct PlaceArgs {
    /// Place every chest, whatever its probability
    #[arg(long)]
    ignore_probability: bool,

    /// Replace whatever block is in the way
    #[arg(short, long)]
    force: bool,

    #[arg(short = 'B', long)]
    broadcast: bool,

    target: Vec<String>,
}

pub fn place(ctx: &mut CmdCtx<'_>, args: &[String]) -> CommandResult {
    let args = PlaceArgs::try_parse_from(args)?;
    let targets = resolve_targets(ctx, &args.target)?;

    let mut placed = 0;
    for loc in &targets {
        let Some(chest) = ctx.plugin.chests.get_mut(loc) else {
            continue;
        };
        let res = if args.ignore_probability {
            chest.place(&mut *ctx.host, args.force)
        } else {
            chest.place_with_chance(&mut *ctx.host, args.force, &mut *ctx.rng)
        };
        match res {
            Ok(true) => placed += 1,
            Ok(false) => {}
            Err(DomainError::UnknownWorld(world)) => ctx.world_unknown(&world),
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(selected = targets.len(), placed, force = args.force, "placed special chests");
    let msg = count_message(ctx, "message.command.place.success", placed);
    ctx.send_or_broadcast(&msg, args.broadcast);
    Ok(true)
}
