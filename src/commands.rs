use crate::error::DomainError;
use crate::host::{CommandSender, Host};
use crate::input::parser::{Verb, parse_command};
use crate::models::types::{Location, WorldName};
use crate::plugin::{ADMIN_PERMISSION, AUTHORS, NAME, Plugin, VERSION};
use crate::renderer::translate_color_codes;
use crate::services::chests::ChestSelector;
use rand::RngCore;
use thiserror::Error;

mod add;
mod place;
mod reload;
mod remove;

/// `Ok(false)` asks the host to print the generic usage line.
pub type CommandResult = Result<bool, CommandError>;

/// Name the command is registered under.
pub const ROOT_COMMAND: &str = "chest";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("no location given and none could be derived")]
    LocationMissing,

    #[error("no special chest at {0}")]
    LocationInvalid(Location),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<clap::Error> for CommandError {
    fn from(e: clap::Error) -> Self {
        CommandError::Usage(e.to_string())
    }
}

/// Command context passed to command handlers
pub struct CmdCtx<'a> {
    /// Plugin state: configuration and chest registry
    pub plugin: &'a mut Plugin,
    /// The game server
    pub host: &'a mut dyn Host,
    /// Whoever ran the command
    pub sender: &'a mut dyn CommandSender,
    /// Randomness for probabilistic placement
    pub rng: &'a mut dyn RngCore,
}

impl CmdCtx<'_> {
    #[inline]
    fn message(&self, path: &str) -> String {
        self.plugin.message(path)
    }

    fn reply(&mut self, message: &str) {
        self.sender.send_message(message);
    }

    /// Sends `message` to the sender, or to everyone when `broadcast` is set.
    fn send_or_broadcast(&mut self, message: &str, broadcast: bool) {
        if broadcast {
            self.host.broadcast(message);
        } else {
            self.sender.send_message(message);
        }
    }

    fn world_unknown(&mut self, world: &WorldName) {
        let msg = self
            .message("message.command.error_world_unknown")
            .replace("%world%", world.as_str());
        self.reply(&msg);
    }
}

/// Runs `/chest <tokens>` for the sender in `ctx`. Returns whether the command was handled;
/// `false` makes the host show the usage line.
pub fn process_command<S: AsRef<str>>(tokens: &[S], ctx: &mut CmdCtx<'_>) -> bool {
    if !ctx.sender.has_permission(ADMIN_PERMISSION) {
        return report(ctx, None, CommandError::PermissionDenied);
    }

    let Some(intent) = parse_command(tokens) else {
        ctx.reply(&banner());
        return true;
    };

    tracing::debug!(sender = ctx.sender.name(), verb = intent.verb.as_str(), args = ?intent.args, "chest command");

    let res = match intent.verb {
        Verb::Help => {
            ctx.reply(&help_text());
            Ok(true)
        }
        Verb::Reload => reload::reload(ctx),
        Verb::Add => add::add(ctx, &intent.args),
        Verb::Place => place::place(ctx, &intent.args),
        Verb::Remove => remove::remove(ctx, &intent.args),
        Verb::Custom(_) => Ok(false),
    };

    match res {
        Ok(handled) => handled,
        Err(e) => report(ctx, Some(&intent.verb), e),
    }
}

fn report(ctx: &mut CmdCtx<'_>, verb: Option<&Verb>, err: CommandError) -> bool {
    let verb = verb.map(Verb::as_str).unwrap_or(ROOT_COMMAND);
    match err {
        CommandError::Usage(msg) => {
            tracing::debug!(verb, usage = %msg, "invalid command arguments");
            false
        }
        CommandError::PermissionDenied => {
            tracing::info!(sender = ctx.sender.name(), "chest command denied");
            let msg = ctx.message("message.command.no_permission");
            ctx.reply(&msg);
            true
        }
        CommandError::LocationMissing => {
            let msg = ctx.message(&format!("message.command.{verb}.error_location_missing"));
            ctx.reply(&msg);
            false
        }
        CommandError::LocationInvalid(_) => {
            let msg = ctx.message(&format!("message.command.{verb}.error_location_invalid"));
            ctx.reply(&msg);
            true
        }
        CommandError::Domain(DomainError::UnknownWorld(world)) => {
            ctx.world_unknown(&world);
            true
        }
        CommandError::Domain(e) => {
            tracing::error!(verb, error = %e, "chest command failed");
            ctx.reply(&translate_color_codes(&format!("&c{e}")));
            true
        }
    }
}

/// Resolves the positional location arguments:
///   (none)            the block the player looks at
///   <x> <y> <z>       in the player's world
///   <x> <y> <z> <w>   in world `w`
/// Anything else, or a form the sender cannot use (the console has no sight or world), is `None`.
pub(crate) fn resolve_location(sender: &dyn CommandSender, args: &[String]) -> Result<Option<Location>, CommandError> {
    let player = sender.player();
    match (args, player) {
        ([], Some(p)) => Ok(p.target_block.clone()),
        ([x, y, z], Some(p)) => Ok(Some(Location::new(p.world.clone(), coord(x)?, coord(y)?, coord(z)?))),
        ([x, y, z, world], _) => Ok(Some(Location::new(world.as_str(), coord(x)?, coord(y)?, coord(z)?))),
        _ => Ok(None),
    }
}

fn coord(raw: &str) -> Result<i32, CommandError> {
    let v: f64 = raw
        .parse()
        .map_err(|_| CommandError::Usage(format!("not a coordinate: {raw}")))?;
    let v = v.floor();
    if !v.is_finite() || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return Err(CommandError::Usage(format!("coordinate out of range: {raw}")));
    }
    Ok(v as i32)
}

/// One positional argument is a comma separated group list; anything else is a location
/// that must have a chest registered.
pub(crate) fn resolve_targets(ctx: &CmdCtx<'_>, args: &[String]) -> Result<Vec<Location>, CommandError> {
    let selector = match args {
        [groups] => ChestSelector::Groups(split_groups(groups)),
        _ => {
            let loc = resolve_location(&*ctx.sender, args)?.ok_or(CommandError::LocationMissing)?;
            if !ctx.plugin.chests.contains(&loc) {
                return Err(CommandError::LocationInvalid(loc));
            }
            ChestSelector::At(loc)
        }
    };
    Ok(ctx.plugin.chests.select(&selector))
}

pub(crate) fn split_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Picks the `_single` or `_multiple` variant of a count message.
pub(crate) fn count_message(ctx: &CmdCtx<'_>, prefix: &str, count: usize) -> String {
    let variant = if count == 1 { "single" } else { "multiple" };
    ctx.plugin
        .config
        .message_count(&format!("{prefix}_{variant}"), count)
}

pub fn banner() -> String {
    translate_color_codes(&format!(
        "{NAME}&7 version &b{VERSION}\n&7Created by &b{authors}\n&7Try '/{ROOT_COMMAND} help' for more information",
        authors = AUTHORS.replace(':', ", "),
    ))
}

pub fn help_text() -> String {
    translate_color_codes(&format!(
        r#"&3&lSpecial chests&r
&e/{c} add &7[options] <loot_table> [<x> <y> <z> [<world>]]
   &7-p <probability>  -n <name>  -l <lock>  -f <n|e|s|w>  -w  -g <group,...>  -B
&e/{c} place &7[--ignore-probability] [-f] [-B] (<x> <y> <z> [<world>] | <group,...>)
&e/{c} remove &7[-i] [-w] [-f] [-B] (<x> <y> <z> [<world>] | <group,...>)
   &7-i clears inventories, -w removes blocks, -f removes from the chest file
&e/{c} reload &7Reload config.yml and chests.json
&e/{c} help &7Show this help
&7Quote values with spaces: -n "Old Chest". The group "all" matches every chest."#,
        c = ROOT_COMMAND,
    ))
}
