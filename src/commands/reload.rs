use crate::commands::{CmdCtx, CommandResult};
use crate::error::DomainError;

pub fn reload(ctx: &mut CmdCtx<'_>) -> CommandResult {
    let key = match ctx.plugin.reload(&*ctx.host) {
        Ok(count) => {
            tracing::info!(chests = count, "reloaded");
            "message.command.reload.success"
        }
        // Config is read first; when it fails the chest file is not touched
        Err(e @ DomainError::Infra(_)) => {
            tracing::error!(error = %e, "reload failed");
            "message.command.reload.error_config"
        }
        Err(e) => {
            tracing::error!(error = %e, "reload failed");
            "message.command.reload.error"
        }
    };
    let msg = ctx.message(key);
    ctx.reply(&msg);
    Ok(true)
}
