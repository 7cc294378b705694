//! Command menu shown by Telegram clients.

use engine::Command;
use teloxide::types::BotCommand;

/// One menu entry per engine command, in `/help` order.
pub(crate) fn bot_commands() -> Vec<BotCommand> {
    Command::ALL
        .into_iter()
        .map(|cmd| BotCommand::new(cmd.name(), cmd.description()))
        .collect()
}
