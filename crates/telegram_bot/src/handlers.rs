use chrono::Utc;
use engine::{Command, EngineError, UserRef};
use teloxide::prelude::*;

use crate::ConfigParameters;

const SAVE_FAILED: &str = "❌ Could not save your data. Please try again later.";
const UNEXPECTED: &str = "❌ Something went wrong. Please try again later.";

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(cfg.allowed_users.as_deref(), msg.from.as_ref().map(|u| u.id)) {
        return Ok(());
    }

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let Some((command, args)) = engine::parse_command(text) else {
        tracing::debug!("ignoring message from user {}", from.id);
        return Ok(());
    };

    tracing::info!("Received {command} command from user {}", from.id);
    let result = cfg
        .engine
        .execute(UserRef::Id(from.id.0), command, args, Utc::now())
        .await;

    let reply = reply_text(command, args, result, cfg.strict_persistence);
    if !reply.is_empty() {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

/// Text sent back for the outcome of `command`.
///
/// A failed write on a mutating command still gets its confirmation unless
/// `strict_persistence` is set.
fn reply_text(
    command: Command,
    args: &str,
    result: Result<String, EngineError>,
    strict_persistence: bool,
) -> String {
    match result {
        Ok(reply) => reply,
        Err(EngineError::Format(err)) => err.to_string(),
        Err(EngineError::Persistence(_)) if strict_persistence => SAVE_FAILED.to_string(),
        Err(EngineError::Persistence(_)) => {
            engine::confirmation(command, args).unwrap_or_else(|| UNEXPECTED.to_string())
        }
    }
}

/// `None` allows everyone; a message without a sender is never allowed.
fn is_allowed(allowed_users: Option<&[UserId]>, from: Option<UserId>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match allowed_users {
        None => true,
        Some(ids) => ids.contains(&from),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use engine::{FormatError, StoreError};

    use super::*;

    fn write_failed() -> Result<String, EngineError> {
        Err(EngineError::Persistence(StoreError::Io(io::Error::other(
            "disk full",
        ))))
    }

    #[test]
    fn format_errors_are_shown_as_is() {
        let reply = reply_text(
            Command::Goal,
            "0",
            Err(FormatError::InvalidAmount.into()),
            false,
        );
        assert_eq!(reply, "❌ Invalid amount. Please enter a positive number.");
    }

    #[test]
    fn failed_write_is_confirmed_by_default() {
        assert_eq!(
            reply_text(Command::Expense, "5 lunch", write_failed(), false),
            "✅ Expense added!"
        );
        assert_eq!(
            reply_text(Command::Goal, "100", write_failed(), false),
            "💰 Saving goal set: 100.00 USD"
        );
    }

    #[test]
    fn failed_write_is_reported_when_strict() {
        assert_eq!(
            reply_text(Command::Reset, "", write_failed(), true),
            SAVE_FAILED
        );
    }

    #[test]
    fn failed_write_on_read_only_command_is_unexpected() {
        assert_eq!(
            reply_text(Command::Report, "", write_failed(), false),
            UNEXPECTED
        );
    }

    #[test]
    fn empty_allow_list_accepts_everyone() {
        assert!(is_allowed(None, Some(UserId(1))));
        assert!(is_allowed(None, Some(UserId(987_654_321))));
    }

    #[test]
    fn allow_list_only_accepts_listed_users() {
        let ids = [UserId(1), UserId(2)];
        assert!(is_allowed(Some(&ids), Some(UserId(2))));
        assert!(!is_allowed(Some(&ids), Some(UserId(3))));
    }

    #[test]
    fn messages_without_sender_are_ignored() {
        assert!(!is_allowed(None, None));
        assert!(!is_allowed(Some(&[UserId(1)]), None));
    }

    #[test]
    fn successful_reply_passes_through() {
        assert_eq!(
            reply_text(Command::Report, "", Ok("report".to_string()), true),
            "report"
        );
    }
}
