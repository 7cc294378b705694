//! Telegram bot.
//!
//! The bot is a thin transport: every message that carries a known command is
//! handed to the [`engine::Engine`] and the produced text is sent back.

use std::sync::Arc;

use engine::Engine;
use teloxide::prelude::*;

mod commands;
mod handlers;

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    engine: Arc<Engine>,
    strict_persistence: bool,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    strict_persistence: bool,
    engine: Arc<Engine>,
}

impl Bot {
    pub fn new(
        token: &str,
        allowed_users: Option<Vec<UserId>>,
        strict_persistence: bool,
        engine: Arc<Engine>,
    ) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("telegram token is empty".to_string());
        }

        Ok(Self {
            token: token.to_string(),
            allowed_users,
            strict_persistence,
            engine,
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot.set_my_commands(commands::bot_commands()).await {
            tracing::warn!("failed to register the command menu: {err}");
        }

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            engine: self.engine.clone(),
            strict_persistence: self.strict_persistence,
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    strict_persistence: bool,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn allowed_users(mut self, allowed_users: Vec<UserId>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users);
        }
        self
    }

    /// Report failed writes to the user instead of confirming the command.
    pub fn strict_persistence(mut self, strict: bool) -> BotBuilder {
        self.strict_persistence = strict;
        self
    }

    pub fn build(self, engine: Arc<Engine>) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        Bot::new(
            &self.token,
            self.allowed_users,
            self.strict_persistence,
            engine,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_means_everyone() {
        let builder = Bot::builder().allowed_users(Vec::new());
        assert_eq!(builder.allowed_users, None);
    }

    #[test]
    fn allow_list_is_kept() {
        let builder = Bot::builder().allowed_users(vec![UserId(7)]);
        assert_eq!(builder.allowed_users, Some(vec![UserId(7)]));
    }

    #[test]
    fn empty_token_is_rejected() {
        let engine = Arc::new(Engine::builder().build());
        assert!(Bot::builder().token("  ").build(engine).is_err());
    }
}
