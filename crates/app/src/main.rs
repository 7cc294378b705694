use std::sync::Arc;

use chrono_tz::Tz;
use engine::{Engine, JsonFileStore, MemoryStore};
use settings::Store;
use teloxide::types::UserId;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pocketbook={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone: Tz = settings
        .app
        .timezone
        .parse()
        .map_err(|err| format!("invalid timezone {}: {err}", settings.app.timezone))?;

    let engine = Arc::new(build_engine(&settings.store, timezone));

    let Some(telegram) = settings.telegram else {
        tracing::warn!("No telegram settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found telegram settings...");
    let allowed_users = telegram.allowed_users.into_iter().map(UserId).collect();
    let bot = telegram_bot::Bot::builder()
        .token(&telegram.token)
        .allowed_users(allowed_users)
        .strict_persistence(telegram.strict_persistence)
        .build(engine)?;
    bot.run().await;

    Ok(())
}

fn build_engine(store: &Store, timezone: Tz) -> Engine {
    let builder = Engine::builder().timezone(timezone);
    match store {
        Store::Memory => {
            tracing::info!("Keeping the finance document in memory");
            builder.store(MemoryStore::default()).build()
        }
        Store::Json(path) => {
            tracing::info!("Using finance document at {path}");
            builder.store(JsonFileStore::new(path)).build()
        }
    }
}
