//! Personal finance ledger.
//!
//! The whole state is one [`Document`] kept in a [`Store`]. Every operation
//! loads it, optionally mutates it in memory, and writes it back. The
//! [`Engine`] serializes those cycles so that overlapping commands cannot
//! lose each other's updates.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;

pub use commands::{Command, confirmation, parse_command};
pub use document::{Document, Goal, Record, RecordKind, UserRef};
pub use error::{EngineError, FormatError, StoreError};
pub use money::MoneyCents;
pub use parsing::{AmountNote, DateRange};
pub use report::{GoalProgress, PeriodTotals, Summary};
pub use store::{JsonFileStore, MemoryStore, Store};

mod commands;
mod document;
mod error;
mod money;
pub mod parsing;
pub mod report;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    store: Mutex<Box<dyn Store>>,
    timezone: Tz,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Current document. A failed read is logged and yields an empty one.
    pub async fn document(&self) -> Document {
        let store = self.store.lock().await;
        load_or_empty(&**store)
    }

    /// Runs `f` on the stored document and writes the result back, holding
    /// the writer lock for the whole cycle.
    async fn modify<T>(&self, f: impl FnOnce(&mut Document) -> T) -> ResultEngine<T> {
        let store = self.store.lock().await;
        let mut document = load_or_empty(&**store);
        let out = f(&mut document);
        save(&**store, &document)?;
        Ok(out)
    }

    /// Appends an expense or income parsed from `<amount> <description...>`.
    pub async fn record(
        &self,
        kind: RecordKind,
        user_id: UserRef,
        args: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Record> {
        let usage = match kind {
            RecordKind::Expense => Command::Expense.usage(),
            RecordKind::Income => Command::Income.usage(),
        };
        let AmountNote {
            amount,
            description,
        } = parsing::parse_amount_and_description(args, usage)?;

        let record = Record {
            user_id,
            amount,
            description,
            date: now,
        };

        self.modify(|doc| doc.push(kind, record.clone())).await?;
        tracing::debug!(
            "recorded {} of {} for user {}",
            kind.name(),
            record.amount,
            record.user_id
        );
        Ok(record)
    }

    pub async fn record_expense(
        &self,
        user_id: UserRef,
        args: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Record> {
        self.record(RecordKind::Expense, user_id, args, now).await
    }

    pub async fn record_income(
        &self,
        user_id: UserRef,
        args: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Record> {
        self.record(RecordKind::Income, user_id, args, now).await
    }

    /// Clears all collections. The previous content is not read.
    pub async fn reset(&self) -> ResultEngine<()> {
        let store = self.store.lock().await;
        save(&**store, &Document::default())?;
        Ok(())
    }

    /// Replaces the active goal with the one parsed from `<amount>`.
    pub async fn set_goal(&self, args: &str) -> ResultEngine<Goal> {
        let goal = Goal {
            amount: parsing::parse_amount(args)?,
        };
        self.modify(|doc| doc.set_goal(goal)).await?;
        Ok(goal)
    }

    pub async fn summary(&self) -> Summary {
        Summary::of(&self.document().await)
    }

    pub async fn goal_progress(&self) -> GoalProgress {
        GoalProgress::of(&self.document().await)
    }

    /// Totals for the `<start-date> <end-date>` range in `args`.
    pub async fn period_totals(&self, args: &str) -> ResultEngine<PeriodTotals> {
        let range = parsing::parse_date_range(args, self.timezone)?;
        Ok(PeriodTotals::of(&self.document().await, range))
    }

    pub async fn full_report(&self) -> String {
        report::render_full(&self.document().await, self.timezone)
    }

    pub async fn goal_report(&self) -> String {
        report::render_goal(&self.goal_progress().await)
    }

    pub async fn statistics(&self, args: &str) -> ResultEngine<String> {
        Ok(report::render_period(&self.period_totals(args).await?))
    }

    /// Runs `command` with its raw argument text and returns the reply.
    ///
    /// `now` stamps any record created by the command.
    pub async fn execute(
        &self,
        user_id: UserRef,
        command: Command,
        args: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<String> {
        let reply = match command {
            Command::Start => commands::welcome_text().to_string(),
            Command::Help => commands::help_text(),
            Command::Expense => {
                self.record_expense(user_id, args, now).await?;
                commands::record_added(RecordKind::Expense)
            }
            Command::Income => {
                self.record_income(user_id, args, now).await?;
                commands::record_added(RecordKind::Income)
            }
            Command::Report => self.full_report().await,
            Command::Reset => {
                self.reset().await?;
                commands::reset_done()
            }
            Command::Goal => commands::goal_set(self.set_goal(args).await?),
            Command::GoalReport => self.goal_report().await,
            Command::Statistics => self.statistics(args).await?,
        };
        Ok(reply)
    }
}

fn load_or_empty(store: &dyn Store) -> Document {
    match store.load() {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!("failed to load document, using an empty one: {err}");
            Document::default()
        }
    }
}

fn save(store: &dyn Store, document: &Document) -> Result<(), StoreError> {
    store.save(document).inspect_err(|err| {
        tracing::error!("failed to save document: {err}");
    })
}

/// Builder for [`Engine`].
///
/// Without an explicit store the engine keeps the document in memory; the
/// default time zone is UTC.
#[derive(Debug)]
pub struct EngineBuilder {
    store: Box<dyn Store>,
    timezone: Tz,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            store: Box::new(MemoryStore::default()),
            timezone: Tz::UTC,
        }
    }
}

impl EngineBuilder {
    /// Pass the store holding the document.
    pub fn store(mut self, store: impl Store + 'static) -> EngineBuilder {
        self.store = Box::new(store);
        self
    }

    /// Reference time zone for `/statistics` days and report timestamps.
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = timezone;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            store: Mutex::new(self.store),
            timezone: self.timezone,
        }
    }
}
