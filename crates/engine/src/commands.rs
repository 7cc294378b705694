//! The command surface: one variant per command a user can send.

use std::{fmt, str::FromStr};

use crate::{Goal, RecordKind, money::CURRENCY_CODE, parsing::parse_amount};

/// Commands understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Help,
    Expense,
    Income,
    Report,
    Reset,
    Goal,
    GoalReport,
    Statistics,
}

impl Command {
    /// Every command, in the order shown by `/help`.
    pub const ALL: [Command; 9] = [
        Command::Start,
        Command::Help,
        Command::Expense,
        Command::Income,
        Command::Report,
        Command::Reset,
        Command::Goal,
        Command::GoalReport,
        Command::Statistics,
    ];

    /// Command word, without the leading `/`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Expense => "expense",
            Command::Income => "income",
            Command::Report => "report",
            Command::Reset => "reset",
            Command::Goal => "goal",
            Command::GoalReport => "goalreport",
            Command::Statistics => "statistics",
        }
    }

    /// Full syntax, as shown in corrective replies.
    #[must_use]
    pub const fn usage(self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Help => "/help",
            Command::Expense => "/expense <amount> <description>",
            Command::Income => "/income <amount> <description>",
            Command::Report => "/report",
            Command::Reset => "/reset",
            Command::Goal => "/goal <amount>",
            Command::GoalReport => "/goalreport",
            Command::Statistics => "/statistics <start_date> <end_date>",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Command::Start => "Start the bot",
            Command::Help => "Show the available commands",
            Command::Expense => "Add an expense",
            Command::Income => "Add an income",
            Command::Report => "View financial report",
            Command::Reset => "Clear all data",
            Command::Goal => "Set a saving goal",
            Command::GoalReport => "View current saving goal",
            Command::Statistics => "View statistics for a given period",
        }
    }

    const fn icon(self) -> &'static str {
        match self {
            Command::Start => "👋",
            Command::Help => "❓",
            Command::Expense => "📝",
            Command::Income => "💵",
            Command::Report => "📊",
            Command::Reset => "🗑️",
            Command::Goal => "🎯",
            Command::GoalReport => "🔍",
            Command::Statistics => "🕶️",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s)
            .ok_or(())
    }
}

/// Splits `/cmd[@bot] args...` into the command and its raw arguments.
///
/// Returns `None` for text that is not a known command.
#[must_use]
pub fn parse_command(text: &str) -> Option<(Command, &str)> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix('/')?;
    let (word, args) = match rest.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (rest, ""),
    };
    let word = word.split_once('@').map_or(word, |(name, _)| name);

    word.parse().ok().map(|cmd| (cmd, args))
}

/// Reply confirming a mutating command whose write failed.
///
/// `None` for read-only commands and for arguments that do not parse.
#[must_use]
pub fn confirmation(command: Command, args: &str) -> Option<String> {
    match command {
        Command::Expense => Some(record_added(RecordKind::Expense)),
        Command::Income => Some(record_added(RecordKind::Income)),
        Command::Reset => Some(reset_done()),
        Command::Goal => parse_amount(args).ok().map(|amount| goal_set(Goal { amount })),
        _ => None,
    }
}

pub(crate) fn record_added(kind: RecordKind) -> String {
    match kind {
        RecordKind::Expense => "✅ Expense added!".to_string(),
        RecordKind::Income => "✅ Income added!".to_string(),
    }
}

pub(crate) fn reset_done() -> String {
    "✅ All expense and income information has been cleared!".to_string()
}

pub(crate) fn goal_set(goal: Goal) -> String {
    format!("💰 Saving goal set: {} {CURRENCY_CODE}", goal.amount.plain())
}

pub(crate) fn welcome_text() -> &'static str {
    "👋 Welcome to the personal finance management bot! Use /help to see available commands."
}

pub(crate) fn help_text() -> String {
    Command::ALL
        .into_iter()
        .filter(|cmd| !matches!(cmd, Command::Start | Command::Help))
        .map(|cmd| format!("{} {} - {}", cmd.icon(), cmd.usage(), cmd.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
