//! The persisted document and the records it holds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::MoneyCents;

/// Identifier of the user who submitted a record.
///
/// Opaque to the engine: Telegram ids are numeric, but documents edited by
/// hand may carry strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(u64),
    Name(String),
}

impl From<u64> for UserRef {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for UserRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRef::Id(id) => write!(f, "{id}"),
            UserRef::Name(name) => f.write_str(name),
        }
    }
}

/// A single expense or income line of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub user_id: UserRef,
    pub amount: MoneyCents,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// The savings target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub amount: MoneyCents,
}

/// Which ledger collection a record goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
}

impl RecordKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }
}

/// Root persisted object.
///
/// Missing or `null` collections load as empty ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub expenses: Vec<Record>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub incomes: Vec<Record>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub saving_goals: Vec<Goal>,
}

impl Document {
    #[must_use]
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Expense => &self.expenses,
            RecordKind::Income => &self.incomes,
        }
    }

    pub fn push(&mut self, kind: RecordKind, record: Record) {
        match kind {
            RecordKind::Expense => self.expenses.push(record),
            RecordKind::Income => self.incomes.push(record),
        }
    }

    /// The active goal: only the first entry counts.
    #[must_use]
    pub fn goal(&self) -> Option<Goal> {
        self.saving_goals.first().copied()
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.saving_goals = vec![goal];
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn missing_and_null_collections_are_empty() {
        let doc: Document = serde_json::from_str(r#"{"expenses": null}"#).unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn reads_records_written_by_other_tools() {
        let raw = r#"{
            "expenses": [
                {"user_id": 42, "amount": 12.5, "description": "bar caffè", "date": "2024-01-15T10:30:00.000Z"}
            ],
            "incomes": [
                {"user_id": "alice", "amount": "1000", "description": "salary", "date": "2024-01-01T00:00:00Z"}
            ],
            "savingGoals": [{"amount": 100}]
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();

        assert_eq!(doc.expenses[0].user_id, UserRef::Id(42));
        assert_eq!(doc.expenses[0].amount.cents(), 1250);
        assert_eq!(
            doc.expenses[0].date,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
        assert_eq!(doc.incomes[0].user_id, UserRef::Name("alice".to_string()));
        assert_eq!(doc.incomes[0].amount.cents(), 100_000);
        assert_eq!(doc.goal().map(|g| g.amount.cents()), Some(10_000));
    }

    #[test]
    fn writes_camel_case_goals() {
        let mut doc = Document::default();
        doc.set_goal(Goal {
            amount: MoneyCents::new(500),
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["savingGoals"][0]["amount"], 5.0);
        assert!(json["expenses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn set_goal_replaces_previous() {
        let mut doc = Document::default();
        doc.set_goal(Goal {
            amount: MoneyCents::new(100),
        });
        doc.set_goal(Goal {
            amount: MoneyCents::new(200),
        });
        assert_eq!(doc.saving_goals.len(), 1);
        assert_eq!(doc.goal().map(|g| g.amount.cents()), Some(200));
    }
}
