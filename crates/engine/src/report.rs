//! Aggregates over the ledger and their textual rendering.

use std::fmt::Write as _;

use chrono_tz::Tz;

use crate::{
    Document, MoneyCents, Record,
    money::CURRENCY_CODE,
    parsing::{DATE_FORMAT, DateRange},
};

/// Timestamp format of the line items in the full report.
pub const LINE_ITEM_FORMAT: &str = "%m/%d/%y %H:%M";

/// Totals over the whole ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub total_expenses: MoneyCents,
    pub total_incomes: MoneyCents,
}

impl Summary {
    #[must_use]
    pub fn of(document: &Document) -> Self {
        Self {
            total_expenses: total(&document.expenses),
            total_incomes: total(&document.incomes),
        }
    }

    #[must_use]
    pub fn balance(&self) -> MoneyCents {
        self.total_incomes - self.total_expenses
    }
}

/// Saving goal status.
///
/// `saved` is the gross sum of all incomes, expenses are not subtracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalProgress {
    pub saved: MoneyCents,
    pub goal: MoneyCents,
    /// Progress in hundredths of a percent (`4000` = 40.00%).
    pub basis_points: i64,
}

impl GoalProgress {
    #[must_use]
    pub fn of(document: &Document) -> Self {
        let saved = total(&document.incomes);
        let goal = document.goal().map(|g| g.amount).unwrap_or_default();

        let basis_points = if goal.is_positive() {
            // Round half away from zero on the second decimal.
            let num = i128::from(saved.cents()).abs() * 10_000;
            let den = i128::from(goal.cents());
            let rounded = (2 * num + den) / (2 * den);
            let signed = if saved.cents() < 0 { -rounded } else { rounded };
            i64::try_from(signed).unwrap_or(if signed < 0 { i64::MIN } else { i64::MAX })
        } else {
            0
        };

        Self {
            saved,
            goal,
            basis_points,
        }
    }

    /// `40.00%`
    #[must_use]
    pub fn percentage(&self) -> String {
        let sign = if self.basis_points < 0 { "-" } else { "" };
        let abs = self.basis_points.unsigned_abs();
        format!("{sign}{}.{:02}%", abs / 100, abs % 100)
    }
}

/// Totals of the records falling inside a [`DateRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodTotals {
    pub range: DateRange,
    pub total_expenses: MoneyCents,
    pub total_incomes: MoneyCents,
}

impl PeriodTotals {
    #[must_use]
    pub fn of(document: &Document, range: DateRange) -> Self {
        let in_range = |records: &[Record]| -> MoneyCents {
            records
                .iter()
                .filter(|r| range.contains(r.date))
                .map(|r| r.amount)
                .sum()
        };

        Self {
            range,
            total_expenses: in_range(&document.expenses),
            total_incomes: in_range(&document.incomes),
        }
    }
}

fn total(records: &[Record]) -> MoneyCents {
    records.iter().map(|r| r.amount).sum()
}

fn write_line_items(out: &mut String, marker: char, records: &[Record], tz: Tz) {
    for record in records {
        let _ = writeln!(
            out,
            "{marker} {}: {} ({})",
            record.amount,
            record.description,
            record.date.with_timezone(&tz).format(LINE_ITEM_FORMAT)
        );
    }
}

/// Full report: every line item in recording order, then the totals.
#[must_use]
pub fn render_full(document: &Document, tz: Tz) -> String {
    let summary = Summary::of(document);

    let mut out = String::from("📊 Financial Report:\n\n📉 Expenses:\n");
    write_line_items(&mut out, '-', &document.expenses, tz);
    out.push_str("\n📈 Income:\n");
    write_line_items(&mut out, '+', &document.incomes, tz);

    let _ = write!(
        out,
        "\n💰 Total Expenses: {}\n💸 Total Income: {}\n💵 Balance: {}",
        summary.total_expenses,
        summary.total_incomes,
        summary.balance()
    );
    out
}

#[must_use]
pub fn render_goal(progress: &GoalProgress) -> String {
    format!(
        "🎯 Saving Goal Report:\n\nTotal Saved: {} {CURRENCY_CODE}\nSaving Goal: {} {CURRENCY_CODE}\nProgress: {}",
        progress.saved.plain(),
        progress.goal.plain(),
        progress.percentage()
    )
}

/// Period statistics. Only totals are rendered, no line items.
#[must_use]
pub fn render_period(totals: &PeriodTotals) -> String {
    format!(
        "📊 Statistics from {} to {}:\n\n📉 Total Expenses: {} {CURRENCY_CODE}\n📈 Total Income: {} {CURRENCY_CODE}",
        totals.range.start_date.format(DATE_FORMAT),
        totals.range.end_date.format(DATE_FORMAT),
        totals.total_expenses.plain(),
        totals.total_incomes.plain()
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Goal, RecordKind, UserRef, parsing::parse_date_range};

    fn record(cents: i64, description: &str, y: i32, m: u32, d: u32) -> Record {
        Record {
            user_id: UserRef::Id(1),
            amount: MoneyCents::new(cents),
            description: description.to_string(),
            date: Utc.with_ymd_and_hms(y, m, d, 9, 5, 0).unwrap(),
        }
    }

    fn ledger() -> Document {
        let mut doc = Document::default();
        doc.push(RecordKind::Income, record(1000, "salary", 2024, 1, 2));
        doc.push(RecordKind::Income, record(2000, "bonus", 2024, 1, 3));
        doc.push(RecordKind::Expense, record(500, "bar caffè", 2024, 1, 4));
        doc
    }

    #[test]
    fn summary_balance_is_incomes_minus_expenses() {
        let summary = Summary::of(&ledger());
        assert_eq!(summary.total_incomes.cents(), 3000);
        assert_eq!(summary.total_expenses.cents(), 500);
        assert_eq!(summary.balance().cents(), 2500);
    }

    #[test]
    fn full_report_lists_items_in_recording_order() {
        let text = render_full(&ledger(), Tz::UTC);
        assert_eq!(
            text,
            "📊 Financial Report:\n\n\
             📉 Expenses:\n\
             - $5.00: bar caffè (01/04/24 09:05)\n\
             \n📈 Income:\n\
             + $10.00: salary (01/02/24 09:05)\n\
             + $20.00: bonus (01/03/24 09:05)\n\
             \n💰 Total Expenses: $5.00\n\
             💸 Total Income: $30.00\n\
             💵 Balance: $25.00"
        );
    }

    #[test]
    fn empty_report_has_empty_sections() {
        let text = render_full(&Document::default(), Tz::UTC);
        assert_eq!(
            text,
            "📊 Financial Report:\n\n📉 Expenses:\n\n📈 Income:\n\n\
             💰 Total Expenses: $0.00\n💸 Total Income: $0.00\n💵 Balance: $0.00"
        );
    }

    #[test]
    fn negative_balance_renders_minus_before_symbol() {
        let mut doc = Document::default();
        doc.push(RecordKind::Expense, record(123_456, "rent", 2024, 1, 1));
        assert!(render_full(&doc, Tz::UTC).ends_with("💵 Balance: -$1,234.56"));
    }

    #[test]
    fn goal_progress_without_goal_is_zero() {
        let progress = GoalProgress::of(&ledger());
        assert_eq!(progress.goal, MoneyCents::ZERO);
        assert_eq!(progress.basis_points, 0);
        assert_eq!(progress.percentage(), "0.00%");
    }

    #[test]
    fn goal_progress_counts_gross_income() {
        let mut doc = ledger();
        doc.set_goal(Goal {
            amount: MoneyCents::new(7500),
        });
        let progress = GoalProgress::of(&doc);
        // 30 saved against 75, expenses ignored.
        assert_eq!(progress.percentage(), "40.00%");
        assert_eq!(
            render_goal(&progress),
            "🎯 Saving Goal Report:\n\nTotal Saved: 30.00 USD\nSaving Goal: 75.00 USD\nProgress: 40.00%"
        );
    }

    #[test]
    fn goal_progress_rounds_to_two_decimals() {
        let mut doc = Document::default();
        doc.push(RecordKind::Income, record(100, "a", 2024, 1, 1));
        doc.set_goal(Goal {
            amount: MoneyCents::new(300),
        });
        assert_eq!(GoalProgress::of(&doc).percentage(), "33.33%");

        doc.set_goal(Goal {
            amount: MoneyCents::new(150),
        });
        assert_eq!(GoalProgress::of(&doc).percentage(), "66.67%");
    }

    #[test]
    fn negative_savings_keep_their_sign() {
        let mut doc = Document::default();
        doc.push(RecordKind::Income, record(-1, "refund", 2024, 1, 1));
        doc.set_goal(Goal {
            amount: MoneyCents::new(200),
        });
        let progress = GoalProgress::of(&doc);
        assert_eq!(progress.basis_points, -50);
        assert_eq!(progress.percentage(), "-0.50%");

        doc.set_goal(Goal {
            amount: MoneyCents::new(300),
        });
        assert_eq!(GoalProgress::of(&doc).percentage(), "-0.33%");
    }

    #[test]
    fn period_totals_only_count_records_in_range() {
        let mut doc = ledger();
        doc.push(RecordKind::Expense, record(999, "next month", 2024, 2, 1));
        let range = parse_date_range("2024-01-03 2024-01-31", Tz::UTC).unwrap();
        let totals = PeriodTotals::of(&doc, range);
        assert_eq!(totals.total_incomes.cents(), 2000);
        assert_eq!(totals.total_expenses.cents(), 500);
        assert_eq!(
            render_period(&totals),
            "📊 Statistics from 2024-01-03 to 2024-01-31:\n\n📉 Total Expenses: 5.00 USD\n📈 Total Income: 20.00 USD"
        );
    }
}
