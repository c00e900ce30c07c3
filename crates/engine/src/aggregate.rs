//! Income / expense / balance aggregation over transaction records.
//!
//! The functions here are pure: they take records already loaded from the
//! store. The store-backed entry points (`Engine::total_income`,
//! `Engine::balance`, ...) narrow the rows in SQL and then run the same
//! functions, so both paths share one definition of what is counted.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::{
    EngineError, MoneyCents, PeriodWindow, ResultEngine, Transaction, TransactionKind,
    period::parse_iso_date,
};

/// Kinds that add to income.
pub const INCOME_KINDS: &[TransactionKind] = &[TransactionKind::Income];

/// Kinds that count as spending. Money moved into a goal leaves the
/// spendable balance, so `goal` is an expense.
pub const EXPENSE_KINDS: &[TransactionKind] = &[TransactionKind::Expense, TransactionKind::Goal];

/// Boundary policy for caller-supplied `startDate`/`endDate` windows.
pub const WINDOW_BOUNDS: WindowBounds = WindowBounds::HalfOpen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowBounds {
    /// `start <= date < end`
    HalfOpen,
    /// `start <= date <= end`
    Closed,
}

/// Date filter applied to an aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bounds: WindowBounds,
}

impl DateWindow {
    /// Builds a window with the [`WINDOW_BOUNDS`] policy.
    ///
    /// Returns `InvalidInput` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResultEngine<Self> {
        Self::with_bounds(start, end, WINDOW_BOUNDS)
    }

    pub fn with_bounds(start: NaiveDate, end: NaiveDate, bounds: WindowBounds) -> ResultEngine<Self> {
        if start > end {
            return Err(EngineError::InvalidInput(format!(
                "startDate {start} is after endDate {end}"
            )));
        }
        Ok(Self { start, end, bounds })
    }

    /// Parses both ends as `YYYY-MM-DD`.
    pub fn parse(start: &str, end: &str) -> ResultEngine<Self> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.bounds {
            WindowBounds::HalfOpen => self.start <= date && date < self.end,
            WindowBounds::Closed => self.start <= date && date <= self.end,
        }
    }
}

impl From<PeriodWindow> for DateWindow {
    fn from(window: PeriodWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
            bounds: window.bounds,
        }
    }
}

/// Sums the amounts of `user_id`'s records whose kind is in `kinds`.
///
/// With a `window`, records whose date is not a valid `YYYY-MM-DD` are
/// skipped with a warning. Without one the date is never looked at.
///
/// A total that does not fit in an `i64` is `InvalidAmount`.
pub fn sum_by_kinds(
    records: &[Transaction],
    user_id: i64,
    kinds: &[TransactionKind],
    window: Option<&DateWindow>,
) -> ResultEngine<MoneyCents> {
    records
        .iter()
        .filter(|record| record.user_id == user_id && kinds.contains(&record.kind))
        .filter(|record| window.is_none_or(|window| record_in_window(record, window)))
        .try_fold(MoneyCents::ZERO, |total, record| {
            total
                .checked_add(record.amount)
                .ok_or_else(|| overflow(user_id))
        })
}

fn overflow(user_id: i64) -> EngineError {
    EngineError::InvalidAmount(format!("total for user {user_id} overflows"))
}

/// Whether `record`'s date falls in `window`. A malformed date is logged
/// and treated as outside.
pub(crate) fn record_in_window(record: &Transaction, window: &DateWindow) -> bool {
    match parse_iso_date(&record.date) {
        Ok(date) => window.contains(date),
        Err(_) => {
            tracing::warn!(
                transaction_id = record.transaction_id,
                date = %record.date,
                "skipping transaction with malformed date"
            );
            false
        }
    }
}

/// Income minus expenses (see [`EXPENSE_KINDS`]) for `user_id`.
pub fn balance(
    records: &[Transaction],
    user_id: i64,
    window: Option<&DateWindow>,
) -> ResultEngine<MoneyCents> {
    let income = sum_by_kinds(records, user_id, INCOME_KINDS, window)?;
    let expense = sum_by_kinds(records, user_id, EXPENSE_KINDS, window)?;
    income.checked_sub(expense).ok_or_else(|| overflow(user_id))
}

/// Sorts newest first. Records with an unparseable date go last and keep
/// their relative order.
pub fn sort_newest_first(records: &mut [Transaction]) {
    records.sort_by(|a, b| {
        match (parse_iso_date(&a.date).ok(), parse_iso_date(&b.date).ok()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, user_id: i64, kind: TransactionKind, amount: i64, date: &str) -> Transaction {
        Transaction {
            transaction_id: id,
            user_id,
            category_id: 1,
            kind,
            amount: MoneyCents::new(amount),
            date: date.to_string(),
            description: String::new(),
        }
    }

    fn day(value: &str) -> NaiveDate {
        parse_iso_date(value).unwrap()
    }

    #[test]
    fn balance_counts_goal_as_expense() {
        let records = vec![
            tx(1, 1, TransactionKind::Income, 100, "2024-03-01"),
            tx(2, 1, TransactionKind::Expense, 40, "2024-03-02"),
            tx(3, 1, TransactionKind::Goal, 10, "2024-03-03"),
        ];
        assert_eq!(balance(&records, 1, None).unwrap(), MoneyCents::new(50));
        assert_eq!(
            sum_by_kinds(&records, 1, EXPENSE_KINDS, None).unwrap(),
            MoneyCents::new(50)
        );
    }

    #[test]
    fn empty_input_sums_to_zero() {
        assert_eq!(sum_by_kinds(&[], 1, INCOME_KINDS, None).unwrap(), MoneyCents::ZERO);
        assert_eq!(balance(&[], 1, None).unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn other_users_are_never_counted() {
        let records = vec![
            tx(1, 1, TransactionKind::Income, 100, "2024-03-01"),
            tx(2, 2, TransactionKind::Income, 900, "2024-03-01"),
        ];
        let window = DateWindow::parse("2024-03-01", "2024-04-01").unwrap();
        assert_eq!(
            sum_by_kinds(&records, 1, INCOME_KINDS, None).unwrap(),
            MoneyCents::new(100)
        );
        assert_eq!(
            sum_by_kinds(&records, 1, INCOME_KINDS, Some(&window)).unwrap(),
            MoneyCents::new(100)
        );
    }

    #[test]
    fn half_open_window_excludes_end_date() {
        let records = vec![
            tx(1, 1, TransactionKind::Expense, 10, "2024-03-01"),
            tx(2, 1, TransactionKind::Expense, 20, "2024-03-15"),
            tx(3, 1, TransactionKind::Expense, 40, "2024-03-31"),
        ];
        let window =
            DateWindow::with_bounds(day("2024-03-01"), day("2024-03-31"), WindowBounds::HalfOpen)
                .unwrap();
        assert_eq!(
            sum_by_kinds(&records, 1, EXPENSE_KINDS, Some(&window)).unwrap(),
            MoneyCents::new(30)
        );
    }

    #[test]
    fn closed_window_includes_both_ends() {
        let records = vec![
            tx(1, 1, TransactionKind::Expense, 10, "2024-03-01"),
            tx(2, 1, TransactionKind::Expense, 20, "2024-03-15"),
            tx(3, 1, TransactionKind::Expense, 40, "2024-03-31"),
            tx(4, 1, TransactionKind::Expense, 80, "2024-04-01"),
        ];
        let window =
            DateWindow::with_bounds(day("2024-03-01"), day("2024-03-31"), WindowBounds::Closed)
                .unwrap();
        assert_eq!(
            sum_by_kinds(&records, 1, EXPENSE_KINDS, Some(&window)).unwrap(),
            MoneyCents::new(70)
        );
    }

    #[test]
    fn malformed_dates_are_skipped_only_when_windowed() {
        let records = vec![
            tx(1, 1, TransactionKind::Income, 100, "2024-03-05"),
            tx(2, 1, TransactionKind::Income, 7, "05/03/2024"),
        ];
        let window = DateWindow::parse("2024-03-01", "2024-04-01").unwrap();
        assert_eq!(
            sum_by_kinds(&records, 1, INCOME_KINDS, Some(&window)).unwrap(),
            MoneyCents::new(100)
        );
        assert_eq!(
            sum_by_kinds(&records, 1, INCOME_KINDS, None).unwrap(),
            MoneyCents::new(107)
        );
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let records = vec![
            tx(1, 1, TransactionKind::Income, i64::MAX, "2024-03-01"),
            tx(2, 1, TransactionKind::Income, 1, "2024-03-02"),
        ];
        assert!(matches!(
            sum_by_kinds(&records, 1, INCOME_KINDS, None),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            balance(&records, 1, None),
            Err(EngineError::InvalidAmount(_))
        ));

        let records = vec![
            tx(1, 1, TransactionKind::Expense, i64::MAX, "2024-03-01"),
            tx(2, 1, TransactionKind::Goal, 0, "2024-03-02"),
        ];
        assert!(matches!(
            balance(&records, 1, None),
            Ok(total) if total == MoneyCents::new(-i64::MAX)
        ));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = DateWindow::parse("2024-04-01", "2024-03-01").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn period_window_keeps_half_open_bounds() {
        let window: DateWindow = crate::Period::Month.resolve(day("2024-02-10")).unwrap().into();
        assert_eq!(window.bounds, WindowBounds::HalfOpen);
        assert!(window.contains(day("2024-02-29")));
        assert!(!window.contains(day("2024-03-01")));
    }

    #[test]
    fn newest_first_puts_malformed_dates_last() {
        let mut records = vec![
            tx(1, 1, TransactionKind::Income, 1, "2024-01-10"),
            tx(2, 1, TransactionKind::Income, 1, "bad"),
            tx(3, 1, TransactionKind::Income, 1, "2024-03-10"),
            tx(4, 1, TransactionKind::Income, 1, ""),
            tx(5, 1, TransactionKind::Income, 1, "2024-02-10"),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<i64> = records.iter().map(|r| r.transaction_id).collect();
        assert_eq!(ids, vec![3, 5, 1, 2, 4]);
    }
}
