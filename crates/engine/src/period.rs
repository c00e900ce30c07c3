//! Date bucketing for the `day` / `week` / `month` periods.
//!
//! Dates are plain calendar days (`NaiveDate`) written as zero-padded
//! `YYYY-MM-DD`. A [`PeriodWindow`] is the `(start, end)` pair a period
//! resolves to; with the default [`MONTH_END`] policy every window is
//! half-open (`start <= date < end`).

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, WindowBounds};

const ISO_DATE: &str = "%Y-%m-%d";

/// How the end of a `month` window is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthEnd {
    /// First day of the following month, exclusive. Matches `day` and `week`.
    NextMonthStart,
    /// Last day of the same month, inclusive.
    LastDay,
}

/// Month-end policy used by [`Period::resolve`].
pub const MONTH_END: MonthEnd = MonthEnd::NextMonthStart;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Resolves the window containing `anchor` using the [`MONTH_END`] policy.
    pub fn resolve(self, anchor: NaiveDate) -> ResultEngine<PeriodWindow> {
        self.resolve_with(anchor, MONTH_END)
    }

    /// Resolves the window containing `anchor` with an explicit month-end
    /// policy. `month_end` is ignored for `day` and `week`.
    pub fn resolve_with(self, anchor: NaiveDate, month_end: MonthEnd) -> ResultEngine<PeriodWindow> {
        let (start, end, bounds) = match self {
            Self::Day => (anchor, add_days(anchor, 1)?, WindowBounds::HalfOpen),
            Self::Week => {
                let back = u64::from(anchor.weekday().num_days_from_monday());
                let start = anchor
                    .checked_sub_days(Days::new(back))
                    .ok_or_else(|| out_of_range(anchor))?;
                (start, add_days(start, 7)?, WindowBounds::HalfOpen)
            }
            Self::Month => {
                let start = anchor.with_day(1).ok_or_else(|| out_of_range(anchor))?;
                let next_month = next_month_start(start)?;
                match month_end {
                    MonthEnd::NextMonthStart => (start, next_month, WindowBounds::HalfOpen),
                    MonthEnd::LastDay => {
                        let last = next_month.pred_opt().ok_or_else(|| out_of_range(anchor))?;
                        (start, last, WindowBounds::Closed)
                    }
                }
            }
        };
        Ok(PeriodWindow { start, end, bounds })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(EngineError::InvalidPeriod(format!(
                "\"{other}\" is not one of day, week, month"
            ))),
        }
    }
}

/// Date range produced by resolving a [`Period`] at an anchor date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `Closed` only for the [`MonthEnd::LastDay`] month variant.
    pub bounds: WindowBounds,
}

impl PeriodWindow {
    pub fn start_str(&self) -> String {
        format_iso_date(self.start)
    }

    pub fn end_str(&self) -> String {
        format_iso_date(self.end)
    }
}

/// Parses the period keyword, then resolves it at `anchor`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use engine::resolve_period;
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let window = resolve_period(anchor, "week").unwrap();
/// assert_eq!(window.start_str(), "2024-03-11");
/// assert_eq!(window.end_str(), "2024-03-18");
/// ```
pub fn resolve_period(anchor: NaiveDate, period: &str) -> ResultEngine<PeriodWindow> {
    Period::try_from(period)?.resolve(anchor)
}

/// Parses a zero-padded `YYYY-MM-DD` date.
///
/// Anything that does not render back to the exact input (`2024-3-5`,
/// trailing time, whitespace) is rejected.
pub fn parse_iso_date(value: &str) -> ResultEngine<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, ISO_DATE)
        .map_err(|_| EngineError::DateParse(format!("\"{value}\" is not YYYY-MM-DD")))?;
    if format_iso_date(date) != value {
        return Err(EngineError::DateParse(format!(
            "\"{value}\" is not zero-padded YYYY-MM-DD"
        )));
    }
    Ok(date)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

fn add_days(date: NaiveDate, days: u64) -> ResultEngine<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| out_of_range(date))
}

fn next_month_start(first_of_month: NaiveDate) -> ResultEngine<NaiveDate> {
    let (year, month) = match first_of_month.month() {
        12 => (first_of_month.year() + 1, 1),
        month => (first_of_month.year(), month + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| out_of_range(first_of_month))
}

fn out_of_range(date: NaiveDate) -> EngineError {
    EngineError::DateParse(format!("{date} is outside the supported calendar"))
}
