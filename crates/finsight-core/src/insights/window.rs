//! Calendar month windows
//!
//! "Now" is always passed in; nothing here reads the system clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bounds and day counts of a calendar month relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    /// First day of the month (inclusive)
    pub start: NaiveDate,
    /// Last day of the month (inclusive)
    pub end: NaiveDate,
    /// 1-based day of month of the reference date, so never 0
    pub days_elapsed: u32,
    pub days_in_month: u32,
    pub days_remaining: u32,
}

impl MonthWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `YYYY-MM` key of this month
    pub fn key(&self) -> String {
        month_key(self.start)
    }
}

/// Window for the month containing `now`
pub fn current_month_window(now: NaiveDate) -> MonthWindow {
    let end = last_of_month(now);
    let days_in_month = end.day();
    let days_elapsed = now.day();

    MonthWindow {
        start: first_of_month(now),
        end,
        days_elapsed,
        days_in_month,
        days_remaining: days_in_month - days_elapsed,
    }
}

/// Window for the full calendar month before `now`'s month.
///
/// A finished month counts every day as elapsed.
pub fn previous_month_window(now: NaiveDate) -> MonthWindow {
    let end = first_of_month(now)
        .pred_opt()
        .expect("Day before a month start is valid");
    let start = first_of_month(end);
    let days_in_month = end.day();

    MonthWindow {
        start,
        end,
        days_elapsed: days_in_month,
        days_in_month,
        days_remaining: 0,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("Day 1 always valid")
}

/// Day before the first of the next month
fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .expect("First of next month is valid")
}

/// `YYYY-MM` key used to bucket transactions by month
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_day_counts_as_elapsed() {
        let w = current_month_window(date(2026, 3, 1));
        assert_eq!(w.days_elapsed, 1);
        assert_eq!(w.days_in_month, 31);
        assert_eq!(w.days_remaining, 30);
        assert_eq!(w.start, date(2026, 3, 1));
        assert_eq!(w.end, date(2026, 3, 31));
    }

    #[test]
    fn test_last_day_has_nothing_remaining() {
        let w = current_month_window(date(2026, 4, 30));
        assert_eq!(w.days_elapsed, 30);
        assert_eq!(w.days_in_month, 30);
        assert_eq!(w.days_remaining, 0);
    }

    #[test]
    fn test_february_leap_years() {
        assert_eq!(current_month_window(date(2024, 2, 10)).days_in_month, 29);
        assert_eq!(current_month_window(date(2026, 2, 10)).days_in_month, 28);
        assert_eq!(current_month_window(date(2000, 2, 1)).days_in_month, 29);
        assert_eq!(current_month_window(date(1900, 2, 1)).days_in_month, 28);
    }

    #[test]
    fn test_december_ends_on_the_31st() {
        let w = current_month_window(date(2026, 12, 5));
        assert_eq!(w.start, date(2026, 12, 1));
        assert_eq!(w.end, date(2026, 12, 31));
        assert_eq!(w.days_remaining, 26);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let w = current_month_window(date(2026, 6, 15));
        assert!(w.contains(date(2026, 6, 1)));
        assert!(w.contains(date(2026, 6, 30)));
        assert!(!w.contains(date(2026, 5, 31)));
        assert!(!w.contains(date(2026, 7, 1)));
    }

    #[test]
    fn test_previous_month_rolls_over_year() {
        let w = previous_month_window(date(2026, 1, 10));
        assert_eq!(w.start, date(2025, 12, 1));
        assert_eq!(w.end, date(2025, 12, 31));
        assert_eq!(w.days_elapsed, 31);
        assert_eq!(w.days_remaining, 0);
        assert_eq!(w.key(), "2025-12");
    }

    #[test]
    fn test_previous_month_from_march() {
        let w = previous_month_window(date(2024, 3, 31));
        assert_eq!(w.start, date(2024, 2, 1));
        assert_eq!(w.end, date(2024, 2, 29));
        assert_eq!(w.days_in_month, 29);
    }
}
