//! Spending pattern analysis
//!
//! Secondary behavioural signals computed over the whole transaction history:
//! month-over-month trend, weekday vs weekend spend, category concentration,
//! top merchants and an impulse-spending score.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::PatternConfig;
use crate::models::Transaction;

use super::aggregator::aggregate_window;
use super::types::{Concentration, MerchantSpend, Patterns, Trend, TrendDirection};
use super::window::{current_month_window, month_key, previous_month_window};

pub struct PatternAnalyzer {
    config: PatternConfig,
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self::with_config(PatternConfig::default())
    }

    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Behavioural signals from expenses dated on or before `now`.
    ///
    /// The trend compares whole calendar months, like the dashboard totals.
    pub fn analyze(&self, transactions: &[Transaction], now: NaiveDate) -> Patterns {
        let expenses: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.is_expense() && t.occurred_on <= now)
            .collect();

        let trend = self.trend(transactions, now);
        let (weekday_avg, weekend_avg) = weekday_weekend_averages(&expenses);
        let weekend_vs_weekday_pct = if weekday_avg > 0.0 {
            (weekend_avg / weekday_avg - 1.0) * 100.0
        } else {
            0.0
        };
        let concentration_index = concentration_index(&expenses);

        let patterns = Patterns {
            trend,
            weekday_avg,
            weekend_avg,
            weekend_vs_weekday_pct,
            top_spending_day: top_spending_day(&expenses).map(|d| weekday_name(d).to_string()),
            concentration_index,
            concentration: classify_concentration(concentration_index),
            top_merchants: top_merchants(&expenses, self.config.top_merchants),
            impulse_score: self.impulse(&expenses, now),
        };

        tracing::debug!(
            expenses = expenses.len(),
            trend = patterns.trend.direction.as_str(),
            impulse = patterns.impulse_score,
            "Pattern analysis complete"
        );
        patterns
    }

    /// Current month's expenses against the previous calendar month
    pub fn trend(&self, transactions: &[Transaction], now: NaiveDate) -> Trend {
        let current = aggregate_window(transactions, &current_month_window(now)).totals.expenses;
        let previous = aggregate_window(transactions, &previous_month_window(now))
            .totals
            .expenses;

        Trend {
            direction: classify_trend(current, previous, self.config.trend_threshold_pct),
            current_month_expenses: current,
            previous_month_expenses: previous,
            change_pct: if previous > 0.0 {
                (current / previous - 1.0) * 100.0
            } else {
                0.0
            },
        }
    }

    fn impulse(&self, expenses: &[&Transaction], now: NaiveDate) -> f64 {
        if expenses.is_empty() || expenses.len() < self.config.impulse_min_transactions {
            return 0.0;
        }

        let mean = expenses.iter().map(|t| t.amount).sum::<f64>() / expenses.len() as f64;
        let threshold = mean * self.config.small_purchase_ratio;
        let small = expenses.iter().filter(|t| t.amount < threshold).count();
        let small_fraction = small as f64 / expenses.len() as f64;

        impulse_score(small_fraction, frequency_ratio(expenses, now), &self.config)
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// `Increasing`/`Decreasing` when expenses moved more than `threshold_pct`
/// percent; any spend after a zero month counts as increasing.
pub fn classify_trend(current: f64, previous: f64, threshold_pct: f64) -> TrendDirection {
    if previous <= 0.0 {
        return if current > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Stable
        };
    }

    let factor = threshold_pct / 100.0;
    if current > previous * (1.0 + factor) {
        TrendDirection::Increasing
    } else if current < previous * (1.0 - factor) {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Bounded impulse heuristic in [0, 100].
///
/// Non-decreasing in both inputs; the frequency component saturates at
/// `frequency_saturation`.
pub fn impulse_score(small_fraction: f64, frequency_ratio: f64, config: &PatternConfig) -> f64 {
    let small = small_fraction.clamp(0.0, 1.0);
    let frequency = (frequency_ratio.max(0.0) / config.frequency_saturation).min(1.0);

    let raw = 100.0 * (config.small_weight * small + config.frequency_weight * frequency);
    let score = raw.clamp(0.0, 100.0);
    (score * 10.0).round() / 10.0
}

/// This month's expense count projected to month end, relative to the mean
/// monthly count of earlier months. 1.0 when there is no earlier month.
fn frequency_ratio(expenses: &[&Transaction], now: NaiveDate) -> f64 {
    let window = current_month_window(now);
    let current_key = window.key();

    let current_count = expenses
        .iter()
        .filter(|t| window.contains(t.occurred_on))
        .count();

    let mut prior: BTreeMap<String, usize> = BTreeMap::new();
    for tx in expenses {
        let key = month_key(tx.occurred_on);
        if key < current_key {
            *prior.entry(key).or_insert(0) += 1;
        }
    }

    if prior.is_empty() {
        return 1.0;
    }

    let baseline = prior.values().sum::<usize>() as f64 / prior.len() as f64;
    let projected = current_count as f64 / f64::from(window.days_elapsed.max(1))
        * f64::from(window.days_in_month);
    projected / baseline
}

/// Average expense amount on weekdays and on weekends, 0 for an empty side
fn weekday_weekend_averages(expenses: &[&Transaction]) -> (f64, f64) {
    let (mut weekday_sum, mut weekday_n) = (0.0, 0usize);
    let (mut weekend_sum, mut weekend_n) = (0.0, 0usize);

    for tx in expenses {
        if matches!(tx.occurred_on.weekday(), Weekday::Sat | Weekday::Sun) {
            weekend_sum += tx.amount;
            weekend_n += 1;
        } else {
            weekday_sum += tx.amount;
            weekday_n += 1;
        }
    }

    let avg = |sum: f64, n: usize| if n == 0 { 0.0 } else { sum / n as f64 };
    (avg(weekday_sum, weekday_n), avg(weekend_sum, weekend_n))
}

/// Weekday with the largest total spend; earlier weekday wins ties
fn top_spending_day(expenses: &[&Transaction]) -> Option<Weekday> {
    if expenses.is_empty() {
        return None;
    }

    let mut totals = [0.0f64; 7];
    for tx in expenses {
        totals[tx.occurred_on.weekday().num_days_from_monday() as usize] += tx.amount;
    }

    let mut best = 0;
    for (i, total) in totals.iter().enumerate().skip(1) {
        if *total > totals[best] {
            best = i;
        }
    }

    Some(weekday_from_index(best))
}

fn weekday_from_index(i: usize) -> Weekday {
    match i {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Herfindahl index of category shares, scaled to 0-100
fn concentration_index(expenses: &[&Transaction]) -> f64 {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in expenses {
        *by_category.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
    }

    let total: f64 = by_category.values().sum();
    if total <= 0.0 {
        return 0.0;
    }

    by_category
        .values()
        .map(|amount| (amount / total).powi(2))
        .sum::<f64>()
        * 100.0
}

fn classify_concentration(index: f64) -> Concentration {
    if index > 25.0 {
        Concentration::HighlyConcentrated
    } else if index > 15.0 {
        Concentration::ModeratelyConcentrated
    } else {
        Concentration::Diversified
    }
}

fn top_merchants(expenses: &[&Transaction], limit: usize) -> Vec<MerchantSpend> {
    let mut by_merchant: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for tx in expenses {
        let Some(merchant) = tx.merchant.as_deref().map(str::trim) else {
            continue;
        };
        if merchant.is_empty() {
            continue;
        }
        let entry = by_merchant.entry(merchant).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += tx.amount;
    }

    let mut merchants: Vec<MerchantSpend> = by_merchant
        .into_iter()
        .map(|(merchant, (visits, total_spent))| MerchantSpend {
            merchant: merchant.to_string(),
            visits,
            total_spent,
        })
        .collect();

    merchants.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    merchants.truncate(limit);
    merchants
}
