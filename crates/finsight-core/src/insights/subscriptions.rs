//! Recurring charge detection
//!
//! A merchant billing the same amount again and again is treated as a
//! subscription. Only subscriptions still active as of `now` are reported,
//! with their yearly cost so forgotten ones stand out.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::SubscriptionConfig;
use crate::models::Transaction;

use super::types::RecurringCharge;

const MONTHS_PER_YEAR: i64 = 12;

/// Charges sharing a merchant and an amount
struct ChargeGroup<'a> {
    merchant: &'a str,
    count: usize,
    first: NaiveDate,
    last: NaiveDate,
}

/// Detector for active recurring charges
pub struct SubscriptionDetector {
    config: SubscriptionConfig,
}

impl SubscriptionDetector {
    pub fn new() -> Self {
        Self::with_config(SubscriptionConfig::default())
    }

    pub fn with_config(config: SubscriptionConfig) -> Self {
        Self { config }
    }

    /// Active recurring charges as of `now`, most expensive per year first.
    ///
    /// Merchants match case-insensitively and amounts to the cent. Charges
    /// dated after `now` are ignored.
    pub fn detect(&self, transactions: &[Transaction], now: NaiveDate) -> Vec<RecurringCharge> {
        let mut groups: BTreeMap<(String, i64), ChargeGroup<'_>> = BTreeMap::new();

        for tx in transactions
            .iter()
            .filter(|t| t.is_expense() && t.occurred_on <= now)
        {
            let Some(merchant) = tx.merchant.as_deref().map(str::trim) else {
                continue;
            };
            if merchant.is_empty() {
                continue;
            }

            let group = groups
                .entry((merchant.to_lowercase(), to_cents(tx.amount)))
                .or_insert(ChargeGroup {
                    merchant,
                    count: 0,
                    first: tx.occurred_on,
                    last: tx.occurred_on,
                });
            group.count += 1;
            group.first = group.first.min(tx.occurred_on);
            group.last = group.last.max(tx.occurred_on);
        }

        let mut charges: Vec<RecurringCharge> = groups
            .into_iter()
            .filter(|(_, group)| group.count >= self.config.min_occurrences)
            .filter_map(|((_, cents), group)| {
                let days_since_last = (now - group.last).num_days();
                if days_since_last >= self.config.active_within_days {
                    return None;
                }

                Some(RecurringCharge {
                    merchant: group.merchant.to_string(),
                    amount: cents as f64 / 100.0,
                    frequency: group.count,
                    annual_cost: (cents * MONTHS_PER_YEAR) as f64 / 100.0,
                    first_charged: group.first,
                    last_charged: group.last,
                    days_since_last,
                })
            })
            .collect();

        charges.sort_by(|a, b| {
            b.annual_cost
                .partial_cmp(&a.annual_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.merchant.cmp(&b.merchant))
        });

        tracing::debug!(active = charges.len(), "Subscription detection complete");
        charges
    }
}

impl Default for SubscriptionDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
