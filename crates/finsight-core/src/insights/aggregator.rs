//! Transaction aggregation
//!
//! Reduces a transaction snapshot into per-kind totals and an expense
//! breakdown by category for a date window.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::SavingsConfig;
use crate::models::{Transaction, TransactionKind};

use super::types::{CategoryAmount, MonthlySummary, SavingsRating, SavingsSummary, Totals};
use super::window::{month_key, MonthWindow};

/// Totals and expense breakdown for one window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub totals: Totals,
    /// Descending by amount, ties by category name ascending
    pub category_breakdown: Vec<CategoryAmount>,
}

impl Aggregate {
    pub fn top_category(&self) -> Option<&str> {
        self.category_breakdown.first().map(|c| c.category.as_str())
    }
}

/// Aggregate transactions whose date falls within `[start, end]`
pub fn aggregate(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> Aggregate {
    let mut income = 0.0;
    let mut count = 0;
    let mut by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for tx in transactions
        .iter()
        .filter(|t| t.occurred_on >= start && t.occurred_on <= end)
    {
        count += 1;
        match tx.kind {
            TransactionKind::Income => income += tx.amount,
            TransactionKind::Expense => {
                let entry = by_category.entry(tx.category.as_str()).or_insert((0.0, 0));
                entry.0 += tx.amount;
                entry.1 += 1;
            }
        }
    }

    let mut breakdown: Vec<CategoryAmount> = by_category
        .into_iter()
        .map(|(category, (amount, transaction_count))| CategoryAmount {
            category: category.to_string(),
            amount,
            transaction_count,
            share_pct: 0.0,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    // Summed from the sorted breakdown so the two always agree exactly
    let expenses: f64 = breakdown.iter().map(|c| c.amount).sum();
    if expenses > 0.0 {
        for row in &mut breakdown {
            row.share_pct = row.amount / expenses * 100.0;
        }
    }

    Aggregate {
        totals: Totals {
            income,
            expenses,
            balance: income - expenses,
            transaction_count: count,
        },
        category_breakdown: breakdown,
    }
}

pub fn aggregate_window(transactions: &[Transaction], window: &MonthWindow) -> Aggregate {
    aggregate(transactions, window.start, window.end)
}

/// Per-month income/expense totals for every month present, oldest first
pub fn monthly_history(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for tx in transactions {
        let entry = months.entry(month_key(tx.occurred_on)).or_insert((0.0, 0.0));
        match tx.kind {
            TransactionKind::Income => entry.0 += tx.amount,
            TransactionKind::Expense => entry.1 += tx.amount,
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlySummary {
            month,
            income,
            expenses,
            net: income - expenses,
        })
        .collect()
}

/// Savings rate of a period and its rating band
pub fn savings_summary(totals: &Totals, config: &SavingsConfig) -> SavingsSummary {
    let rate_pct = if totals.income > 0.0 {
        (totals.income - totals.expenses) / totals.income * 100.0
    } else {
        0.0
    };

    let rating = if rate_pct >= config.excellent_rate {
        SavingsRating::Excellent
    } else if rate_pct >= config.good_rate {
        SavingsRating::Good
    } else {
        SavingsRating::NeedsImprovement
    };

    SavingsSummary { rate_pct, rating }
}
