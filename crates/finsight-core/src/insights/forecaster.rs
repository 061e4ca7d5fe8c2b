//! Run-rate forecasting
//!
//! Extrapolates month-end totals linearly from the days elapsed so far:
//! - Cash-flow forecast for the current month
//! - Budget alerts (actual spend vs limit) and budget risks (projected spend
//!   vs limit), which are independent signals

use std::collections::HashMap;

use crate::config::{BudgetConfig, ConfidenceConfig};
use crate::models::{Budget, Transaction};

use super::types::{BudgetAlert, BudgetHealth, BudgetRisk, Confidence, Forecast, RiskLevel, Totals};
use super::window::MonthWindow;

/// Forecaster for cash flow and budget overruns
pub struct Forecaster {
    confidence: ConfidenceConfig,
    budgets: BudgetConfig,
}

impl Forecaster {
    pub fn new() -> Self {
        Self::with_config(ConfidenceConfig::default(), BudgetConfig::default())
    }

    pub fn with_config(confidence: ConfidenceConfig, budgets: BudgetConfig) -> Self {
        Self {
            confidence,
            budgets,
        }
    }

    /// Confidence depends only on how far into the month we are
    pub fn confidence_for(&self, days_elapsed: u32) -> Confidence {
        if days_elapsed < self.confidence.medium_from_day {
            Confidence::Low
        } else if days_elapsed < self.confidence.high_from_day {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }

    /// Project this month's expenses and closing balance.
    ///
    /// A window with no transactions at all reports low confidence whatever
    /// the day, since there is nothing to extrapolate from.
    pub fn cash_flow(&self, totals: &Totals, window: &MonthWindow) -> Forecast {
        let avg_daily_spend = totals.expenses / f64::from(window.days_elapsed.max(1));
        let predicted_monthly_expense = if window.days_elapsed >= window.days_in_month {
            totals.expenses
        } else {
            avg_daily_spend * f64::from(window.days_in_month)
        };

        let confidence = if totals.transaction_count == 0 {
            Confidence::Low
        } else {
            self.confidence_for(window.days_elapsed)
        };

        Forecast {
            avg_daily_spend,
            predicted_monthly_expense,
            predicted_balance: totals.income - predicted_monthly_expense,
            current_income: totals.income,
            days_remaining: window.days_remaining,
            confidence,
        }
    }

    /// Budgets whose spent-to-limit ratio exceeds the alert ratio.
    ///
    /// Sorted by ratio descending, ties by category.
    pub fn budget_alerts(&self, budgets: &[Budget]) -> Vec<BudgetAlert> {
        let mut alerts: Vec<BudgetAlert> = budgets
            .iter()
            .filter(|b| b.used_ratio() > self.budgets.alert_ratio)
            .map(|b| BudgetAlert {
                category: b.category.clone(),
                limit_amount: b.limit_amount,
                spent_amount: b.spent_amount,
                used_ratio: b.used_ratio(),
            })
            .collect();

        alerts.sort_by(|a, b| {
            b.used_ratio
                .partial_cmp(&a.used_ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        alerts
    }

    /// Budgets projected to end the month over their limit.
    ///
    /// Sorted by projected overrun descending, ties by category.
    pub fn budget_risks(&self, budgets: &[Budget], window: &MonthWindow) -> Vec<BudgetRisk> {
        let elapsed = f64::from(window.days_elapsed.max(1));
        let mut risks = Vec::new();

        for budget in budgets {
            let daily_rate = budget.spent_amount / elapsed;
            let projected_spend = daily_rate * f64::from(window.days_in_month);
            let projected_overrun = (projected_spend - budget.limit_amount).max(0.0);

            if projected_overrun <= 0.0 {
                continue;
            }

            let risk_level = if projected_spend > budget.limit_amount * self.budgets.high_risk_ratio
            {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };

            let days_until_overrun = if daily_rate > 0.0 {
                ((budget.limit_amount - budget.spent_amount) / daily_rate)
                    .floor()
                    .max(0.0) as u32
            } else {
                window.days_remaining
            };

            risks.push(BudgetRisk {
                category: budget.category.clone(),
                limit_amount: budget.limit_amount,
                spent_amount: budget.spent_amount,
                projected_spend,
                projected_overrun,
                risk_level,
                days_until_overrun,
            });
        }

        risks.sort_by(|a, b| {
            b.projected_overrun
                .partial_cmp(&a.projected_overrun)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });

        tracing::debug!(
            budgets = budgets.len(),
            at_risk = risks.len(),
            "Budget risk projection complete"
        );
        risks
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn budget_health(budgets: &[Budget]) -> BudgetHealth {
    BudgetHealth {
        on_track: budgets
            .iter()
            .filter(|b| b.spent_amount < b.limit_amount)
            .count(),
        total: budgets.len(),
    }
}

/// Replace each budget's stored spend with the sum of its category's
/// expenses inside the window
pub fn recompute_spent(
    budgets: &[Budget],
    transactions: &[Transaction],
    window: &MonthWindow,
) -> Vec<Budget> {
    let mut spent: HashMap<&str, f64> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.is_expense() && window.contains(t.occurred_on))
    {
        *spent.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
    }

    budgets
        .iter()
        .map(|b| Budget {
            spent_amount: spent.get(b.category.as_str()).copied().unwrap_or(0.0),
            ..b.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::window::current_month_window;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn totals(income: f64, expenses: f64, count: usize) -> Totals {
        Totals {
            income,
            expenses,
            balance: income - expenses,
            transaction_count: count,
        }
    }

    fn budget(category: &str, limit: f64, spent: f64) -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            category: category.to_string(),
            limit_amount: limit,
            spent_amount: spent,
        }
    }

    #[test]
    fn test_run_rate_day_ten_of_thirty() {
        // June has 30 days
        let window = current_month_window(date(2026, 6, 10));
        let forecast = Forecaster::new().cash_flow(&totals(0.0, 1000.0, 1), &window);

        assert_eq!(forecast.avg_daily_spend, 100.0);
        assert_eq!(forecast.predicted_monthly_expense, 3000.0);
        assert_eq!(forecast.predicted_balance, -3000.0);
        assert_eq!(forecast.days_remaining, 20);
        assert_eq!(forecast.confidence, Confidence::Medium);
    }

    #[test]
    fn test_no_extrapolation_at_month_end() {
        let window = current_month_window(date(2026, 7, 31));
        let t = totals(500.0, 1234.57, 9);
        let forecast = Forecaster::new().cash_flow(&t, &window);
        assert_eq!(forecast.predicted_monthly_expense, t.expenses);
        assert_eq!(forecast.confidence, Confidence::High);
    }

    #[test]
    fn test_empty_forecast_is_zero_and_low() {
        let window = current_month_window(date(2026, 7, 20));
        let forecast = Forecaster::new().cash_flow(&Totals::default(), &window);
        assert_eq!(forecast.avg_daily_spend, 0.0);
        assert_eq!(forecast.predicted_monthly_expense, 0.0);
        assert_eq!(forecast.predicted_balance, 0.0);
        assert_eq!(forecast.confidence, Confidence::Low);
    }

    #[test]
    fn test_confidence_thresholds() {
        let f = Forecaster::new();
        assert_eq!(f.confidence_for(1), Confidence::Low);
        assert_eq!(f.confidence_for(4), Confidence::Low);
        assert_eq!(f.confidence_for(5), Confidence::Medium);
        assert_eq!(f.confidence_for(14), Confidence::Medium);
        assert_eq!(f.confidence_for(15), Confidence::High);

        let custom = Forecaster::with_config(
            ConfidenceConfig {
                medium_from_day: 2,
                high_from_day: 3,
            },
            BudgetConfig::default(),
        );
        assert_eq!(custom.confidence_for(3), Confidence::High);
    }

    #[test]
    fn test_alert_fires_above_ratio() {
        let alerts = Forecaster::new().budget_alerts(&[
            budget("Food", 5000.0, 4200.0),
            budget("Fun", 1000.0, 800.0),
        ]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Food");
        assert!((alerts[0].used_ratio - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_zero_limit_never_alerts() {
        let f = Forecaster::new();
        let budgets = [budget("Gifts", 0.0, 300.0)];
        assert!(f.budget_alerts(&budgets).is_empty());
        assert_eq!(budgets[0].used_ratio(), 0.0);
    }

    #[test]
    fn test_alerts_sorted_by_ratio() {
        let alerts = Forecaster::new().budget_alerts(&[
            budget("B", 100.0, 90.0),
            budget("A", 100.0, 90.0),
            budget("C", 100.0, 150.0),
        ]);
        let order: Vec<&str> = alerts.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_risk_independent_of_alert() {
        // Day 10 of 30: 70% used now, projected to 210%
        let window = current_month_window(date(2026, 6, 10));
        let f = Forecaster::new();
        let budgets = [budget("Food", 1000.0, 700.0)];

        assert!(f.budget_alerts(&budgets).is_empty());
        let risks = f.budget_risks(&budgets, &window);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].projected_spend, 2100.0);
        assert_eq!(risks[0].projected_overrun, 1100.0);
        assert_eq!(risks[0].risk_level, RiskLevel::High);
        // 300 left at 70/day
        assert_eq!(risks[0].days_until_overrun, 4);
    }

    #[test]
    fn test_alert_without_risk_late_in_month() {
        // Day 30 of 30: 90% used, projection equals actual
        let window = current_month_window(date(2026, 6, 30));
        let f = Forecaster::new();
        let budgets = [budget("Food", 1000.0, 900.0)];

        assert_eq!(f.budget_alerts(&budgets).len(), 1);
        assert!(f.budget_risks(&budgets, &window).is_empty());
    }

    #[test]
    fn test_medium_risk_and_ordering() {
        let window = current_month_window(date(2026, 6, 15));
        let risks = Forecaster::new().budget_risks(
            &[
                budget("Small", 1000.0, 550.0),
                budget("Large", 1000.0, 900.0),
            ],
            &window,
        );
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].category, "Large");
        assert_eq!(risks[1].category, "Small");
        // 1100 projected is within 1.2x
        assert_eq!(risks[1].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_equal_overruns_sorted_by_category() {
        let window = current_month_window(date(2026, 6, 15));
        let risks = Forecaster::new().budget_risks(
            &[
                budget("Travel", 1000.0, 800.0),
                budget("Dining", 1000.0, 800.0),
                budget("Books", 100.0, 60.0),
            ],
            &window,
        );
        let order: Vec<&str> = risks.iter().map(|r| r.category.as_str()).collect();
        // 1600 projected against 1000 for both, ahead of 120 against 100
        assert_eq!(order, vec!["Dining", "Travel", "Books"]);
        assert_eq!(risks[0].projected_overrun, risks[1].projected_overrun);
    }

    #[test]
    fn test_zero_limit_risk_does_not_panic() {
        let window = current_month_window(date(2026, 6, 1));
        let risks = Forecaster::new().budget_risks(&[budget("Gifts", 0.0, 10.0)], &window);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].days_until_overrun, 0);
    }

    #[test]
    fn test_budget_health() {
        let health = budget_health(&[
            budget("A", 100.0, 50.0),
            budget("B", 100.0, 100.0),
            budget("C", 0.0, 0.0),
        ]);
        assert_eq!(health, BudgetHealth { on_track: 1, total: 3 });
    }

    #[test]
    fn test_recompute_spent_uses_window_expenses() {
        let window = current_month_window(date(2026, 6, 15));
        let tx = |amount: f64, kind: TransactionKind, category: &str, on: NaiveDate| Transaction {
            id: 0,
            user_id: 1,
            kind,
            category: category.to_string(),
            amount,
            occurred_on: on,
            description: None,
            merchant: None,
        };
        let txs = vec![
            tx(40.0, TransactionKind::Expense, "Food", date(2026, 6, 2)),
            tx(60.0, TransactionKind::Expense, "Food", date(2026, 6, 14)),
            tx(99.0, TransactionKind::Expense, "Food", date(2026, 5, 30)),
            tx(500.0, TransactionKind::Income, "Food", date(2026, 6, 3)),
        ];

        let budgets = recompute_spent(
            &[budget("Food", 200.0, 9999.0), budget("Rent", 900.0, 900.0)],
            &txs,
            &window,
        );
        assert_eq!(budgets[0].spent_amount, 100.0);
        assert_eq!(budgets[1].spent_amount, 0.0);
    }
}
