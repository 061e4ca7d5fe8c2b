//! Insights Engine - composes the analyzers into one result
//!
//! The engine is a pure function of `(snapshot, now)`: no clock, no I/O, no
//! shared state. Calling it twice with the same inputs gives identical output.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::InsightsConfig;
use crate::models::{Budget, Snapshot};

use super::aggregator::{aggregate_window, monthly_history, savings_summary};
use super::forecaster::{budget_health, recompute_spent, Forecaster};
use super::goal_pacer::{average_monthly_savings, GoalPacer};
use super::patterns::PatternAnalyzer;
use super::subscriptions::SubscriptionDetector;
use super::types::Insights;
use super::window::current_month_window;

/// The main insights engine
pub struct InsightsEngine {
    config: InsightsConfig,
    forecaster: Forecaster,
    pacer: GoalPacer,
    patterns: PatternAnalyzer,
    subscriptions: SubscriptionDetector,
}

impl Default for InsightsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightsEngine {
    /// Create an engine with the default thresholds
    pub fn new() -> Self {
        Self::with_config(InsightsConfig::default())
    }

    pub fn with_config(config: InsightsConfig) -> Self {
        Self {
            forecaster: Forecaster::with_config(config.confidence.clone(), config.budgets.clone()),
            pacer: GoalPacer::with_config(config.goals.clone()),
            patterns: PatternAnalyzer::with_config(config.patterns.clone()),
            subscriptions: SubscriptionDetector::with_config(config.subscriptions.clone()),
            config,
        }
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Compute every derived metric for `snapshot` as of `now`
    pub fn compute(&self, snapshot: &Snapshot, now: NaiveDate) -> Insights {
        let window = current_month_window(now);
        let current = aggregate_window(&snapshot.transactions, &window);
        let history = monthly_history(&snapshot.transactions);

        let budgets: Cow<'_, [Budget]> = if self.config.budgets.recompute_spent {
            Cow::Owned(recompute_spent(
                &snapshot.budgets,
                &snapshot.transactions,
                &window,
            ))
        } else {
            Cow::Borrowed(&snapshot.budgets)
        };

        let avg_savings =
            average_monthly_savings(&history, now, self.config.goals.savings_lookback_months);
        let goal_pacing: BTreeMap<i64, _> = snapshot
            .goals
            .iter()
            .map(|g| (g.id, self.pacer.pace(g, now, avg_savings)))
            .collect();

        let insights = Insights {
            as_of: now,
            window,
            savings: savings_summary(&current.totals, &self.config.savings),
            top_category: current.top_category().map(str::to_string),
            forecast: self.forecaster.cash_flow(&current.totals, &window),
            budget_alerts: self.forecaster.budget_alerts(&budgets),
            budget_risks: self.forecaster.budget_risks(&budgets, &window),
            budget_health: budget_health(&budgets),
            goal_pacing,
            patterns: self.patterns.analyze(&snapshot.transactions, now),
            subscriptions: self.subscriptions.detect(&snapshot.transactions, now),
            monthly_history: history,
            totals: current.totals,
            category_breakdown: current.category_breakdown,
        };

        tracing::debug!(
            as_of = %now,
            transactions = snapshot.transactions.len(),
            alerts = insights.budget_alerts.len(),
            risks = insights.budget_risks.len(),
            goals = insights.goal_pacing.len(),
            subscriptions = insights.subscriptions.len(),
            "Insights computed"
        );

        insights
    }
}

/// Compute insights with the default configuration
pub fn compute_insights(snapshot: &Snapshot, now: NaiveDate) -> Insights {
    InsightsEngine::new().compute(snapshot, now)
}
