//! Financial Insights Engine
//!
//! Turns a user's raw transactions, budgets and goals into the metrics the
//! dashboard displays. Every computation is a pure function of an immutable
//! [`Snapshot`](crate::models::Snapshot) and an explicit "now".
//!
//! ## Components
//!
//! - **Window** - current/previous calendar month bounds and day counts
//! - **Aggregator** - totals and the expense breakdown by category
//! - **Forecaster** - run-rate cash-flow forecast, budget alerts and risks
//! - **Goal Pacer** - conservative/aggressive contribution plans per goal
//! - **Pattern Analyzer** - trend, weekday/weekend split, impulse score
//! - **Subscriptions** - active recurring charges and their yearly cost
//! - **Engine** - composes the above into one [`Insights`] result
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsight_core::insights::InsightsEngine;
//!
//! let engine = InsightsEngine::with_config(config);
//! let insights = engine.compute(&snapshot, today);
//! ```

pub mod aggregator;
pub mod engine;
pub mod forecaster;
pub mod goal_pacer;
pub mod patterns;
pub mod subscriptions;
pub mod types;
pub mod window;

pub use aggregator::{aggregate, aggregate_window, monthly_history, savings_summary, Aggregate};
pub use engine::{compute_insights, InsightsEngine};
pub use forecaster::{budget_health, recompute_spent, Forecaster};
pub use goal_pacer::{average_monthly_savings, GoalPacer};
pub use patterns::{classify_trend, impulse_score, PatternAnalyzer};
pub use subscriptions::SubscriptionDetector;
pub use types::{
    BudgetAlert, BudgetHealth, BudgetRisk, CategoryAmount, Concentration, Confidence, Forecast,
    GoalPacing, GoalStatus, Insights, MerchantSpend, MonthlySummary, PacingPlan, Patterns,
    RecurringCharge, RiskLevel, SavingsRating, SavingsSummary, Totals, Trend, TrendDirection,
};
pub use window::{current_month_window, month_key, previous_month_window, MonthWindow};
