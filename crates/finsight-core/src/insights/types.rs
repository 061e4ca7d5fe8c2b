//! Output types for the insights engine
//!
//! Everything here is derived on demand and never persisted by the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::window::MonthWindow;

/// Income/expense totals for a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    /// Always `income - expenses`
    pub balance: f64,
    pub transaction_count: usize,
}

/// One row of the expense breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
    pub transaction_count: usize,
    /// Share of total expenses in percent (0 when there are no expenses)
    pub share_pct: f64,
}

/// Income and expenses of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl SavingsRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsRating::Excellent => "excellent",
            SavingsRating::Good => "good",
            SavingsRating::NeedsImprovement => "needs_improvement",
        }
    }
}

impl fmt::Display for SavingsRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    /// `(income - expenses) / income * 100`, 0 without income
    pub rate_pct: f64,
    pub rating: SavingsRating,
}

/// How much a run-rate forecast can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// Month-end cash-flow projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub avg_daily_spend: f64,
    pub predicted_monthly_expense: f64,
    pub predicted_balance: f64,
    pub current_income: f64,
    pub days_remaining: u32,
    pub confidence: Confidence,
}

/// Actual spend has crossed the alert ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub limit_amount: f64,
    pub spent_amount: f64,
    pub used_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run-rate projection says the budget will be exceeded by month end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRisk {
    pub category: String,
    pub limit_amount: f64,
    pub spent_amount: f64,
    pub projected_spend: f64,
    pub projected_overrun: f64,
    pub risk_level: RiskLevel,
    pub days_until_overrun: u32,
}

/// Budgets currently under their limit, out of all budgets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetHealth {
    pub on_track: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Completed,
    Overdue,
    InProgress,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Completed => "completed",
            GoalStatus::Overdue => "overdue",
            GoalStatus::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(GoalStatus::Completed),
            "overdue" => Ok(GoalStatus::Overdue),
            "in_progress" => Ok(GoalStatus::InProgress),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingPlan {
    Conservative,
    Aggressive,
    /// Completed and overdue goals get no plan
    None,
}

impl PacingPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingPlan::Conservative => "conservative",
            PacingPlan::Aggressive => "aggressive",
            PacingPlan::None => "none",
        }
    }
}

impl fmt::Display for PacingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contribution pace for one savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPacing {
    pub goal_id: i64,
    pub name: String,
    pub status: GoalStatus,
    pub remaining: f64,
    /// Negative once the deadline has passed
    pub days_until_deadline: i64,
    pub monthly_required_conservative: f64,
    pub monthly_required_aggressive: f64,
    pub conservative_months: f64,
    pub aggressive_months: f64,
    /// Months to finish at the recent average net savings, if positive
    pub months_at_current_pace: Option<u32>,
    pub recommended_plan: PacingPlan,
    pub shortfall: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current vs previous month expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub current_month_expenses: f64,
    pub previous_month_expenses: f64,
    /// 0 when the previous month had no expenses
    pub change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concentration {
    HighlyConcentrated,
    ModeratelyConcentrated,
    Diversified,
}

impl Concentration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Concentration::HighlyConcentrated => "highly_concentrated",
            Concentration::ModeratelyConcentrated => "moderately_concentrated",
            Concentration::Diversified => "diversified",
        }
    }
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantSpend {
    pub merchant: String,
    pub visits: usize,
    pub total_spent: f64,
}

/// Behavioural signals over the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patterns {
    pub trend: Trend,
    pub weekday_avg: f64,
    pub weekend_avg: f64,
    pub weekend_vs_weekday_pct: f64,
    pub top_spending_day: Option<String>,
    /// Herfindahl index of expense category shares, 0-100
    pub concentration_index: f64,
    pub concentration: Concentration,
    pub top_merchants: Vec<MerchantSpend>,
    /// 0-100
    pub impulse_score: f64,
}

/// An active charge repeated at the same merchant for the same amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringCharge {
    pub merchant: String,
    pub amount: f64,
    /// Number of times it was charged
    pub frequency: usize,
    /// `amount * 12`, assuming a monthly cadence
    pub annual_cost: f64,
    pub first_charged: NaiveDate,
    pub last_charged: NaiveDate,
    pub days_since_last: i64,
}

/// Everything the dashboard shows, computed from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub as_of: NaiveDate,
    pub window: MonthWindow,
    pub totals: Totals,
    pub savings: SavingsSummary,
    pub category_breakdown: Vec<CategoryAmount>,
    pub top_category: Option<String>,
    pub forecast: Forecast,
    pub budget_alerts: Vec<BudgetAlert>,
    pub budget_risks: Vec<BudgetRisk>,
    pub budget_health: BudgetHealth,
    pub goal_pacing: BTreeMap<i64, GoalPacing>,
    pub patterns: Patterns,
    pub subscriptions: Vec<RecurringCharge>,
    pub monthly_history: Vec<MonthlySummary>,
}
