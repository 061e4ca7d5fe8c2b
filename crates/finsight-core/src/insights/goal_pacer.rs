//! Savings goal pacing
//!
//! For each goal, works out how much has to be put aside per month under two
//! plans and recommends one based on what the user has actually been saving.

use chrono::NaiveDate;

use crate::config::GoalConfig;
use crate::models::Goal;

use super::types::{GoalPacing, GoalStatus, MonthlySummary, PacingPlan};
use super::window::month_key;

pub struct GoalPacer {
    config: GoalConfig,
}

impl GoalPacer {
    pub fn new() -> Self {
        Self::with_config(GoalConfig::default())
    }

    pub fn with_config(config: GoalConfig) -> Self {
        Self { config }
    }

    /// Pace one goal as of `now`, given the recent average monthly net savings
    pub fn pace(&self, goal: &Goal, now: NaiveDate, avg_monthly_savings: f64) -> GoalPacing {
        let remaining = goal.remaining();
        let days_until_deadline = (goal.deadline - now).num_days();

        let status = if remaining <= 0.0 {
            GoalStatus::Completed
        } else if days_until_deadline < 0 {
            GoalStatus::Overdue
        } else {
            GoalStatus::InProgress
        };

        let months_at_current_pace = if remaining <= 0.0 {
            Some(0)
        } else if avg_monthly_savings > 0.0 {
            Some((remaining / avg_monthly_savings).ceil() as u32)
        } else {
            None
        };

        let mut pacing = GoalPacing {
            goal_id: goal.id,
            name: goal.name.clone(),
            status,
            remaining,
            days_until_deadline,
            monthly_required_conservative: 0.0,
            monthly_required_aggressive: 0.0,
            conservative_months: 0.0,
            aggressive_months: 0.0,
            months_at_current_pace,
            recommended_plan: PacingPlan::None,
            shortfall: 0.0,
            recommendation: String::new(),
        };

        match status {
            GoalStatus::Completed => {
                pacing.recommendation =
                    format!("{} is fully funded. Consider setting a new target.", goal.name);
            }
            GoalStatus::Overdue => {
                pacing.recommendation = format!(
                    "The deadline for {} passed {} days ago with {:.2} still to save. \
                     Set a new deadline to get a fresh plan.",
                    goal.name, -days_until_deadline, remaining
                );
            }
            GoalStatus::InProgress => {
                let months_remaining = (days_until_deadline as f64
                    / f64::from(self.config.days_per_month))
                .max(1.0);
                let aggressive_months =
                    (months_remaining / self.config.aggressive_divisor).max(1.0);

                let conservative = (remaining / months_remaining).ceil();
                let aggressive = (remaining / aggressive_months).ceil();

                pacing.conservative_months = months_remaining;
                pacing.aggressive_months = aggressive_months;
                pacing.monthly_required_conservative = conservative;
                pacing.monthly_required_aggressive = aggressive;

                if avg_monthly_savings >= conservative {
                    pacing.recommended_plan = PacingPlan::Aggressive;
                    pacing.recommendation = format!(
                        "Your recent savings of {:.2}/month cover the conservative plan. \
                         Try {:.2}/month to reach {} in about {:.1} months.",
                        avg_monthly_savings, aggressive, goal.name, aggressive_months
                    );
                } else {
                    let shortfall = conservative - avg_monthly_savings.max(0.0);
                    pacing.recommended_plan = PacingPlan::Conservative;
                    pacing.shortfall = shortfall;
                    pacing.recommendation = format!(
                        "Save {:.2}/month to reach {} by {}. \
                         Recent savings of {:.2}/month fall short by {:.2}.",
                        conservative,
                        goal.name,
                        goal.deadline.format("%Y-%m-%d"),
                        avg_monthly_savings,
                        shortfall
                    );
                }
            }
        }

        pacing
    }
}

impl Default for GoalPacer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean net savings over the most recent `lookback` completed months before
/// `now`'s month. The partial current month is used only when there is no
/// completed month. 0 without history.
pub fn average_monthly_savings(history: &[MonthlySummary], now: NaiveDate, lookback: usize) -> f64 {
    let current = month_key(now);
    let completed: Vec<f64> = history
        .iter()
        .rev()
        .filter(|m| m.month < current)
        .take(lookback.max(1))
        .map(|m| m.net)
        .collect();

    if !completed.is_empty() {
        return completed.iter().sum::<f64>() / completed.len() as f64;
    }

    history
        .iter()
        .find(|m| m.month == current)
        .map(|m| m.net)
        .unwrap_or(0.0)
}
