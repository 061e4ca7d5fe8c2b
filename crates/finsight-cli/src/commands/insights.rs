//! Insight command implementations

use std::path::Path;

use anyhow::Result;
use finsight_core::insights::{GoalStatus, Insights, PacingPlan};

use super::{prepare, truncate};
use crate::cli::SnapshotArgs;

pub fn cmd_insights(args: &SnapshotArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let (engine, snapshot, now) = prepare(args, config_path)?;
    let insights = engine.compute(&snapshot, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No data in snapshot yet.");
        println!("Import transactions first: finsight import --file statement.csv");
        return Ok(());
    }

    print_overview(&insights);
    print_budgets(&insights);
    print_goals(&insights);
    print_patterns(&insights);
    print_subscriptions(&insights);

    Ok(())
}

pub fn cmd_budgets(args: &SnapshotArgs, config_path: Option<&Path>) -> Result<()> {
    let (engine, snapshot, now) = prepare(args, config_path)?;
    print_budgets(&engine.compute(&snapshot, now));
    Ok(())
}

pub fn cmd_goals(args: &SnapshotArgs, config_path: Option<&Path>) -> Result<()> {
    let (engine, snapshot, now) = prepare(args, config_path)?;
    print_goals(&engine.compute(&snapshot, now));
    Ok(())
}

pub fn cmd_patterns(args: &SnapshotArgs, config_path: Option<&Path>) -> Result<()> {
    let (engine, snapshot, now) = prepare(args, config_path)?;
    print_patterns(&engine.compute(&snapshot, now));
    Ok(())
}

pub fn cmd_subscriptions(args: &SnapshotArgs, config_path: Option<&Path>) -> Result<()> {
    let (engine, snapshot, now) = prepare(args, config_path)?;
    print_subscriptions(&engine.compute(&snapshot, now));
    Ok(())
}

fn print_overview(insights: &Insights) {
    let window = &insights.window;
    let totals = &insights.totals;
    let forecast = &insights.forecast;

    println!();
    println!("📊 Financial Insights");
    println!(
        "   Period: {} to {} (day {} of {})",
        window.start, window.end, window.days_elapsed, window.days_in_month
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:       ${:>12.2}", totals.income);
    println!("   Expenses:     ${:>12.2}", totals.expenses);
    println!("   Balance:      ${:>12.2}", totals.balance);
    println!(
        "   Savings rate: {:>12.1}%  ({})",
        insights.savings.rate_pct, insights.savings.rating
    );

    if !insights.category_breakdown.is_empty() {
        println!();
        println!(
            "   {:25} │ {:>10} │ {:>6} │ {:>5}",
            "Category", "Amount", "%", "Count"
        );
        println!("   ──────────────────────────┼────────────┼────────┼───────");
        for cat in &insights.category_breakdown {
            println!(
                "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
                truncate(&cat.category, 25),
                cat.amount,
                cat.share_pct,
                cat.transaction_count
            );
        }
    }

    println!();
    println!("🔮 Month-end Forecast ({} confidence)", forecast.confidence);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Avg daily spend:     ${:>12.2}", forecast.avg_daily_spend);
    println!(
        "   Predicted expenses:  ${:>12.2}",
        forecast.predicted_monthly_expense
    );
    println!("   Predicted balance:   ${:>12.2}", forecast.predicted_balance);
    println!("   Days remaining:      {:>13}", forecast.days_remaining);
}

fn print_budgets(insights: &Insights) {
    let health = insights.budget_health;

    println!();
    println!(
        "💰 Budgets ({} of {} on track)",
        health.on_track, health.total
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if health.total == 0 {
        println!("   No budgets defined.");
        return;
    }

    if insights.budget_alerts.is_empty() && insights.budget_risks.is_empty() {
        println!("   ✅ All budgets look fine.");
        return;
    }

    for alert in &insights.budget_alerts {
        println!(
            "   ⚠️  {}: ${:.2} of ${:.2} used ({:.0}%)",
            alert.category,
            alert.spent_amount,
            alert.limit_amount,
            alert.used_ratio * 100.0
        );
    }

    if !insights.budget_risks.is_empty() {
        println!();
        println!(
            "   {:20} │ {:>10} │ {:>10} │ {:>6} │ {:>8}",
            "At risk", "Projected", "Overrun", "Risk", "Days"
        );
        println!("   ─────────────────────┼────────────┼────────────┼────────┼──────────");
        for risk in &insights.budget_risks {
            println!(
                "   {:20} │ {:>10.2} │ {:>10.2} │ {:>6} │ {:>8}",
                truncate(&risk.category, 20),
                risk.projected_spend,
                risk.projected_overrun,
                risk.risk_level,
                risk.days_until_overrun
            );
        }
    }
}

fn print_goals(insights: &Insights) {
    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.goal_pacing.is_empty() {
        println!("   No goals defined.");
        return;
    }

    for pacing in insights.goal_pacing.values() {
        let icon = match pacing.status {
            GoalStatus::Completed => "✅",
            GoalStatus::Overdue => "⏰",
            GoalStatus::InProgress => "📈",
        };
        println!("   {} {} ({})", icon, pacing.name, pacing.status);

        if pacing.status == GoalStatus::InProgress {
            println!(
                "      ${:.2} to go, {} days left",
                pacing.remaining, pacing.days_until_deadline
            );
            println!(
                "      Conservative: ${:.2}/month   Aggressive: ${:.2}/month",
                pacing.monthly_required_conservative, pacing.monthly_required_aggressive
            );
            if let Some(months) = pacing.months_at_current_pace {
                println!("      At your current pace: {} months", months);
            }
            if pacing.recommended_plan == PacingPlan::Conservative && pacing.shortfall > 0.0 {
                println!("      Shortfall: ${:.2}/month", pacing.shortfall);
            }
        }
        println!("      {}", pacing.recommendation);
    }
}

fn print_patterns(insights: &Insights) {
    let patterns = &insights.patterns;
    let trend = &patterns.trend;

    println!();
    println!("🔍 Spending Patterns");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Trend: {} ({:+.1}% vs last month: ${:.2} → ${:.2})",
        trend.direction,
        trend.change_pct,
        trend.previous_month_expenses,
        trend.current_month_expenses
    );
    println!(
        "   Weekday avg: ${:.2}   Weekend avg: ${:.2} ({:+.1}%)",
        patterns.weekday_avg, patterns.weekend_avg, patterns.weekend_vs_weekday_pct
    );
    if let Some(day) = &patterns.top_spending_day {
        println!("   Top spending day: {}", day);
    }
    println!(
        "   Category concentration: {:.1} ({})",
        patterns.concentration_index, patterns.concentration
    );
    println!("   Impulse score: {:.1}/100", patterns.impulse_score);

    if !patterns.top_merchants.is_empty() {
        println!();
        println!("   {:30} │ {:>6} │ {:>10}", "Merchant", "Visits", "Total");
        println!("   ───────────────────────────────┼────────┼────────────");
        for m in &patterns.top_merchants {
            println!(
                "   {:30} │ {:>6} │ {:>10.2}",
                truncate(&m.merchant, 30),
                m.visits,
                m.total_spent
            );
        }
    }

    if !insights.monthly_history.is_empty() {
        println!();
        println!(
            "   {:8} │ {:>12} │ {:>12} │ {:>12}",
            "Month", "Income", "Expenses", "Net"
        );
        println!("   ─────────┼──────────────┼──────────────┼──────────────");
        for month in &insights.monthly_history {
            println!(
                "   {:8} │ {:>12.2} │ {:>12.2} │ {:>12.2}",
                month.month, month.income, month.expenses, month.net
            );
        }
    }
}

fn print_subscriptions(insights: &Insights) {
    println!();
    println!("🔁 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.subscriptions.is_empty() {
        println!("   No active recurring charges found.");
        return;
    }

    println!(
        "   {:25} │ {:>9} │ {:>5} │ {:>10} │ {:>10}",
        "Merchant", "Amount", "Times", "Per year", "Last"
    );
    println!("   ──────────────────────────┼───────────┼───────┼────────────┼────────────");
    for sub in &insights.subscriptions {
        println!(
            "   {:25} │ {:>9.2} │ {:>5} │ {:>10.2} │ {:>10}",
            truncate(&sub.merchant, 25),
            sub.amount,
            sub.frequency,
            sub.annual_cost,
            sub.last_charged
        );
    }

    let total: f64 = insights.subscriptions.iter().map(|s| s.annual_cost).sum();
    println!();
    println!("   Total per year: ${:.2}", total);
}
