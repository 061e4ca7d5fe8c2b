//! Insights engine configuration
//!
//! Every heuristic threshold the engine uses lives here so that product
//! decisions (alert ratio, confidence cut-offs, pacing divisor) can change
//! without touching the computations.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/finsight/config/insights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Override files may be partial; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Day-of-month cut-offs for forecast confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub medium_from_day: u32,
    pub high_from_day: u32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            medium_from_day: 5,
            high_from_day: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub alert_ratio: f64,
    pub high_risk_ratio: f64,
    pub recompute_spent: bool,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            alert_ratio: 0.8,
            high_risk_ratio: 1.2,
            recompute_spent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub days_per_month: u32,
    pub aggressive_divisor: f64,
    pub savings_lookback_months: usize,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            days_per_month: 30,
            aggressive_divisor: 2.0,
            savings_lookback_months: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub trend_threshold_pct: f64,
    pub small_purchase_ratio: f64,
    pub small_weight: f64,
    pub frequency_weight: f64,
    pub frequency_saturation: f64,
    pub impulse_min_transactions: usize,
    pub top_merchants: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            trend_threshold_pct: 5.0,
            small_purchase_ratio: 0.5,
            small_weight: 0.6,
            frequency_weight: 0.4,
            frequency_saturation: 2.0,
            impulse_min_transactions: 10,
            top_merchants: 10,
        }
    }
}

/// Savings-rate rating bands, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    pub excellent_rate: f64,
    pub good_rate: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            excellent_rate: 20.0,
            good_rate: 10.0,
        }
    }
}

/// Recurring-charge detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Charges of the same amount at the same merchant needed to call it recurring
    pub min_occurrences: usize,
    /// A subscription is active if its last charge is fewer than this many days ago
    pub active_within_days: i64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            active_within_days: 60,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub confidence: ConfidenceConfig,
    pub budgets: BudgetConfig,
    pub goals: GoalConfig,
    pub patterns: PatternConfig,
    pub savings: SavingsConfig,
    pub subscriptions: SubscriptionConfig,
}

impl InsightsConfig {
    /// Load configuration (explicit path or data-dir override first, then default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "Using config override");
                    fs::read_to_string(&path)
                        .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
                }
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: InsightsConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject thresholds that would make the computations meaningless
    pub fn validate(&self) -> Result<()> {
        let c = &self.confidence;
        if c.medium_from_day > c.high_from_day {
            return Err(Error::Config(format!(
                "confidence.medium_from_day ({}) is after high_from_day ({})",
                c.medium_from_day, c.high_from_day
            )));
        }

        let b = &self.budgets;
        if !(b.alert_ratio > 0.0) {
            return Err(Error::Config("budgets.alert_ratio must be positive".into()));
        }
        if !(b.high_risk_ratio >= 1.0) {
            return Err(Error::Config(
                "budgets.high_risk_ratio must be at least 1.0".into(),
            ));
        }

        let g = &self.goals;
        if g.days_per_month == 0 {
            return Err(Error::Config("goals.days_per_month must be positive".into()));
        }
        if !(g.aggressive_divisor >= 1.0) {
            return Err(Error::Config(
                "goals.aggressive_divisor must be at least 1.0".into(),
            ));
        }
        if g.savings_lookback_months == 0 {
            return Err(Error::Config(
                "goals.savings_lookback_months must be positive".into(),
            ));
        }

        let p = &self.patterns;
        if !(p.trend_threshold_pct >= 0.0) {
            return Err(Error::Config(
                "patterns.trend_threshold_pct must not be negative".into(),
            ));
        }
        if !(p.small_purchase_ratio > 0.0) {
            return Err(Error::Config(
                "patterns.small_purchase_ratio must be positive".into(),
            ));
        }
        for (name, weight) in [
            ("small_weight", p.small_weight),
            ("frequency_weight", p.frequency_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::Config(format!(
                    "patterns.{} must be within [0, 1], got {}",
                    name, weight
                )));
            }
        }
        if !(p.frequency_saturation > 0.0) {
            return Err(Error::Config(
                "patterns.frequency_saturation must be positive".into(),
            ));
        }

        let s = &self.savings;
        if s.good_rate > s.excellent_rate {
            return Err(Error::Config(
                "savings.good_rate must not exceed excellent_rate".into(),
            ));
        }

        let sub = &self.subscriptions;
        if sub.min_occurrences < 2 {
            return Err(Error::Config(
                "subscriptions.min_occurrences must be at least 2".into(),
            ));
        }
        if sub.active_within_days <= 0 {
            return Err(Error::Config(
                "subscriptions.active_within_days must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("config").join("insights.toml"))
}
