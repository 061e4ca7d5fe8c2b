//! Finsight Core Library
//!
//! Shared functionality for the Finsight personal finance dashboard:
//! - Domain models (transactions, budgets, goals, snapshots)
//! - Snapshot loading and CSV transaction import
//! - Insights engine configuration
//! - The financial insights engine itself

pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;

pub use config::InsightsConfig;
pub use error::{Error, Result};
pub use insights::{compute_insights, Insights, InsightsEngine};
pub use models::{Budget, Goal, ImportStats, NewTransaction, Snapshot, Transaction, TransactionKind};
