//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (snapshot, config and date resolution)
//! - `insights` - Dashboard, budgets, goals, patterns and subscriptions views
//! - `import` - CSV import into a snapshot file
//! - `config` - Print the resolved engine configuration

pub mod config;
pub mod core;
pub mod import;
pub mod insights;

// Re-export command functions for main.rs
pub use config::*;
pub use core::*;
pub use import::*;
pub use insights::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
