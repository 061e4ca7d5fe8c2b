//! Domain models for Finsight
//!
//! These are the records owned by the record store. The insights engine only
//! ever reads them through a [`Snapshot`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suggested categories offered by the entry forms. Categories are free-form;
/// this list is only a convenience for callers.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Shopping",
    "Healthcare",
    "Education",
    "Other",
];

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: String,
    /// Always non-negative; the direction is carried by `kind`
    pub amount: f64,
    #[serde(alias = "date")]
    pub occurred_on: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// A transaction parsed from an import file, before it has a snapshot id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Id carried by the source file, if any
    pub id: Option<i64>,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub occurred_on: NaiveDate,
    pub description: Option<String>,
    pub merchant: Option<String>,
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub limit_amount: f64,
    /// Running total maintained by the record store; may exceed the limit
    #[serde(default)]
    pub spent_amount: f64,
}

impl Budget {
    /// Spent-to-limit ratio. A zero (or negative) limit yields 0.
    pub fn used_ratio(&self) -> f64 {
        if self.limit_amount > 0.0 {
            self.spent_amount / self.limit_amount
        } else {
            0.0
        }
    }
}

/// A savings target with a deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    /// May already be in the past
    pub deadline: NaiveDate,
}

impl Goal {
    /// Amount still to save, never negative
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

/// Statistics from appending imported transactions to a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
}

/// Immutable point-in-time view of a user's records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Snapshot {
    pub fn new(transactions: Vec<Transaction>, budgets: Vec<Budget>, goals: Vec<Goal>) -> Self {
        Self {
            transactions,
            budgets,
            goals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budgets.is_empty() && self.goals.is_empty()
    }

    /// Copy of this snapshot restricted to one user's records
    pub fn for_user(&self, user_id: i64) -> Snapshot {
        Snapshot {
            transactions: self
                .transactions
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect(),
            budgets: self
                .budgets
                .iter()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect(),
            goals: self
                .goals
                .iter()
                .filter(|g| g.user_id == user_id)
                .cloned()
                .collect(),
        }
    }

    /// Reject records the engine is not meant to defend against.
    ///
    /// Zero-limit budgets and past deadlines are valid here; the engine
    /// degrades them to guarded values.
    pub fn validate(&self) -> Result<()> {
        for tx in &self.transactions {
            if !tx.amount.is_finite() || tx.amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "transaction {} has invalid amount {}",
                    tx.id, tx.amount
                )));
            }
        }

        for budget in &self.budgets {
            if !budget.limit_amount.is_finite() || budget.limit_amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "budget {} has invalid limit {}",
                    budget.id, budget.limit_amount
                )));
            }
            if !budget.spent_amount.is_finite() || budget.spent_amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "budget {} has invalid spent amount {}",
                    budget.id, budget.spent_amount
                )));
            }
        }

        for goal in &self.goals {
            if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "goal {} must have a positive target, got {}",
                    goal.id, goal.target_amount
                )));
            }
            if !goal.current_amount.is_finite() || goal.current_amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "goal {} has invalid current amount {}",
                    goal.id, goal.current_amount
                )));
            }
        }

        Ok(())
    }

    /// Append imported transactions, skipping ids that already exist.
    ///
    /// Transactions without an id get ids above every existing id and every
    /// explicit id in the batch, so auto-assignment never steals a later row's id.
    pub fn append_transactions(&mut self, new: Vec<NewTransaction>) -> ImportStats {
        let mut seen: HashSet<i64> = self.transactions.iter().map(|t| t.id).collect();
        let mut next_id = seen
            .iter()
            .copied()
            .chain(new.iter().filter_map(|t| t.id))
            .max()
            .unwrap_or(0)
            + 1;
        let mut stats = ImportStats::default();

        for tx in new {
            let id = match tx.id {
                Some(id) if seen.contains(&id) => {
                    tracing::warn!(id, "Skipping transaction with duplicate id");
                    stats.skipped += 1;
                    continue;
                }
                Some(id) => id,
                None => {
                    let id = next_id;
                    next_id += 1;
                    id
                }
            };

            seen.insert(id);
            self.transactions.push(Transaction {
                id,
                user_id: tx.user_id,
                kind: tx.kind,
                category: tx.category,
                amount: tx.amount,
                occurred_on: tx.occurred_on,
                description: tx.description,
                merchant: tx.merchant,
            });
            stats.imported += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_tx(id: Option<i64>, amount: f64) -> NewTransaction {
        NewTransaction {
            id,
            user_id: 1,
            kind: TransactionKind::Expense,
            category: "Food & Dining".to_string(),
            amount,
            occurred_on: date(2026, 3, 2),
            description: None,
            merchant: None,
        }
    }

    #[test]
    fn test_transaction_kind_from_str() {
        assert_eq!(
            TransactionKind::from_str("Income").unwrap(),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::from_str(" expense ").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::from_str("transfer").is_err());
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
    }

    #[test]
    fn test_budget_used_ratio_zero_limit() {
        let budget = Budget {
            id: 1,
            user_id: 1,
            category: "Food".to_string(),
            limit_amount: 0.0,
            spent_amount: 250.0,
        };
        assert_eq!(budget.used_ratio(), 0.0);
    }

    #[test]
    fn test_goal_remaining_never_negative() {
        let goal = Goal {
            id: 1,
            user_id: 1,
            name: "Laptop".to_string(),
            target_amount: 1000.0,
            current_amount: 1500.0,
            deadline: date(2026, 1, 1),
        };
        assert_eq!(goal.remaining(), 0.0);
    }

    #[test]
    fn test_for_user_filters_all_records() {
        let mut snapshot = Snapshot::default();
        snapshot.append_transactions(vec![new_tx(Some(1), 10.0)]);
        let base = snapshot.transactions[0].clone();
        snapshot.transactions.push(Transaction {
            user_id: 2,
            id: 2,
            ..base
        });
        snapshot.goals.push(Goal {
            id: 1,
            user_id: 2,
            name: "Trip".to_string(),
            target_amount: 500.0,
            current_amount: 0.0,
            deadline: date(2026, 12, 1),
        });

        let user_one = snapshot.for_user(1);
        assert_eq!(user_one.transactions.len(), 1);
        assert!(user_one.goals.is_empty());

        let user_two = snapshot.for_user(2);
        assert_eq!(user_two.transactions[0].id, 2);
        assert_eq!(user_two.goals.len(), 1);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut snapshot = Snapshot::default();
        snapshot.append_transactions(vec![new_tx(None, -5.0)]);
        assert!(matches!(snapshot.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_validate_allows_zero_limit_budget() {
        let snapshot = Snapshot::new(
            vec![],
            vec![Budget {
                id: 1,
                user_id: 1,
                category: "Fun".to_string(),
                limit_amount: 0.0,
                spent_amount: 0.0,
            }],
            vec![],
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_goal_target() {
        let snapshot = Snapshot::new(
            vec![],
            vec![],
            vec![Goal {
                id: 9,
                user_id: 1,
                name: "Nothing".to_string(),
                target_amount: 0.0,
                current_amount: 0.0,
                deadline: date(2026, 6, 1),
            }],
        );
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_append_skips_existing_ids_and_assigns_new() {
        let mut snapshot = Snapshot::default();
        let first = snapshot.append_transactions(vec![new_tx(Some(5), 10.0), new_tx(None, 20.0)]);
        assert_eq!(first, ImportStats { imported: 2, skipped: 0 });
        assert_eq!(snapshot.transactions[1].id, 6);

        let second = snapshot.append_transactions(vec![new_tx(Some(5), 10.0), new_tx(None, 30.0)]);
        assert_eq!(second, ImportStats { imported: 1, skipped: 1 });
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(snapshot.transactions[2].id, 7);
    }

    #[test]
    fn test_append_does_not_hand_out_ids_claimed_later_in_batch() {
        let mut snapshot = Snapshot::default();
        let stats = snapshot.append_transactions(vec![
            new_tx(None, 10.0),
            new_tx(Some(1), 20.0),
            new_tx(None, 30.0),
        ]);

        assert_eq!(stats, ImportStats { imported: 3, skipped: 0 });
        let ids: Vec<i64> = snapshot.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_append_skips_repeated_id_within_batch() {
        let mut snapshot = Snapshot::default();
        let stats = snapshot.append_transactions(vec![new_tx(Some(4), 10.0), new_tx(Some(4), 10.0)]);
        assert_eq!(stats, ImportStats { imported: 1, skipped: 1 });
    }
}
