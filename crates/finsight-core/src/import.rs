//! Snapshot loading and CSV transaction import
//!
//! This is the record-store boundary: everything read here is validated
//! before the insights engine sees it.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{NewTransaction, Snapshot, TransactionKind};

/// Load and validate a JSON snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    if let Err(e) = snapshot.validate() {
        warn!(path = %path.display(), error = %e, "Rejected snapshot");
        return Err(e);
    }

    info!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        goals = snapshot.goals.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// Write a snapshot as pretty-printed JSON
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    user_id: Option<usize>,
    date: usize,
    kind: usize,
    category: usize,
    amount: usize,
    description: Option<usize>,
    merchant: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| Error::Import(format!("Missing column: {}", names[0])))
        };

        Ok(Self {
            id: find(&["id"]),
            user_id: find(&["user_id"]),
            date: require(&["date", "occurred_on", "transaction_date"])?,
            kind: require(&["kind", "type"])?,
            category: require(&["category"])?,
            amount: require(&["amount"])?,
            description: find(&["description"]),
            merchant: find(&["merchant"]),
        })
    }
}

/// Parse transaction CSV data.
///
/// Expected header (order free, `id`/`user_id`/`description`/`merchant`
/// optional): `id,user_id,date,kind,category,amount,description,merchant`.
/// Rows without a `user_id` are assigned `default_user_id`.
pub fn parse_csv<R: Read>(reader: R, default_user_id: i64) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = row + 2;

        let required = |idx: usize, name: &str| {
            record
                .get(idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
        };
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let id = match optional(columns.id) {
            Some(s) => Some(
                s.parse::<i64>()
                    .map_err(|_| Error::Import(format!("Line {}: invalid id '{}'", line, s)))?,
            ),
            None => None,
        };
        let user_id = match optional(columns.user_id) {
            Some(s) => s
                .parse::<i64>()
                .map_err(|_| Error::Import(format!("Line {}: invalid user_id '{}'", line, s)))?,
            None => default_user_id,
        };

        let occurred_on = parse_date(required(columns.date, "date")?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let kind: TransactionKind = required(columns.kind, "kind")?
            .parse()
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let category = required(columns.category, "category")?.to_string();
        let amount = parse_amount(required(columns.amount, "amount")?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;

        transactions.push(NewTransaction {
            id,
            user_id,
            kind,
            category,
            amount,
            occurred_on,
            description: optional(columns.description),
            merchant: optional(columns.merchant),
        });
    }

    debug!("Parsed {} transactions", transactions.len());
    Ok(transactions)
}

/// Parse ISO (`2026-01-31`) or US (`01/31/2026`) dates
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .map_err(|_| Error::Import(format!("Invalid date: {}", s)))
}

/// Parse an amount, tolerating currency symbols and thousands separators.
/// Amounts are stored unsigned; a leading minus is rejected.
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| Error::Import(format!("Invalid amount: {}", s)))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Import(format!("Amount must be non-negative: {}", s)));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert_eq!(
            parse_date("01/31/2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert!(parse_date("31.01.2026").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.50").unwrap(), 1234.50);
        assert_eq!(parse_amount("$12").unwrap(), 12.0);
        assert!(parse_amount("-5.00").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_csv_full_header() {
        let data = "\
id,user_id,date,kind,category,amount,description,merchant
1,7,2026-03-01,income,Salary,45000,March pay,
2,7,2026-03-02,expense,Food & Dining,\"1,200.00\",Groceries,FreshMart
";
        let txs = parse_csv(data.as_bytes(), 1).unwrap();
        assert_eq!(txs.len(), 2);

        assert_eq!(txs[0].id, Some(1));
        assert_eq!(txs[0].user_id, 7);
        assert_eq!(txs[0].kind, TransactionKind::Income);
        assert_eq!(txs[0].merchant, None);

        assert_eq!(txs[1].amount, 1200.0);
        assert_eq!(txs[1].category, "Food & Dining");
        assert_eq!(txs[1].merchant.as_deref(), Some("FreshMart"));
    }

    #[test]
    fn test_parse_csv_minimal_header_uses_default_user() {
        let data = "type,date,amount,category\nExpense,03/05/2026,9.99,Entertainment\n";
        let txs = parse_csv(data.as_bytes(), 42).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].id, None);
        assert_eq!(txs[0].user_id, 42);
        assert_eq!(txs[0].kind, TransactionKind::Expense);
        assert_eq!(txs[0].description, None);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let data = "date,kind,amount\n2026-03-01,expense,5\n";
        let err = parse_csv(data.as_bytes(), 1).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_parse_csv_reports_line_number() {
        let data = "date,kind,category,amount\n2026-03-01,expense,Food,5\n2026-03-02,transfer,Food,5\n";
        let err = parse_csv(data.as_bytes(), 1).unwrap_err();
        assert!(err.to_string().contains("Line 3"));
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut snapshot = Snapshot::default();
        let data = "date,kind,category,amount\n2026-03-01,expense,Food,5\n";
        snapshot.append_transactions(parse_csv(data.as_bytes(), 1).unwrap());
        save_snapshot(&path, &snapshot).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_snapshot_rejects_invalid_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{"goals":[{"id":1,"user_id":1,"name":"x","target_amount":-1,"deadline":"2026-01-01"}]}"#,
        )
        .unwrap();

        assert!(matches!(load_snapshot(&path), Err(Error::InvalidData(_))));
    }
}
