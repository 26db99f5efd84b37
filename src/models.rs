//! Core data models for the banking assistant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Account =================
//

/// A user account row.
///
/// Carries the stored credential; callers compare it and must not
/// serialize the full record to the outside.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub balance: f64,
}

//
// ================= Transactions =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    /// Stable TEXT representation used in the `transactions` table.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Transfer => "transfer",
        }
    }

    pub fn from_db_str(kind: &str) -> Option<Self> {
        match kind {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            "transfer" => Some(TransactionKind::Transfer),
            _ => None,
        }
    }

    /// Debits reduce the balance; deposits increase it.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionKind::Withdrawal | TransactionKind::Transfer)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

/// An append-only ledger entry. Amount is always a positive magnitude;
/// direction is implied by the kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub recipient: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}
