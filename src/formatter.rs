//! Transaction display formatting
//!
//! Pure rendering of ledger records into the lines shown in chat replies.

use crate::models::{TransactionKind, TransactionRecord};

/// Sentinel shown when an account has no history yet.
pub const NO_TRANSACTIONS: &str = "No recent transactions.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One display line per record, input order preserved.
pub fn format_lines(records: &[TransactionRecord]) -> Vec<String> {
    records.iter().map(format_line).collect()
}

fn format_line(record: &TransactionRecord) -> String {
    let timestamp = record.created_at.format(TIMESTAMP_FORMAT);

    match record.kind {
        TransactionKind::Deposit => {
            format!("DEPOSIT: +${:.2} on {}", record.amount, timestamp)
        }
        TransactionKind::Withdrawal => {
            format!("WITHDRAWAL: -${:.2} on {}", record.amount, timestamp)
        }
        TransactionKind::Transfer => {
            format!(
                "TRANSFER: -${:.2} to {} on {}",
                record.amount,
                record.recipient.as_deref().unwrap_or("unknown"),
                timestamp
            )
        }
    }
}

/// Newline-joined block, or the sentinel for an empty history.
pub fn format_transactions(records: &[TransactionRecord]) -> String {
    if records.is_empty() {
        return NO_TRANSACTIONS.to_string();
    }

    format_lines(records).join("\n")
}
