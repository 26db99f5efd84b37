//! Intent Classifier
//!
//! Classifies an incoming chat message as one of the banking intents:
//! - Transfer: "transfer" keyword plus a currency marker, with a parsed command
//! - Balance / History: substring inquiries
//! - Unclassified: handed to the fallback responder
//!
//! Checks run in priority order, first match wins. Transfer wins over
//! balance when a message carries both keywords.

use thiserror::Error;

/// Character introducing the amount in a transfer message.
pub const CURRENCY_MARKER: char = '$';

const TRANSFER_KEYWORD: &str = "transfer";
const BALANCE_KEYWORD: &str = "balance";
const HISTORY_KEYWORDS: &[&str] = &["transaction", "history"];

/// A classified chat message.
///
/// The transfer variant carries the parse outcome so validation and side
/// effects stay separate from keyword detection.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Transfer(std::result::Result<TransferCommand, TransferParseError>),
    Balance,
    History,
    Unclassified,
}

/// A successfully parsed transfer request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCommand {
    /// Parsed magnitude; may still be zero or negative until validated.
    pub amount: f64,
    /// Token after the word "to", lowercased.
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferParseError {
    #[error("no amount found after the currency marker")]
    MissingAmount,

    #[error("amount is not a number: {0}")]
    InvalidNumber(String),
}

/// Classify a message into an intent.
pub fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();

    if lower.contains(TRANSFER_KEYWORD) && message.contains(CURRENCY_MARKER) {
        return Intent::Transfer(parse_transfer(message));
    }

    if lower.contains(BALANCE_KEYWORD) {
        return Intent::Balance;
    }

    if HISTORY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Intent::History;
    }

    Intent::Unclassified
}

/// Parse the amount and recipient out of a transfer message.
///
/// The amount is the text after the first currency marker up to the next
/// whitespace, stripped to digits and the decimal point.
pub fn parse_transfer(
    message: &str,
) -> std::result::Result<TransferCommand, TransferParseError> {
    let (_, after_marker) = message
        .split_once(CURRENCY_MARKER)
        .ok_or(TransferParseError::MissingAmount)?;

    let token: String = after_marker
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();

    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        return Err(TransferParseError::MissingAmount);
    }

    let amount: f64 = digits
        .parse()
        .map_err(|_| TransferParseError::InvalidNumber(digits))?;

    Ok(TransferCommand {
        amount,
        recipient: parse_recipient(message),
    })
}

/// The token immediately following the word "to", lowercased.
fn parse_recipient(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let mut tokens = lower.split_whitespace();

    while let Some(token) = tokens.next() {
        if token == "to" {
            return tokens.next().map(str::to_string);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_intent() {
        let intent = classify("Transfer $50 to John");
        let Intent::Transfer(Ok(command)) = intent else {
            panic!("expected a parsed transfer, got another intent");
        };
        assert_eq!(command.amount, 50.0);
        assert_eq!(command.recipient.as_deref(), Some("john"));
    }

    #[test]
    fn test_transfer_decimal_amount_without_recipient() {
        let Intent::Transfer(Ok(command)) = classify("please TRANSFER $12.50 for rent") else {
            panic!("expected a parsed transfer");
        };
        assert_eq!(command.amount, 12.5);
        assert_eq!(command.recipient, None);
    }

    #[test]
    fn test_transfer_takes_precedence_over_balance() {
        // Both keywords present: evaluation order makes this a transfer.
        let intent = classify("transfer $100 of my balance to sam");
        assert!(matches!(intent, Intent::Transfer(Ok(_))));
    }

    #[test]
    fn test_transfer_without_marker_is_not_a_transfer() {
        assert_eq!(classify("transfer some money to John"), Intent::Unclassified);
    }

    #[test]
    fn test_balance_intent() {
        assert_eq!(classify("What's my BALANCE?"), Intent::Balance);
    }

    #[test]
    fn test_history_intent() {
        assert_eq!(classify("show my transaction log"), Intent::History);
        assert_eq!(classify("account History please"), Intent::History);
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(classify("Can you help me invest?"), Intent::Unclassified);
        assert_eq!(classify("hello"), Intent::Unclassified);
    }

    #[test]
    fn test_parse_missing_amount() {
        // Marker immediately followed by whitespace, or no digits at all.
        assert_eq!(
            parse_transfer("transfer $ 50 to sam"),
            Err(TransferParseError::MissingAmount)
        );
        assert_eq!(
            parse_transfer("transfer $abc to sam"),
            Err(TransferParseError::MissingAmount)
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        assert_eq!(
            parse_transfer("transfer $1.2.3 to sam"),
            Err(TransferParseError::InvalidNumber("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_parse_strips_non_numeric_noise() {
        let command = parse_transfer("transfer $50, to sam").unwrap();
        assert_eq!(command.amount, 50.0);
        assert_eq!(command.recipient.as_deref(), Some("sam"));
    }
}
