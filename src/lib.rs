//! Banking Chat Assistant
//!
//! A demonstration banking web service that:
//! - Authenticates users against a local SQLite store
//! - Tracks account balances and an append-only transaction ledger
//! - Answers banking questions via keyword intent matching
//! - Forwards free-form queries to a language-model API, with
//!   deterministic canned replies when the credential is absent or the
//!   call fails
//!
//! MESSAGE FLOW:
//! INPUT → RESOLVE ACCOUNT → CLASSIFY → EXECUTE INTENT | FALLBACK → REPLY

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod interpreter;
pub mod models;
pub mod store;

pub use error::{BankError, Result};

// Re-export common types
pub use classifier::{Intent, TransferCommand, TransferParseError};
pub use interpreter::{ChatOutcome, CommandInterpreter};
pub use models::*;
