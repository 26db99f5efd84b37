//! Command Interpreter
//!
//! Resolves the account, classifies the message, and either executes the
//! banking intent against the store or assembles a context prompt for the
//! fallback responder. Constructed explicitly with its collaborators; no
//! process-wide state.

use crate::assistant::FallbackAssistant;
use crate::classifier::{self, Intent, TransferCommand};
use crate::error::BankError;
use crate::formatter;
use crate::models::{Account, TransactionKind};
use crate::store::AccountStore;
use std::sync::Arc;
use tracing::{info, warn};

/// How many recent records a chat reply or fallback prompt includes.
pub const CHAT_HISTORY_LIMIT: i64 = 5;

const INVALID_AMOUNT: &str = "Invalid amount";
const INSUFFICIENT_FUNDS: &str = "Insufficient funds";
const TRANSFER_FAILURE: &str = "Unable to process transfer. Please try again.";

/// Outcome of handling one chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// The request succeeded; reply text for the user.
    Reply(String),
    /// A recoverable validation failure, surfaced as a structured rejection.
    Rejected(String),
    /// The login name resolved to no account; no intent was evaluated.
    UnknownUser,
}

pub struct CommandInterpreter {
    store: Arc<dyn AccountStore>,
    assistant: FallbackAssistant,
}

impl CommandInterpreter {
    pub fn new(store: Arc<dyn AccountStore>, assistant: FallbackAssistant) -> Self {
        Self { store, assistant }
    }

    /// Handle one inbound chat message for the named user.
    pub async fn handle_message(&self, username: &str, message: &str) -> crate::Result<ChatOutcome> {
        let Some(account) = self.store.find_by_username(username).await? else {
            info!("Chat message for unknown user '{}'", username);
            return Ok(ChatOutcome::UnknownUser);
        };

        let intent = classifier::classify(message);
        info!("Classified message from '{}' as {:?}", username, intent);

        match intent {
            Intent::Transfer(Ok(command)) => self.execute_transfer(&account, command).await,

            Intent::Transfer(Err(parse_error)) => {
                warn!("Transfer parse failed: {}", parse_error);
                Ok(ChatOutcome::Rejected(TRANSFER_FAILURE.to_string()))
            }

            Intent::Balance => Ok(ChatOutcome::Reply(format!(
                "Your current balance is ${:.2}.",
                account.balance
            ))),

            Intent::History => {
                let records = self
                    .store
                    .recent_transactions(account.id, CHAT_HISTORY_LIMIT)
                    .await?;
                Ok(ChatOutcome::Reply(format!(
                    "Here are your recent transactions:\n\n{}",
                    formatter::format_transactions(&records)
                )))
            }

            Intent::Unclassified => self.fallback(&account, message).await,
        }
    }

    /// Validate and apply a parsed transfer, then report the new balance.
    /// Validation order: amount positivity, then sufficiency of funds.
    async fn execute_transfer(
        &self,
        account: &Account,
        command: TransferCommand,
    ) -> crate::Result<ChatOutcome> {
        if command.amount <= 0.0 {
            return Ok(ChatOutcome::Rejected(INVALID_AMOUNT.to_string()));
        }

        if command.amount > account.balance {
            return Ok(ChatOutcome::Rejected(INSUFFICIENT_FUNDS.to_string()));
        }

        let applied = self
            .store
            .apply_transaction(
                account.id,
                TransactionKind::Transfer,
                command.amount,
                command.recipient.as_deref(),
            )
            .await;

        match applied {
            Ok(()) => {}
            // The store's conditional debit lost a race with a concurrent
            // mutation; same user-visible rejection as the pre-check.
            Err(BankError::InsufficientFunds) => {
                return Ok(ChatOutcome::Rejected(INSUFFICIENT_FUNDS.to_string()));
            }
            Err(e) => return Err(e),
        }

        let refreshed = self
            .store
            .find_by_id(account.id)
            .await?
            .ok_or_else(|| BankError::AccountNotFound(account.username.clone()))?;

        let mut reply = format!("Successfully transferred ${:.2}", command.amount);
        if let Some(recipient) = &command.recipient {
            reply.push_str(&format!(" to {}", recipient));
        }
        reply.push_str(&format!(". Your new balance is ${:.2}", refreshed.balance));

        info!(
            "Transfer of ${:.2} applied for '{}'",
            command.amount, account.username
        );
        Ok(ChatOutcome::Reply(reply))
    }

    /// No intent matched: build the context blob and hand off to the
    /// assistant, returning its text verbatim.
    async fn fallback(&self, account: &Account, message: &str) -> crate::Result<ChatOutcome> {
        let records = self
            .store
            .recent_transactions(account.id, CHAT_HISTORY_LIMIT)
            .await?;
        let formatted = formatter::format_transactions(&records);

        let prompt = build_prompt(message, account, &formatted);
        let answer = self.assistant.respond(message, &prompt).await;

        Ok(ChatOutcome::Reply(answer))
    }
}

/// Context blob for the language model: the message plus the user's profile
/// and recent activity.
fn build_prompt(message: &str, account: &Account, formatted_transactions: &str) -> String {
    format!(
        "User: {}\n\n\
         User Info:\n\
         Name: {}\n\
         Balance: ${:.2}\n\n\
         Recent Transactions:\n\
         {}\n\n\
         Please provide a helpful response as a banking assistant.",
        message, account.full_name, account.balance, formatted_transactions
    )
}
