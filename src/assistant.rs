//! Language-model client for unclassified messages
//!
//! Posts the context prompt to the OpenAI chat-completions API and degrades
//! to deterministic canned replies whenever the credential is absent or the
//! call fails. Uses a long-lived reqwest::Client for connection pooling.

use crate::error::BankError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str = "You are a helpful banking assistant.";

/// Upper bound on the remote call; an unresponsive API cannot stall the
/// interpreter past this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback responder for messages no banking intent matched
pub struct FallbackAssistant {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FallbackAssistant {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: OPENAI_URL.to_string(),
        }
    }

    /// Answer an unclassified message. Never fails: without a configured
    /// key, or on any remote error, returns the canned reply keyed off the
    /// user's message.
    pub async fn respond(&self, message: &str, prompt: &str) -> String {
        match self.api_key.as_deref() {
            Some(api_key) if !api_key.is_empty() => {
                match self.generate(prompt, api_key).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!("Language-model call failed, using canned reply: {}", e);
                        canned_reply(message).to_string()
                    }
                }
            }
            _ => {
                info!("No API key configured, using canned reply");
                canned_reply(message).to_string()
            }
        }
    }

    /// Generate a completion from the remote API.
    async fn generate(&self, prompt: &str, api_key: &str) -> crate::Result<String> {
        let request = ChatCompletionRequest {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 150,
        };

        info!("Calling chat-completions API");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BankError::AssistantError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BankError::AssistantError("Empty completion".to_string()))?;

        Ok(answer)
    }
}

/// Deterministic offline reply, selected by keyword presence in order:
/// balance, transfer, transaction/history, help, generic default.
pub fn canned_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();

    if lower.contains("balance") {
        "I can help you check your account balance. Based on your account \
         information, I can see your current balance in the system."
    } else if lower.contains("transfer") {
        "I understand you want to make a transfer. Please specify the amount \
         and recipient, for example: 'Transfer $50 to John'."
    } else if lower.contains("transaction") || lower.contains("history") {
        "I can help you review your recent transactions. Your transaction \
         history shows your recent activity including deposits, withdrawals, \
         and transfers."
    } else if lower.contains("help") {
        "I can help with checking your balance, making transfers, and \
         reviewing your transaction history. What would you like to do today?"
    } else {
        "I'm your banking assistant. I can help with checking your balance, \
         making transfers, and reviewing your transaction history. How can I \
         assist you today?"
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "What's my balance?".to_string(),
            }],
            temperature: 0.7,
            max_tokens: 150,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-3.5-turbo"));
        assert!(json.contains("What's my balance?"));
        assert!(json.contains("max_tokens"));
    }

    #[test]
    fn test_canned_reply_selection() {
        assert!(canned_reply("what is my BALANCE").contains("account balance"));
        assert!(canned_reply("how do I transfer money").contains("Transfer $50 to John"));
        assert!(canned_reply("show my transactions").contains("transaction"));
        assert!(canned_reply("recent history?").contains("transaction"));
        assert!(canned_reply("Can you help me invest?").starts_with("I can help with checking"));
        assert!(canned_reply("what's the weather").starts_with("I'm your banking assistant"));
    }

    #[test]
    fn test_canned_reply_priority() {
        // "balance" outranks later keywords when several appear.
        let reply = canned_reply("help me check my balance history");
        assert!(reply.contains("account balance"));
    }

    #[tokio::test]
    async fn test_respond_without_key_never_fails() {
        let assistant = FallbackAssistant::new(None);
        let reply = assistant
            .respond("Can you help me invest?", "ignored context")
            .await;
        assert!(reply.starts_with("I can help with checking"));
    }
}
