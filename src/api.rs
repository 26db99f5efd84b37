//! REST API for the banking assistant
//!
//! Exposes login, chat, and transaction-history endpoints consumed by the
//! front end. Banking-domain failures always come back as structured
//! `{success: false, message}` payloads; only storage failures surface as 500.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::interpreter::{ChatOutcome, CommandInterpreter};
use crate::store::AccountStore;

/// Most recent records returned by the transactions endpoint.
const TRANSACTIONS_LIMIT: i64 = 10;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub username: String,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub interpreter: Arc<CommandInterpreter>,
    pub store: Arc<dyn AccountStore>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Auth Endpoints
/// =============================

async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let account = match state.store.find_by_username(&req.username).await {
        Ok(account) => account,
        Err(e) => return internal_error(e),
    };

    match account {
        Some(account) if account.password == req.password => {
            info!("Login succeeded for '{}'", account.username);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "user": {
                        "username": account.username,
                        "full_name": account.full_name,
                        "balance": account.balance,
                    }
                })),
            )
        }
        _ => {
            info!("Login failed for '{}'", req.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "message": "Invalid credentials"})),
            )
        }
    }
}

/// No server-side session state; the client discards its copy.
async fn logout() -> Json<serde_json::Value> {
    Json(json!({"success": true}))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    info!("Chat message from '{}'", req.username);

    match state
        .interpreter
        .handle_message(&req.username, &req.message)
        .await
    {
        Ok(ChatOutcome::Reply(message)) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": message})),
        ),
        Ok(ChatOutcome::Rejected(message)) => (
            StatusCode::OK,
            Json(json!({"success": false, "message": message})),
        ),
        Ok(ChatOutcome::UnknownUser) => user_not_found(),
        Err(e) => internal_error(e),
    }
}

/// =============================
/// Transactions Endpoint
/// =============================

async fn transactions(
    State(state): State<ApiState>,
    Query(query): Query<TransactionsQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let account = match state.store.find_by_username(&query.username).await {
        Ok(Some(account)) => account,
        Ok(None) => return user_not_found(),
        Err(e) => return internal_error(e),
    };

    match state
        .store
        .recent_transactions(account.id, TRANSACTIONS_LIMIT)
        .await
    {
        Ok(records) => (
            StatusCode::OK,
            Json(json!({"success": true, "transactions": records})),
        ),
        Err(e) => internal_error(e),
    }
}

/// =============================
/// Helpers
/// =============================

fn user_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": "User not found"})),
    )
}

fn internal_error(e: crate::error::BankError) -> (StatusCode, Json<serde_json::Value>) {
    error!("Request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "message": format!("Internal error: {}", e)})),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(interpreter: Arc<CommandInterpreter>, store: Arc<dyn AccountStore>) -> Router {
    let state = ApiState { interpreter, store };

    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/chat", post(chat))
        .route("/api/transactions", get(transactions))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    interpreter: Arc<CommandInterpreter>,
    store: Arc<dyn AccountStore>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(interpreter, store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
