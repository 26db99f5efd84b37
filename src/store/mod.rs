//! Account persistence layer
//!
//! Owns the `users` and `transactions` tables. Subsystems go through the
//! `AccountStore` trait; only this module executes SQL.

use crate::error::BankError;
use crate::models::{Account, TransactionKind, TransactionRecord};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// Seeded demonstration account, created at startup if absent.
pub const DEMO_USERNAME: &str = "demo_user";
const DEMO_PASSWORD: &str = "password123";
const DEMO_FULL_NAME: &str = "Demo User";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_BALANCE: f64 = 5000.00;

/// Trait for account and ledger persistence
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Exact match on login name. Returns the full record including the
    /// stored credential; the caller is responsible for comparison.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<Account>>;

    /// The `limit` most recent records for the account, newest first.
    /// Each call re-queries current state.
    async fn recent_transactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>>;

    /// Apply a balance mutation and append the matching ledger record.
    ///
    /// Deposits increase the balance by `amount`; withdrawals and transfers
    /// decrease it. Both writes run in one transaction, and debits are a
    /// single conditional statement, so a concurrent debit can never
    /// overdraw the account or lose an update. Zero affected rows on the
    /// guarded debit means insufficient funds; the caller has already
    /// resolved the account. Positivity of `amount` is the caller's job.
    async fn apply_transaction(
        &self,
        user_id: i64,
        kind: TransactionKind,
        amount: f64,
        recipient: Option<&str>,
    ) -> Result<()>;
}

/// SQLite-backed store
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Open (creating if missing) a file-backed database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database (used in tests and the demo binary).
    /// Single connection: each SQLite in-memory connection is its own
    /// database, so a larger pool would see empty schemas.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    /// Create both tables if they don't exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
              id INTEGER PRIMARY KEY,
              username TEXT NOT NULL UNIQUE,
              password TEXT NOT NULL,
              full_name TEXT NOT NULL,
              email TEXT NOT NULL UNIQUE,
              balance REAL NOT NULL DEFAULT 1000.00
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
              id INTEGER PRIMARY KEY,
              user_id INTEGER NOT NULL,
              kind TEXT NOT NULL,
              amount REAL NOT NULL,
              recipient TEXT,
              created_at TEXT NOT NULL,
              FOREIGN KEY (user_id) REFERENCES users (id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert the demonstration account if it isn't present yet.
    pub async fn seed_demo_account(&self) -> Result<()> {
        if self.find_by_username(DEMO_USERNAME).await?.is_some() {
            return Ok(());
        }

        self.create_account(
            DEMO_USERNAME,
            DEMO_PASSWORD,
            DEMO_FULL_NAME,
            DEMO_EMAIL,
            DEMO_BALANCE,
        )
        .await?;

        info!("Seeded demo account '{}'", DEMO_USERNAME);
        Ok(())
    }

    /// Provision a new account with an opening balance. Returns its id.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        email: &str,
        balance: f64,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, full_name, email, balance)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(username)
        .bind(password)
        .bind(full_name)
        .bind(email)
        .bind(balance)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait::async_trait]
impl AccountStore for SqliteAccountStore {

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, username, password, full_name, email, balance FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| account_from_row(&r)).transpose()
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, username, password, full_name, email, balance FROM users WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| account_from_row(&r)).transpose()
    }

    async fn recent_transactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, kind, amount, recipient, created_at
            FROM transactions
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn apply_transaction(
        &self,
        user_id: i64,
        kind: TransactionKind,
        amount: f64,
        recipient: Option<&str>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if kind.is_debit() {
            let updated = sqlx::query(
                "UPDATE users SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?3",
            )
            .bind(amount)
            .bind(user_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

            // Dropping the transaction rolls back; no record is appended.
            if updated.rows_affected() == 0 {
                return Err(BankError::InsufficientFunds);
            }
        } else {
            sqlx::query("UPDATE users SET balance = balance + ?1 WHERE id = ?2")
                .bind(amount)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (user_id, kind, amount, recipient, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(user_id)
        .bind(kind.as_db_str())
        .bind(amount)
        .bind(recipient)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn account_from_row(row: &SqliteRow) -> Result<Account> {
    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        balance: row.try_get("balance")?,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<TransactionRecord> {
    let kind_raw: String = row.try_get("kind")?;
    let kind = TransactionKind::from_db_str(&kind_raw).ok_or_else(|| {
        sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: format!("unknown transaction kind: {kind_raw}").into(),
        }
    })?;

    Ok(TransactionRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind,
        amount: row.try_get("amount")?,
        recipient: row.try_get("recipient")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteAccountStore {
        let store = SqliteAccountStore::in_memory().await.unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    async fn test_account(store: &SqliteAccountStore, balance: f64) -> i64 {
        store
            .create_account("alice", "secret", "Alice Doe", "alice@example.com", balance)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let store = test_store().await;
        let id = test_account(&store, 1000.0).await;

        let account = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.full_name, "Alice Doe");
        assert_eq!(account.balance, 1000.0);

        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deposit_increases_balance_and_appends_record() {
        let store = test_store().await;
        let id = test_account(&store, 100.0).await;

        store
            .apply_transaction(id, TransactionKind::Deposit, 25.5, None)
            .await
            .unwrap();

        let account = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(account.balance, 125.5);

        let records = store.recent_transactions(id, 5).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, TransactionKind::Deposit);
        assert_eq!(records[0].amount, 25.5);
        assert!(records[0].recipient.is_none());
    }

    #[tokio::test]
    async fn test_debits_decrease_balance() {
        let store = test_store().await;
        let id = test_account(&store, 5000.0).await;

        store
            .apply_transaction(id, TransactionKind::Withdrawal, 100.0, None)
            .await
            .unwrap();
        store
            .apply_transaction(id, TransactionKind::Transfer, 50.0, Some("john"))
            .await
            .unwrap();

        let account = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(account.balance, 4850.0);

        let records = store.recent_transactions(id, 5).await.unwrap();
        assert_eq!(records.len(), 2);
        // Newest first
        assert_eq!(records[0].kind, TransactionKind::Transfer);
        assert_eq!(records[0].recipient.as_deref(), Some("john"));
        assert_eq!(records[1].kind, TransactionKind::Withdrawal);
    }

    #[tokio::test]
    async fn test_overdraw_is_rejected_atomically() {
        let store = test_store().await;
        let id = test_account(&store, 100.0).await;

        let result = store
            .apply_transaction(id, TransactionKind::Transfer, 500.0, Some("sam"))
            .await;
        assert!(matches!(result, Err(BankError::InsufficientFunds)));

        // Balance untouched and no record appended.
        let account = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(account.balance, 100.0);
        assert!(store.recent_transactions(id, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_transactions_limit_and_order() {
        let store = test_store().await;
        let id = test_account(&store, 1000.0).await;

        for i in 1..=7 {
            store
                .apply_transaction(id, TransactionKind::Deposit, f64::from(i), None)
                .await
                .unwrap();
        }

        let records = store.recent_transactions(id, 5).await.unwrap();
        assert_eq!(records.len(), 5);
        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[tokio::test]
    async fn test_seed_demo_account_is_idempotent() {
        let store = test_store().await;
        store.seed_demo_account().await.unwrap();
        store.seed_demo_account().await.unwrap();

        let account = store
            .find_by_username(DEMO_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 5000.0);
        assert_eq!(account.full_name, "Demo User");
    }
}
