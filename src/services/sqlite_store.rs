//! SQLite-backed key/value store.
//!
//! Holds the dashboard's persisted state under fixed string keys:
//! - `apiKey`, `apiSecret`, `useTestnet` (credentials from the settings form)
//! - `tradeHistory` (JSON list of trades, append-only)

use crate::error::Result;
use crate::types::{Credentials, Trade};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub const KEY_API_KEY: &str = "apiKey";
pub const KEY_API_SECRET: &str = "apiSecret";
pub const KEY_USE_TESTNET: &str = "useTestnet";
pub const KEY_TRADE_HISTORY: &str = "tradeHistory";

/// SQLite store for persisted dashboard state.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    // ========== Raw Key/Value Methods ==========

    /// Get the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();
        write_value(&conn, key, value)?;
        Ok(())
    }

    // ========== Credentials Methods ==========

    /// Persist credentials from the settings form.
    pub fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        write_value(&tx, KEY_API_KEY, &credentials.api_key)?;
        write_value(&tx, KEY_API_SECRET, &credentials.api_secret)?;
        write_value(&tx, KEY_USE_TESTNET, if credentials.use_testnet { "true" } else { "false" })?;
        tx.commit()?;

        debug!("Saved API credentials (testnet: {})", credentials.use_testnet);
        Ok(())
    }

    /// Load persisted credentials. Missing key or secret read as `None`;
    /// the testnet flag is on unless stored as the literal `"false"`.
    pub fn load_credentials(&self) -> Result<(Option<String>, Option<String>, bool)> {
        let api_key = self.get_value(KEY_API_KEY)?;
        let api_secret = self.get_value(KEY_API_SECRET)?;
        let use_testnet = self.get_value(KEY_USE_TESTNET)?.as_deref() != Some("false");
        Ok((api_key, api_secret, use_testnet))
    }

    // ========== Trade History Methods ==========

    /// Append a trade to the persisted history. Returns the new length.
    pub fn append_trade(&self, trade: &Trade) -> Result<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![KEY_TRADE_HISTORY],
                |row| row.get(0),
            )
            .optional()?;

        let mut history: Vec<Trade> = match existing {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        history.push(trade.clone());

        write_value(&tx, KEY_TRADE_HISTORY, &serde_json::to_string(&history)?)?;
        tx.commit()?;

        debug!("Appended trade {} (history length {})", trade.id, history.len());
        Ok(history.len())
    }

    /// Get the full trade history, oldest first.
    pub fn get_trade_history(&self) -> Result<Vec<Trade>> {
        match self.get_value(KEY_TRADE_HISTORY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Number of persisted trades.
    pub fn trade_count(&self) -> Result<usize> {
        Ok(self.get_trade_history()?.len())
    }
}

fn write_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value, chrono::Utc::now().timestamp_millis()],
    )
}
