// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence and the unit of work that sits on top of it.
//!
//! Each top-level collection of [`AppState`] lives under its own key as a JSON
//! document. [`Workspace::apply`] runs an engine operation against a copy of
//! the state and writes back only the keys that changed, in one batch.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::db;
use crate::engine::{net_worth, stats};
use crate::error::{CoreError, Result};
use crate::state::{AppState, default_categories};

pub const KEYS: [&str; 14] = [
    "categories",
    "rawTransactions",
    "bankAccounts",
    "creditCards",
    "receivables",
    "payables",
    "longTermLiabilities",
    "shortTermLiabilities",
    "financialGoals",
    "recurringTransactions",
    "assets",
    "budgets",
    "netWorthSnapshots",
    "userSettings",
];

/// Keys an import must carry to be accepted.
pub const REQUIRED_IMPORT_KEYS: [&str; 3] = ["categories", "rawTransactions", "userSettings"];

pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<Value>>;
    fn save(&mut self, key: &str, value: &Value) -> Result<()>;
    /// Writes every entry or none of them.
    fn save_batch(&mut self, entries: &[(String, Value)]) -> Result<()>;
}

/// Loads `key` and decodes it, falling back to `default` when it is absent.
pub fn load_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> Result<T> {
    match store.load(key)? {
        Some(v) => Ok(serde_json::from_value(v)?),
        None => Ok(default),
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn save_batch(&mut self, entries: &[(String, Value)]) -> Result<()> {
        for (k, v) in entries {
            self.entries.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}

/// Store backed by the `kv` table of a sqlite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| r.get(0))
            .optional()?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value.to_string()],
        )?;
        Ok(())
    }

    fn save_batch(&mut self, entries: &[(String, Value)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (k, v) in entries {
            tx.execute(
                "INSERT INTO kv(key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![k, v.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn to_entries(state: &AppState) -> Result<Map<String, Value>> {
    match serde_json::to_value(state)? {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::validation("state did not serialize to an object")),
    }
}

/// In-memory state plus the store it came from.
pub struct Workspace<S: KeyValueStore> {
    store: S,
    state: AppState,
}

impl<S: KeyValueStore> Workspace<S> {
    /// Reads every key. A store that has never been written gets the default
    /// categories.
    pub fn load(store: S) -> Result<Self> {
        let mut map = Map::new();
        for key in KEYS {
            if let Some(v) = store.load(key)? {
                map.insert(key.to_string(), v);
            }
        }
        let seeded = !map.contains_key("categories");
        let mut state: AppState = serde_json::from_value(Value::Object(map))?;
        if seeded {
            state.categories = default_categories();
        }
        debug!(transactions = state.transactions.len(), "loaded workspace");
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs `op` on a copy of the state. On success the changed keys are
    /// written in one batch and the copy becomes the current state; on any
    /// error neither memory nor storage changes.
    pub fn apply<T>(&mut self, op: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let mut next = self.state.clone();
        let out = op(&mut next)?;

        let before = to_entries(&self.state)?;
        let after = to_entries(&next)?;
        let changed: Vec<(String, Value)> = after
            .into_iter()
            .filter(|(k, v)| before.get(k) != Some(v))
            .collect();
        if !changed.is_empty() {
            let keys: Vec<&str> = changed.iter().map(|(k, _)| k.as_str()).collect();
            debug!(?keys, "committing");
            self.store.save_batch(&changed)?;
        }
        self.state = next;
        Ok(out)
    }

    /// Writes every key, including ones the store has never seen.
    pub fn persist_all(&mut self) -> Result<()> {
        let entries: Vec<(String, Value)> = to_entries(&self.state)?.into_iter().collect();
        self.store.save_batch(&entries)
    }

    /// Brings stored statuses up to date for `today`.
    pub fn refresh(&mut self, today: chrono::NaiveDate) -> Result<()> {
        self.apply(|state| {
            stats::refresh_all_statuses(state, today);
            Ok(())
        })
    }

    /// Full snapshot: every key plus the derived cash balance and a timestamp.
    pub fn export_all(&self) -> Result<Value> {
        let mut map = to_entries(&self.state)?;
        map.insert(
            "cashBalance".to_string(),
            serde_json::to_value(net_worth::cash_balance(&self.state))?,
        );
        map.insert(
            "exportedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(Value::Object(map))
    }

    /// Replaces every collection with the contents of an export. Derived
    /// fields in the payload (`cashBalance`, `exportedAt`) are ignored.
    pub fn import_all(&mut self, value: Value) -> Result<()> {
        let Value::Object(mut map) = value else {
            return Err(CoreError::validation("import payload must be a JSON object"));
        };
        let missing: Vec<&str> = REQUIRED_IMPORT_KEYS
            .into_iter()
            .filter(|k| !map.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::validation(format!(
                "import is missing required keys: {}",
                missing.join(", ")
            )));
        }
        map.retain(|k, _| KEYS.contains(&k.as_str()));
        let state: AppState = serde_json::from_value(Value::Object(map))?;
        state.user_settings.validate()?;

        let entries: Vec<(String, Value)> = to_entries(&state)?.into_iter().collect();
        self.store.save_batch(&entries)?;
        info!(
            transactions = state.transactions.len(),
            accounts = state.bank_accounts.len(),
            "imported data"
        );
        self.state = state;
        Ok(())
    }
}
