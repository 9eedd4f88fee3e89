// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entity stores over the key-value collections in [`crate::db`].
//!
//! Every store is a thin view borrowing the [`Ledger`]'s connection. A
//! `Ledger` owns a `rusqlite::Connection`, which is `!Sync`, so the whole
//! engine has exactly one writer context: whoever holds the `Ledger`.

pub mod accounts;
pub mod assets;
pub mod bills;
pub mod categories;
pub mod user;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::events::{LedgerEvent, LedgerEvents};

pub use accounts::AccountStore;
pub use assets::AssetStore;
pub use bills::{BalanceEffect, BillStore, balance_effects, reversal_effects};
pub use categories::CategoryStore;
pub use user::UserStore;

/// Attribution used for bills recorded while nobody is signed in.
pub const LOCAL_USER_ID: &str = "local";

pub struct Ledger {
    conn: Connection,
    events: LedgerEvents,
}

impl Ledger {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            events: LedgerEvents::default(),
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn user(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn accounts(&self) -> AccountStore<'_> {
        AccountStore::new(&self.conn)
    }

    pub fn assets(&self) -> AssetStore<'_> {
        AssetStore::new(&self.conn)
    }

    pub fn categories(&self) -> CategoryStore<'_> {
        CategoryStore::new(&self.conn)
    }

    pub fn bills(&self) -> BillStore<'_> {
        BillStore::new(&self.conn, &self.events)
    }

    /// Receive a notification after every committed bill mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Trimmed copy of `s`, or a validation error naming `field` when blank.
pub(crate) fn required_text(field: &str, s: &str) -> crate::error::Result<String> {
    let t = s.trim();
    if t.is_empty() {
        return Err(crate::error::LedgerError::invalid(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(t.to_string())
}

pub(crate) fn normalize_optional(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub(crate) fn normalize_currency(s: Option<String>) -> String {
    normalize_optional(s)
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| crate::config::DEFAULT_CURRENCY.to_string())
}
