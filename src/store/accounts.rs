// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tracing::debug;

use super::{new_id, normalize_currency, normalize_optional, now, required_text};
use crate::db::{self, KEY_ACCOUNTS};
use crate::error::Result;
use crate::models::{Account, AccountPatch, NewAccount};

/// Ledgers ("books") that bills are filed under. No cross-entity rules.
pub struct AccountStore<'a> {
    conn: &'a Connection,
}

impl<'a> AccountStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> Result<Vec<Account>> {
        db::load_collection(self.conn, KEY_ACCOUNTS)
    }

    pub fn get(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.list()?.into_iter().find(|a| a.id == id))
    }

    pub fn add(&self, spec: NewAccount) -> Result<Account> {
        let mut items = self.list()?;
        let ts = now();
        let account = Account {
            id: new_id(),
            name: required_text("account name", &spec.name)?,
            description: normalize_optional(spec.description),
            currency: normalize_currency(spec.currency),
            is_shared: spec.is_shared,
            members: spec.members,
            created_at: ts,
            updated_at: ts,
        };
        items.push(account.clone());
        db::save_collection(self.conn, KEY_ACCOUNTS, &items)?;
        debug!(account_id = %account.id, name = %account.name, "account added");
        Ok(account)
    }

    pub fn update(&self, id: &str, patch: AccountPatch) -> Result<Option<Account>> {
        let mut items = self.list()?;
        let Some(account) = items.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            account.name = required_text("account name", &name)?;
        }
        if let Some(description) = patch.description {
            account.description = normalize_optional(description);
        }
        if let Some(currency) = patch.currency {
            account.currency = normalize_currency(Some(currency));
        }
        if let Some(shared) = patch.is_shared {
            account.is_shared = shared;
        }
        if let Some(members) = patch.members {
            account.members = members;
        }
        account.updated_at = now();
        let updated = account.clone();
        db::save_collection(self.conn, KEY_ACCOUNTS, &items)?;
        debug!(account_id = %id, "account updated");
        Ok(Some(updated))
    }

    /// Bills filed under the account keep their reference.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.list()?;
        let before = items.len();
        items.retain(|a| a.id != id);
        if items.len() == before {
            return Ok(false);
        }
        db::save_collection(self.conn, KEY_ACCOUNTS, &items)?;
        debug!(account_id = %id, "account removed");
        Ok(true)
    }
}
