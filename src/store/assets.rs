// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rusqlite::Connection;
use tracing::{debug, warn};

use super::{new_id, normalize_currency, normalize_optional, now, required_text};
use crate::db::{self, KEY_ASSETS};
use crate::error::Result;
use crate::models::{Asset, AssetPatch, AssetType, NewAsset};

#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub asset_type: Option<AssetType>,
    pub include_in_total: Option<bool>,
}

impl AssetFilter {
    fn matches(&self, a: &Asset) -> bool {
        self.asset_type.is_none_or(|t| a.asset_type == t)
            && self.include_in_total.is_none_or(|f| a.include_in_total == f)
    }
}

/// Balance-bearing assets. The store itself enforces no balance rule; bill
/// mutations keep balances in step through [`AssetStore::apply_delta`].
pub struct AssetStore<'a> {
    conn: &'a Connection,
}

impl<'a> AssetStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn load(&self) -> Result<Vec<Asset>> {
        db::load_collection(self.conn, KEY_ASSETS)
    }

    pub fn list(&self, filter: Option<&AssetFilter>) -> Result<Vec<Asset>> {
        let items = self.load()?;
        Ok(match filter {
            Some(f) => items.into_iter().filter(|a| f.matches(a)).collect(),
            None => items,
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<Asset>> {
        Ok(self.load()?.into_iter().find(|a| a.id == id))
    }

    pub fn add(&self, spec: NewAsset) -> Result<Asset> {
        let mut items = self.load()?;
        let ts = now();
        let balance = spec.balance.unwrap_or(Decimal::ZERO);
        let asset = Asset {
            id: new_id(),
            name: required_text("asset name", &spec.name)?,
            asset_type: spec.asset_type,
            balance,
            opening_balance: balance,
            currency: normalize_currency(spec.currency),
            include_in_total: spec.include_in_total.unwrap_or(true),
            notes: normalize_optional(spec.notes),
            created_at: ts,
            updated_at: ts,
        };
        items.push(asset.clone());
        db::save_collection(self.conn, KEY_ASSETS, &items)?;
        debug!(asset_id = %asset.id, balance = %asset.balance, "asset added");
        Ok(asset)
    }

    pub fn update(&self, id: &str, patch: AssetPatch) -> Result<Option<Asset>> {
        let mut items = self.load()?;
        let Some(asset) = items.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            asset.name = required_text("asset name", &name)?;
        }
        if let Some(t) = patch.asset_type {
            asset.asset_type = t;
        }
        if let Some(balance) = patch.balance {
            // A manual override moves the baseline, not the bill history.
            asset.opening_balance += balance - asset.balance;
            asset.balance = balance;
        }
        if let Some(currency) = patch.currency {
            asset.currency = normalize_currency(Some(currency));
        }
        if let Some(flag) = patch.include_in_total {
            asset.include_in_total = flag;
        }
        if let Some(notes) = patch.notes {
            asset.notes = normalize_optional(notes);
        }
        asset.updated_at = now();
        let updated = asset.clone();
        db::save_collection(self.conn, KEY_ASSETS, &items)?;
        debug!(asset_id = %id, "asset updated");
        Ok(Some(updated))
    }

    /// Add `delta` to the stored balance of `id`.
    ///
    /// The balance is read and written back in the same call, so callers
    /// never write a stale copy over a newer one. Returns `None` when the
    /// asset was deleted after a bill referencing it was recorded; the delta
    /// is dropped.
    pub fn apply_delta(&self, id: &str, delta: Decimal) -> Result<Option<Asset>> {
        let mut items = self.load()?;
        let Some(asset) = items.iter_mut().find(|a| a.id == id) else {
            warn!(asset_id = %id, %delta, "balance delta skipped: asset missing");
            return Ok(None);
        };
        asset.balance += delta;
        asset.updated_at = now();
        let updated = asset.clone();
        db::save_collection(self.conn, KEY_ASSETS, &items)?;
        debug!(asset_id = %id, %delta, balance = %updated.balance, "balance adjusted");
        Ok(Some(updated))
    }

    /// Unconditional; bills referencing the asset are left as they are.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|a| a.id != id);
        if items.len() == before {
            return Ok(false);
        }
        db::save_collection(self.conn, KEY_ASSETS, &items)?;
        debug!(asset_id = %id, "asset removed");
        Ok(true)
    }
}
