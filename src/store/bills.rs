// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The bill log and its balance bookkeeping.
//!
//! Every mutation runs inside one SQLite transaction: references are
//! resolved first, balance effects go through [`AssetStore::apply_delta`],
//! and the bill collection is written last. Any error rolls the whole
//! operation back. Reversal always runs before re-application (update) and
//! before removal (delete).

use rust_decimal::Decimal;
use rusqlite::Connection;
use tracing::{debug, info};

use super::{AccountStore, AssetStore, CategoryStore, UserStore, LOCAL_USER_ID};
use super::{new_id, normalize_currency, normalize_optional, now};
use crate::db::{self, KEY_BILLS};
use crate::error::{LedgerError, Result};
use crate::events::{LedgerEvent, LedgerEvents};
use crate::models::{Account, Asset, Bill, BillPatch, BillType, Category, NewBill};
use crate::query::{self, BillFilter, Page, PageRequest, SortOrder};

/// Signed change a bill applies to one asset balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEffect {
    pub asset_id: String,
    pub delta: Decimal,
}

/// Effects of `bill` as applied at creation. Reversal negates each one.
pub fn balance_effects(bill: &Bill) -> Vec<BalanceEffect> {
    let effect = |asset_id: &str, delta: Decimal| BalanceEffect {
        asset_id: asset_id.to_string(),
        delta,
    };
    match bill.bill_type {
        BillType::Income => vec![effect(&bill.asset_id, bill.amount)],
        BillType::Expense => vec![effect(&bill.asset_id, -bill.amount)],
        BillType::Transfer => {
            let mut out = vec![effect(&bill.asset_id, -bill.amount)];
            if let Some(to) = &bill.to_asset_id {
                out.push(effect(to, bill.amount));
            }
            out
        }
    }
}

/// Exact inverse of [`balance_effects`], covering both sides of a transfer.
pub fn reversal_effects(bill: &Bill) -> Vec<BalanceEffect> {
    balance_effects(bill)
        .into_iter()
        .map(|e| BalanceEffect {
            delta: -e.delta,
            ..e
        })
        .collect()
}

/// Entities a bill points at, resolved against their stores.
struct Refs {
    account: Account,
    asset: Asset,
    to_account: Option<Account>,
    to_asset: Option<Asset>,
    category: Category,
}

pub struct BillStore<'a> {
    conn: &'a Connection,
    events: &'a LedgerEvents,
}

impl<'a> BillStore<'a> {
    pub(crate) fn new(conn: &'a Connection, events: &'a LedgerEvents) -> Self {
        Self { conn, events }
    }

    /// Every bill, in insertion order.
    pub fn all(&self) -> Result<Vec<Bill>> {
        db::load_collection(self.conn, KEY_BILLS)
    }

    pub fn get(&self, id: &str) -> Result<Option<Bill>> {
        Ok(self.all()?.into_iter().find(|b| b.id == id))
    }

    pub fn list(
        &self,
        filter: &BillFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<Bill>> {
        let mut bills = query::filter_bills(self.all()?, filter);
        query::sort_bills(&mut bills, order);
        Ok(query::paginate(bills, page))
    }

    pub fn add(&self, spec: NewBill) -> Result<Bill> {
        let tx = self.conn.unchecked_transaction()?;
        let ts = now();
        let mut bill = Bill {
            id: new_id(),
            account_id: spec.account_id.trim().to_string(),
            asset_id: spec.asset_id.trim().to_string(),
            to_account_id: normalize_optional(spec.to_account_id),
            to_asset_id: normalize_optional(spec.to_asset_id),
            category_id: spec.category_id.trim().to_string(),
            amount: spec.amount,
            currency: String::new(),
            bill_type: spec.bill_type,
            description: normalize_optional(spec.description),
            date: spec.date,
            user_id: attribution(&tx)?,
            created_at: ts,
            updated_at: ts,
            account_name: String::new(),
            asset_name: String::new(),
            to_account_name: None,
            to_asset_name: None,
            category_name: String::new(),
            category_icon: None,
            category_color: None,
        };
        let refs = resolve(&tx, &bill)?;
        bill.currency = match spec.currency {
            Some(c) => normalize_currency(Some(c)),
            None => refs.asset.currency.clone(),
        };
        snapshot_all(&mut bill, &refs);

        apply_effects(&tx, &balance_effects(&bill))?;
        let mut bills: Vec<Bill> = db::load_collection(&tx, KEY_BILLS)?;
        bills.push(bill.clone());
        db::save_collection(&tx, KEY_BILLS, &bills)?;
        tx.commit()?;

        info!(
            bill_id = %bill.id,
            bill_type = %bill.bill_type,
            amount = %bill.amount,
            asset_id = %bill.asset_id,
            "bill created"
        );
        self.events.publish(LedgerEvent::BillCreated(bill.id.clone()));
        Ok(bill)
    }

    /// Reverse-then-reapply. Returns `None` when `id` is unknown.
    pub fn update(&self, id: &str, patch: BillPatch) -> Result<Option<Bill>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut bills: Vec<Bill> = db::load_collection(&tx, KEY_BILLS)?;
        let Some(idx) = bills.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let old = bills[idx].clone();
        let rebalance = patch.touches_balance();
        let keep_currency = patch.currency.is_some();
        let mut new = merge(&old, patch);
        let refs = resolve(&tx, &new)?;
        if !keep_currency && new.asset_id != old.asset_id {
            new.currency = refs.asset.currency.clone();
        }
        snapshot_changed(&mut new, &old, &refs);
        new.updated_at = now();

        if rebalance {
            apply_effects(&tx, &reversal_effects(&old))?;
            apply_effects(&tx, &balance_effects(&new))?;
        }
        bills[idx] = new.clone();
        db::save_collection(&tx, KEY_BILLS, &bills)?;
        tx.commit()?;

        info!(
            bill_id = %id,
            rebalanced = rebalance,
            old_amount = %old.amount,
            new_amount = %new.amount,
            "bill updated"
        );
        self.events.publish(LedgerEvent::BillUpdated(id.to_string()));
        Ok(Some(new))
    }

    /// Reverses the bill's effect, then drops it. `false` when `id` is unknown.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let mut bills: Vec<Bill> = db::load_collection(&tx, KEY_BILLS)?;
        let Some(idx) = bills.iter().position(|b| b.id == id) else {
            debug!(bill_id = %id, "delete of unknown bill ignored");
            return Ok(false);
        };
        let bill = bills.remove(idx);
        apply_effects(&tx, &reversal_effects(&bill))?;
        db::save_collection(&tx, KEY_BILLS, &bills)?;
        tx.commit()?;

        info!(bill_id = %id, amount = %bill.amount, "bill deleted");
        self.events.publish(LedgerEvent::BillDeleted(id.to_string()));
        Ok(true)
    }
}

fn attribution(conn: &Connection) -> Result<String> {
    Ok(UserStore::new(conn)
        .current()?
        .map(|u| u.id)
        .unwrap_or_else(|| LOCAL_USER_ID.to_string()))
}

fn apply_effects(conn: &Connection, effects: &[BalanceEffect]) -> Result<()> {
    let assets = AssetStore::new(conn);
    for e in effects {
        assets.apply_delta(&e.asset_id, e.delta)?;
    }
    Ok(())
}

/// Validates the bill's shape and resolves every reference. Fails before
/// anything is written.
fn resolve(conn: &Connection, bill: &Bill) -> Result<Refs> {
    if bill.amount <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "amount must be positive, got {}",
            bill.amount
        )));
    }
    let is_transfer = bill.bill_type == BillType::Transfer;
    match (&bill.to_account_id, &bill.to_asset_id) {
        (Some(_), Some(to_asset)) if is_transfer => {
            if to_asset == &bill.asset_id {
                return Err(LedgerError::invalid(
                    "transfer source and destination asset must differ",
                ));
            }
        }
        (_, _) if is_transfer => {
            return Err(LedgerError::invalid(
                "transfer requires both to_account_id and to_asset_id",
            ));
        }
        (None, None) => {}
        _ => {
            return Err(LedgerError::invalid(format!(
                "{} bills cannot name a destination",
                bill.bill_type
            )));
        }
    }

    let accounts = AccountStore::new(conn);
    let assets = AssetStore::new(conn);
    let account = accounts
        .get(&bill.account_id)?
        .ok_or_else(|| LedgerError::missing("account", &bill.account_id))?;
    let asset = assets
        .get(&bill.asset_id)?
        .ok_or_else(|| LedgerError::missing("asset", &bill.asset_id))?;
    let category = CategoryStore::new(conn)
        .get(&bill.category_id)?
        .ok_or_else(|| LedgerError::missing("category", &bill.category_id))?;
    if let Some(expected) = bill.bill_type.category_type() {
        if category.category_type != expected {
            return Err(LedgerError::invalid(format!(
                "category '{}' is {}, bill is {}",
                category.name, category.category_type, bill.bill_type
            )));
        }
    }
    let to_account = match &bill.to_account_id {
        Some(id) => Some(
            accounts
                .get(id)?
                .ok_or_else(|| LedgerError::missing("account", id))?,
        ),
        None => None,
    };
    let to_asset = match &bill.to_asset_id {
        Some(id) => Some(
            assets
                .get(id)?
                .ok_or_else(|| LedgerError::missing("asset", id))?,
        ),
        None => None,
    };
    Ok(Refs {
        account,
        asset,
        to_account,
        to_asset,
        category,
    })
}

/// Applies `patch` over `old`. Leaving `Transfer` drops the destination
/// unless the patch names one, which `resolve` then rejects.
fn merge(old: &Bill, patch: BillPatch) -> Bill {
    let mut b = old.clone();
    let names_destination = patch.to_account_id.is_some() || patch.to_asset_id.is_some();
    if let Some(v) = patch.account_id {
        b.account_id = v.trim().to_string();
    }
    if let Some(v) = patch.asset_id {
        b.asset_id = v.trim().to_string();
    }
    if let Some(v) = patch.to_account_id {
        b.to_account_id = normalize_optional(v);
    }
    if let Some(v) = patch.to_asset_id {
        b.to_asset_id = normalize_optional(v);
    }
    if let Some(v) = patch.category_id {
        b.category_id = v.trim().to_string();
    }
    if let Some(v) = patch.amount {
        b.amount = v;
    }
    if let Some(v) = patch.currency {
        b.currency = normalize_currency(Some(v));
    }
    if let Some(v) = patch.bill_type {
        b.bill_type = v;
    }
    if let Some(v) = patch.description {
        b.description = normalize_optional(v);
    }
    if let Some(v) = patch.date {
        b.date = v;
    }
    if old.bill_type == BillType::Transfer
        && b.bill_type != BillType::Transfer
        && !names_destination
    {
        b.to_account_id = None;
        b.to_asset_id = None;
    }
    b
}

fn snapshot_all(bill: &mut Bill, refs: &Refs) {
    bill.account_name = refs.account.name.clone();
    bill.asset_name = refs.asset.name.clone();
    bill.to_account_name = refs.to_account.as_ref().map(|a| a.name.clone());
    bill.to_asset_name = refs.to_asset.as_ref().map(|a| a.name.clone());
    bill.category_name = refs.category.name.clone();
    bill.category_icon = refs.category.icon.clone();
    bill.category_color = refs.category.color.clone();
}

/// Refreshes only the snapshots whose reference changed.
fn snapshot_changed(bill: &mut Bill, old: &Bill, refs: &Refs) {
    if bill.account_id != old.account_id {
        bill.account_name = refs.account.name.clone();
    }
    if bill.asset_id != old.asset_id {
        bill.asset_name = refs.asset.name.clone();
    }
    if bill.to_account_id != old.to_account_id {
        bill.to_account_name = refs.to_account.as_ref().map(|a| a.name.clone());
    }
    if bill.to_asset_id != old.to_asset_id {
        bill.to_asset_name = refs.to_asset.as_ref().map(|a| a.name.clone());
    }
    if bill.category_id != old.category_id {
        bill.category_name = refs.category.name.clone();
        bill.category_icon = refs.category.icon.clone();
        bill.category_color = refs.category.color.clone();
    }
}
