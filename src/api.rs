// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The facade collaborators call. Each call waits `latency` (emulating a
//! remote backend) and then goes straight to the stores.

use chrono::NaiveDate;
use std::thread;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::trace;

use crate::error::Result;
use crate::events::LedgerEvent;
use crate::models::*;
use crate::query::{
    self, AccountSummary, AssetOverview, BillFilter, CategoryStat, DailyStat, Page, PageRequest,
    SortOrder,
};
use crate::store::Ledger;
use crate::store::assets::AssetFilter;

pub struct LocalApi {
    ledger: Ledger,
    latency: Duration,
}

impl LocalApi {
    pub fn new(ledger: Ledger, latency: Duration) -> Self {
        Self { ledger, latency }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.ledger.subscribe()
    }

    fn pause(&self, op: &str) {
        trace!(op, latency_ms = self.latency.as_millis() as u64, "api call");
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }

    // -- identity

    pub fn current_user(&self) -> Result<Option<User>> {
        self.pause("user.current");
        self.ledger.user().current()
    }

    pub fn register(&self, username: &str, email: &str) -> Result<User> {
        self.pause("user.register");
        self.ledger.user().register(username, email)
    }

    pub fn login(&self, identifier: &str) -> Result<Option<User>> {
        self.pause("user.login");
        self.ledger.user().login(identifier)
    }

    pub fn logout(&self) -> Result<()> {
        self.pause("user.logout");
        self.ledger.user().logout()
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Option<User>> {
        self.pause("user.update");
        self.ledger.user().update_profile(patch)
    }

    // -- accounts

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.pause("accounts.list");
        self.ledger.accounts().list()
    }

    pub fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.pause("accounts.get");
        self.ledger.accounts().get(id)
    }

    pub fn create_account(&self, spec: NewAccount) -> Result<Account> {
        self.pause("accounts.create");
        self.ledger.accounts().add(spec)
    }

    pub fn update_account(&self, id: &str, patch: AccountPatch) -> Result<Option<Account>> {
        self.pause("accounts.update");
        self.ledger.accounts().update(id, patch)
    }

    pub fn delete_account(&self, id: &str) -> Result<bool> {
        self.pause("accounts.delete");
        self.ledger.accounts().remove(id)
    }

    // -- assets

    pub fn list_assets(&self, filter: Option<&AssetFilter>) -> Result<Vec<Asset>> {
        self.pause("assets.list");
        self.ledger.assets().list(filter)
    }

    pub fn get_asset(&self, id: &str) -> Result<Option<Asset>> {
        self.pause("assets.get");
        self.ledger.assets().get(id)
    }

    pub fn create_asset(&self, spec: NewAsset) -> Result<Asset> {
        self.pause("assets.create");
        self.ledger.assets().add(spec)
    }

    pub fn update_asset(&self, id: &str, patch: AssetPatch) -> Result<Option<Asset>> {
        self.pause("assets.update");
        self.ledger.assets().update(id, patch)
    }

    pub fn delete_asset(&self, id: &str) -> Result<bool> {
        self.pause("assets.delete");
        self.ledger.assets().remove(id)
    }

    // -- categories

    pub fn list_categories(&self, type_filter: Option<CategoryType>) -> Result<Vec<Category>> {
        self.pause("categories.list");
        self.ledger.categories().list(type_filter)
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>> {
        self.pause("categories.get");
        self.ledger.categories().get(id)
    }

    pub fn create_category(&self, spec: NewCategory) -> Result<Category> {
        self.pause("categories.create");
        self.ledger.categories().add(spec)
    }

    pub fn update_category(&self, id: &str, patch: CategoryPatch) -> Result<Option<Category>> {
        self.pause("categories.update");
        self.ledger.categories().update(id, patch)
    }

    pub fn delete_category(&self, id: &str) -> Result<bool> {
        self.pause("categories.delete");
        self.ledger.categories().remove(id)
    }

    // -- bills

    pub fn list_bills(
        &self,
        filter: &BillFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<Bill>> {
        self.pause("bills.list");
        self.ledger.bills().list(filter, order, page)
    }

    pub fn get_bill(&self, id: &str) -> Result<Option<Bill>> {
        self.pause("bills.get");
        self.ledger.bills().get(id)
    }

    pub fn create_bill(&self, spec: NewBill) -> Result<Bill> {
        self.pause("bills.create");
        self.ledger.bills().add(spec)
    }

    pub fn update_bill(&self, id: &str, patch: BillPatch) -> Result<Option<Bill>> {
        self.pause("bills.update");
        self.ledger.bills().update(id, patch)
    }

    pub fn delete_bill(&self, id: &str) -> Result<bool> {
        self.pause("bills.delete");
        self.ledger.bills().remove(id)
    }

    // -- reports

    pub fn daily_report(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyStat>> {
        self.pause("reports.daily");
        Ok(query::daily_summary(&self.ledger.bills().all()?, start, end))
    }

    pub fn category_report(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        category_type: CategoryType,
    ) -> Result<Vec<CategoryStat>> {
        self.pause("reports.category");
        Ok(query::category_summary(
            &self.ledger.bills().all()?,
            start,
            end,
            category_type,
        ))
    }

    pub fn account_report(
        &self,
        account_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<AccountSummary> {
        self.pause("reports.account");
        Ok(query::account_summary(
            &self.ledger.bills().all()?,
            account_id,
            start,
            end,
        ))
    }

    pub fn asset_overview(&self) -> Result<AssetOverview> {
        self.pause("reports.overview");
        Ok(query::asset_overview(&self.ledger.assets().list(None)?))
    }
}
