// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Stateless filtering, paging and aggregation over bill snapshots.
//!
//! Nothing here touches storage; every function takes the bills (or assets)
//! it works on. Empty inputs give empty or zeroed results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Asset, AssetType, Bill, BillType, CategoryType};
use crate::store::balance_effects;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub account_id: Option<String>,
    /// Matches the source or the destination asset.
    pub asset_id: Option<String>,
    pub bill_type: Option<BillType>,
    pub category_id: Option<String>,
    /// Inclusive.
    pub start_date: Option<NaiveDate>,
    /// Inclusive.
    pub end_date: Option<NaiveDate>,
    pub keyword: Option<String>,
}

impl BillFilter {
    pub fn in_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start,
            end_date: end,
            ..Default::default()
        }
    }

    pub fn matches(&self, b: &Bill) -> bool {
        if let Some(a) = &self.account_id {
            if &b.account_id != a {
                return false;
            }
        }
        if let Some(a) = &self.asset_id {
            if &b.asset_id != a && b.to_asset_id.as_ref() != Some(a) {
                return false;
            }
        }
        if self.bill_type.is_some_and(|t| b.bill_type != t) {
            return false;
        }
        if let Some(c) = &self.category_id {
            if &b.category_id != c {
                return false;
            }
        }
        if self.start_date.is_some_and(|d| b.date < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| b.date > d) {
            return false;
        }
        if let Some(k) = &self.keyword {
            let k = k.trim().to_lowercase();
            if !k.is_empty() {
                let in_desc = b
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&k));
                let in_cat = b.category_name.to_lowercase().contains(&k);
                if !in_desc && !in_cat {
                    return false;
                }
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first, for listings.
    #[default]
    DateDesc,
    /// Oldest first, for time series.
    DateAsc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Everything on one page.
    pub fn all() -> Self {
        Self {
            page: 1,
            page_size: usize::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub fn filter_bills(bills: Vec<Bill>, filter: &BillFilter) -> Vec<Bill> {
    bills.into_iter().filter(|b| filter.matches(b)).collect()
}

/// Sorts by date, breaking ties on creation time then id.
pub fn sort_bills(bills: &mut [Bill], order: SortOrder) {
    bills.sort_by(|a, b| {
        let asc = a
            .date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id));
        match order {
            SortOrder::DateAsc => asc,
            SortOrder::DateDesc => asc.reverse(),
        }
    });
}

pub fn paginate<T>(items: Vec<T>, req: PageRequest) -> Page<T> {
    let page = req.page.max(1);
    let page_size = req.page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    Page {
        items,
        pagination: Pagination {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total > 0,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Per-day income and expense within the range, oldest first. Days without
/// bills are omitted; transfers are ignored.
pub fn daily_summary(
    bills: &[Bill],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<DailyStat> {
    let range = BillFilter::in_range(start, end);
    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for b in bills.iter().filter(|b| range.matches(b)) {
        if b.bill_type == BillType::Transfer {
            continue;
        }
        let entry = days.entry(b.date).or_insert((Decimal::ZERO, Decimal::ZERO));
        if b.bill_type == BillType::Income {
            entry.0 += b.amount;
        } else {
            entry.1 += b.amount;
        }
    }
    days.into_iter()
        .map(|(date, (income, expense))| DailyStat {
            date,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub category_id: String,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
    pub amount: Decimal,
    pub count: usize,
    /// Share of the type's total, 0–100, two decimals.
    pub percentage: Decimal,
}

/// Totals per category for one bill type, largest first.
pub fn category_summary(
    bills: &[Bill],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    category_type: CategoryType,
) -> Vec<CategoryStat> {
    let wanted = match category_type {
        CategoryType::Income => BillType::Income,
        CategoryType::Expense => BillType::Expense,
    };
    let filter = BillFilter {
        bill_type: Some(wanted),
        ..BillFilter::in_range(start, end)
    };
    let mut by_cat: HashMap<&str, CategoryStat> = HashMap::new();
    let mut total = Decimal::ZERO;
    for b in bills.iter().filter(|b| filter.matches(b)) {
        total += b.amount;
        let stat = by_cat
            .entry(b.category_id.as_str())
            .or_insert_with(|| CategoryStat {
                category_id: b.category_id.clone(),
                category_name: b.category_name.clone(),
                category_icon: b.category_icon.clone(),
                category_color: b.category_color.clone(),
                amount: Decimal::ZERO,
                count: 0,
                percentage: Decimal::ZERO,
            });
        stat.amount += b.amount;
        stat.count += 1;
    }
    let mut out: Vec<CategoryStat> = by_cat.into_values().collect();
    if !total.is_zero() {
        for s in out.iter_mut() {
            s.percentage = (s.amount * Decimal::ONE_HUNDRED / total).round_dp(2);
        }
    }
    out.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub account_id: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// All bills filed under the account in range, transfers included.
    pub count: usize,
}

pub fn account_summary(
    bills: &[Bill],
    account_id: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> AccountSummary {
    let filter = BillFilter {
        account_id: Some(account_id.to_string()),
        ..BillFilter::in_range(start, end)
    };
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut count = 0;
    for b in bills.iter().filter(|b| filter.matches(b)) {
        count += 1;
        match b.bill_type {
            BillType::Income => income += b.amount,
            BillType::Expense => expense += b.amount,
            BillType::Transfer => {}
        }
    }
    AccountSummary {
        account_id: account_id.to_string(),
        income,
        expense,
        net: income - expense,
        count,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetOverview {
    /// Sum over assets flagged "include in total".
    pub net_worth: Decimal,
    pub positive: Decimal,
    pub negative: Decimal,
    pub by_type: Vec<(AssetType, Decimal)>,
    pub count: usize,
}

/// Balances are summed as stored, regardless of currency.
pub fn asset_overview(assets: &[Asset]) -> AssetOverview {
    let mut positive = Decimal::ZERO;
    let mut negative = Decimal::ZERO;
    let mut by_type: Vec<(AssetType, Decimal)> = Vec::new();
    let included: Vec<&Asset> = assets.iter().filter(|a| a.include_in_total).collect();
    for a in &included {
        if a.balance.is_sign_negative() {
            negative += a.balance;
        } else {
            positive += a.balance;
        }
        match by_type.iter_mut().find(|(t, _)| *t == a.asset_type) {
            Some((_, sum)) => *sum += a.balance,
            None => by_type.push((a.asset_type, a.balance)),
        }
    }
    AssetOverview {
        net_worth: positive + negative,
        positive,
        negative,
        by_type,
        count: included.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceDrift {
    pub asset_id: String,
    pub asset_name: String,
    pub stored: Decimal,
    pub expected: Decimal,
}

/// Assets whose cached balance differs from opening balance plus the
/// effects of the bills currently in the log.
pub fn balance_drift(assets: &[Asset], bills: &[Bill]) -> Vec<BalanceDrift> {
    let mut sums: HashMap<String, Decimal> = HashMap::new();
    for b in bills {
        for e in balance_effects(b) {
            *sums.entry(e.asset_id).or_insert(Decimal::ZERO) += e.delta;
        }
    }
    assets
        .iter()
        .filter_map(|a| {
            let expected = a.opening_balance + sums.get(&a.id).copied().unwrap_or_default();
            (expected != a.balance).then(|| BalanceDrift {
                asset_id: a.id.clone(),
                asset_name: a.name.clone(),
                stored: a.balance,
                expected,
            })
        })
        .collect()
}

/// Bills whose account, asset or category no longer exists.
pub fn dangling_references<'a>(
    bills: &'a [Bill],
    account_ids: &[&str],
    asset_ids: &[&str],
    category_ids: &[&str],
) -> Vec<(&'a Bill, &'static str, String)> {
    let mut out = Vec::new();
    for b in bills {
        if !account_ids.contains(&b.account_id.as_str()) {
            out.push((b, "account", b.account_id.clone()));
        }
        if !asset_ids.contains(&b.asset_id.as_str()) {
            out.push((b, "asset", b.asset_id.clone()));
        }
        if let Some(to) = &b.to_asset_id {
            if !asset_ids.contains(&to.as_str()) {
                out.push((b, "asset", to.clone()));
            }
        }
        if !category_ids.contains(&b.category_id.as_str()) {
            out.push((b, "category", b.category_id.clone()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_empty_input() {
        let p = paginate(Vec::<u8>::new(), PageRequest::default());
        assert!(p.items.is_empty());
        assert_eq!(p.pagination.total, 0);
        assert_eq!(p.pagination.total_pages, 0);
        assert!(!p.pagination.has_next);
        assert!(!p.pagination.has_prev);
    }

    #[test]
    fn paginate_clamps_zero_page_and_size() {
        let p = paginate(vec![1, 2, 3], PageRequest::new(0, 0));
        assert_eq!(p.pagination.page, 1);
        assert_eq!(p.pagination.page_size, 1);
        assert_eq!(p.items, vec![1]);
        assert!(p.pagination.has_next);
    }

    #[test]
    fn paginate_all_fits_one_page() {
        let p = paginate((0..50).collect::<Vec<_>>(), PageRequest::all());
        assert_eq!(p.items.len(), 50);
        assert_eq!(p.pagination.total_pages, 1);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let p = paginate(vec![1, 2, 3], PageRequest::new(5, 2));
        assert!(p.items.is_empty());
        assert!(p.pagination.has_prev);
        assert!(!p.pagination.has_next);
    }

    #[test]
    fn aggregations_tolerate_no_bills() {
        assert!(daily_summary(&[], None, None).is_empty());
        assert!(category_summary(&[], None, None, CategoryType::Expense).is_empty());
        let s = account_summary(&[], "a", None, None);
        assert_eq!(s.count, 0);
        assert!(s.net.is_zero());
        assert!(asset_overview(&[]).net_worth.is_zero());
    }
}
