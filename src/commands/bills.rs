// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::{Bill, BillPatch, BillType, NewBill};
use crate::query::{BillFilter, Page, PageRequest, SortOrder};
use crate::utils::{
    arg, clearable_arg, fmt_money, id_for_account, id_for_asset, id_for_category,
    maybe_print_json, parse_date, parse_decimal, parse_opt_date, pretty_table, req_arg,
};
use anyhow::Result;
use serde::Serialize;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, sub)?,
        Some(("list", sub)) => list(api, sub)?,
        Some(("show", sub)) => {
            let id = req_arg(sub, "id")?;
            match api.get_bill(&id)? {
                Some(b) => {
                    if !maybe_print_json(sub.get_flag("json"), &b)? {
                        print_rows(vec![BillRow::from(b)]);
                    }
                }
                None => println!("Bill '{}' not found", id),
            }
        }
        Some(("update", sub)) => update(api, sub)?,
        Some(("rm", sub)) => {
            let id = req_arg(sub, "id")?;
            if api.delete_bill(&id)? {
                println!("Removed bill '{}'", id);
            } else {
                println!("Bill '{}' not found (already deleted?)", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let bill_type: BillType = req_arg(sub, "type")?.parse()?;
    let spec = NewBill {
        account_id: id_for_account(api, &req_arg(sub, "account")?)?,
        asset_id: id_for_asset(api, &req_arg(sub, "asset")?)?,
        to_account_id: arg(sub, "to-account")
            .map(|a| id_for_account(api, &a))
            .transpose()?,
        to_asset_id: arg(sub, "to-asset")
            .map(|a| id_for_asset(api, &a))
            .transpose()?,
        category_id: id_for_category(api, &req_arg(sub, "category")?)?,
        amount: parse_decimal(&req_arg(sub, "amount")?)?,
        currency: arg(sub, "currency"),
        bill_type,
        description: arg(sub, "description"),
        date: parse_date(&req_arg(sub, "date")?)?,
    };
    let bill = api.create_bill(spec)?;
    println!(
        "Recorded {} {} on {} ({} / {}) id={}",
        bill.bill_type,
        fmt_money(&bill.amount, &bill.currency),
        bill.date,
        bill.asset_name,
        bill.category_name,
        bill.id
    );
    Ok(())
}

fn update(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let patch = BillPatch {
        account_id: arg(sub, "account")
            .map(|a| id_for_account(api, &a))
            .transpose()?,
        asset_id: arg(sub, "asset")
            .map(|a| id_for_asset(api, &a))
            .transpose()?,
        to_account_id: resolve_clearable(api, clearable_arg(sub, "to-account"), id_for_account)?,
        to_asset_id: resolve_clearable(api, clearable_arg(sub, "to-asset"), id_for_asset)?,
        category_id: arg(sub, "category")
            .map(|c| id_for_category(api, &c))
            .transpose()?,
        amount: arg(sub, "amount").map(|s| parse_decimal(&s)).transpose()?,
        currency: arg(sub, "currency"),
        bill_type: arg(sub, "type").map(|s| s.parse()).transpose()?,
        description: clearable_arg(sub, "description"),
        date: arg(sub, "date").map(|s| parse_date(&s)).transpose()?,
    };
    if patch.is_empty() {
        println!("Nothing to update");
        return Ok(());
    }
    match api.update_bill(&id, patch)? {
        Some(b) => println!(
            "Updated bill '{}': {} {}",
            b.id,
            b.bill_type,
            fmt_money(&b.amount, &b.currency)
        ),
        None => println!("Bill '{}' not found", id),
    }
    Ok(())
}

/// Maps a set value through `lookup`, passing "unchanged" and "clear" through.
fn resolve_clearable(
    api: &LocalApi,
    v: Option<Option<String>>,
    lookup: fn(&LocalApi, &str) -> Result<String>,
) -> Result<Option<Option<String>>> {
    match v {
        Some(Some(key)) => Ok(Some(Some(lookup(api, &key)?))),
        other => Ok(other),
    }
}

fn list(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let page = query_page(api, sub)?;
    if maybe_print_json(sub.get_flag("json"), &page)? {
        return Ok(());
    }
    let p = page.pagination.clone();
    print_rows(page.items.into_iter().map(BillRow::from).collect());
    println!(
        "Page {}/{} ({} bills){}{}",
        p.page,
        p.total_pages.max(1),
        p.total,
        if p.has_prev { " [prev]" } else { "" },
        if p.has_next { " [next]" } else { "" }
    );
    Ok(())
}

fn print_rows(rows: Vec<BillRow>) {
    let data = rows
        .into_iter()
        .map(|r| {
            vec![
                r.id,
                r.date,
                r.bill_type,
                r.amount,
                r.currency,
                r.asset,
                r.category,
                r.account,
                r.description,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id",
                "Date",
                "Type",
                "Amount",
                "CCY",
                "Asset",
                "Category",
                "Account",
                "Description"
            ],
            data,
        )
    );
}

#[derive(Serialize)]
pub struct BillRow {
    pub id: String,
    pub date: String,
    pub bill_type: String,
    pub amount: String,
    pub currency: String,
    pub asset: String,
    pub category: String,
    pub account: String,
    pub description: String,
}

impl From<Bill> for BillRow {
    fn from(b: Bill) -> Self {
        let asset = match &b.to_asset_name {
            Some(to) => format!("{} -> {}", b.asset_name, to),
            None => b.asset_name.clone(),
        };
        BillRow {
            id: b.id,
            date: b.date.to_string(),
            bill_type: b.bill_type.to_string(),
            amount: format!("{:.2}", b.amount),
            currency: b.currency,
            asset,
            category: b.category_name,
            account: b.account_name,
            description: b.description.unwrap_or_default(),
        }
    }
}

pub fn query_page(api: &LocalApi, sub: &clap::ArgMatches) -> Result<Page<Bill>> {
    let filter = BillFilter {
        account_id: arg(sub, "account")
            .map(|a| id_for_account(api, &a))
            .transpose()?,
        asset_id: arg(sub, "asset")
            .map(|a| id_for_asset(api, &a))
            .transpose()?,
        bill_type: arg(sub, "type").map(|s| s.parse()).transpose()?,
        category_id: arg(sub, "category")
            .map(|c| id_for_category(api, &c))
            .transpose()?,
        start_date: parse_opt_date(sub.get_one::<String>("from"))?,
        end_date: parse_opt_date(sub.get_one::<String>("to"))?,
        keyword: arg(sub, "keyword"),
    };
    let order = if sub.get_flag("asc") {
        SortOrder::DateAsc
    } else {
        SortOrder::DateDesc
    };
    let page = PageRequest::new(
        sub.get_one::<usize>("page").copied().unwrap_or(1),
        sub.get_one::<usize>("page-size").copied().unwrap_or(20),
    );
    Ok(api.list_bills(&filter, order, page)?)
}
