// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::query::{BillFilter, PageRequest, SortOrder};
use crate::utils::req_arg;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("bills", sub)) => export_bills(api, sub),
        _ => Ok(()),
    }
}

fn export_bills(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = req_arg(sub, "format")?.to_lowercase();
    let out = req_arg(sub, "out")?;

    let bills = api
        .list_bills(&BillFilter::default(), SortOrder::DateAsc, PageRequest::all())?
        .items;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "amount",
                "currency",
                "account",
                "asset",
                "to_asset",
                "category",
                "description",
            ])?;
            for b in &bills {
                wtr.write_record([
                    b.id.clone(),
                    b.date.to_string(),
                    b.bill_type.to_string(),
                    b.amount.to_string(),
                    b.currency.clone(),
                    b.account_name.clone(),
                    b.asset_name.clone(),
                    b.to_asset_name.clone().unwrap_or_default(),
                    b.category_name.clone(),
                    b.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = bills
                .iter()
                .map(|b| {
                    json!({
                        "id": b.id, "date": b.date, "type": b.bill_type, "amount": b.amount,
                        "currency": b.currency, "account": b.account_name, "asset": b.asset_name,
                        "to_asset": b.to_asset_name, "category": b.category_name,
                        "description": b.description
                    })
                })
                .collect();
            std::fs::write(&out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} bills to {}", bills.len(), out);
    Ok(())
}
