// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::{AssetPatch, AssetType, NewAsset};
use crate::store::assets::AssetFilter;
use crate::utils::{
    arg, clearable_arg, fmt_money, maybe_print_json, parse_decimal, pretty_table, req_arg,
};
use anyhow::Result;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, sub)?,
        Some(("list", sub)) => list(api, sub)?,
        Some(("update", sub)) => update(api, sub)?,
        Some(("rm", sub)) => {
            let id = req_arg(sub, "id")?;
            if api.delete_asset(&id)? {
                println!("Removed asset '{}'", id);
            } else {
                println!("Asset '{}' not found (already deleted?)", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let asset_type: AssetType = req_arg(sub, "type")?.parse()?;
    let balance = arg(sub, "balance").map(|s| parse_decimal(&s)).transpose()?;
    let asset = api.create_asset(NewAsset {
        name: req_arg(sub, "name")?,
        asset_type,
        balance,
        currency: arg(sub, "currency"),
        include_in_total: Some(!sub.get_flag("exclude")),
        notes: arg(sub, "notes"),
    })?;
    println!(
        "Added asset '{}' ({}) balance {} id={}",
        asset.name,
        asset.asset_type,
        fmt_money(&asset.balance, &asset.currency),
        asset.id
    );
    Ok(())
}

fn list(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let filter = AssetFilter {
        asset_type: arg(sub, "type").map(|s| s.parse()).transpose()?,
        include_in_total: None,
    };
    let assets = api.list_assets(Some(&filter))?;
    if maybe_print_json(sub.get_flag("json"), &assets)? {
        return Ok(());
    }
    let rows = assets
        .into_iter()
        .map(|a| {
            vec![
                a.id,
                a.name,
                a.asset_type.to_string(),
                format!("{:.2}", a.balance),
                a.currency,
                if a.include_in_total { "yes" } else { "no" }.to_string(),
                a.notes.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Type", "Balance", "CCY", "In total", "Notes"],
            rows
        )
    );
    Ok(())
}

fn update(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let patch = AssetPatch {
        name: arg(sub, "name"),
        asset_type: arg(sub, "type").map(|s| s.parse()).transpose()?,
        balance: arg(sub, "balance").map(|s| parse_decimal(&s)).transpose()?,
        currency: arg(sub, "currency"),
        include_in_total: sub.get_one::<bool>("include").copied(),
        notes: clearable_arg(sub, "notes"),
    };
    match api.update_asset(&id, patch)? {
        Some(a) => println!(
            "Updated asset '{}' balance {}",
            a.name,
            fmt_money(&a.balance, &a.currency)
        ),
        None => println!("Asset '{}' not found", id),
    }
    Ok(())
}
