// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::query::{balance_drift, dangling_references};
use crate::utils::pretty_table;
use anyhow::Result;

/// One row per issue: (kind, detail).
pub fn diagnose(api: &LocalApi) -> Result<Vec<Vec<String>>> {
    let ledger = api.ledger();
    let assets = ledger.assets().list(None)?;
    let accounts = ledger.accounts().list()?;
    let categories = ledger.categories().list(None)?;
    let bills = ledger.bills().all()?;

    let mut rows = Vec::new();

    // 1) Cached balances that disagree with the bill history
    for d in balance_drift(&assets, &bills) {
        rows.push(vec![
            "balance_drift".into(),
            format!("{} stored {:.2}, expected {:.2}", d.asset_name, d.stored, d.expected),
        ]);
    }

    // 2) Bills pointing at deleted entities
    let account_ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    let asset_ids: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
    let category_ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    for (bill, kind, id) in dangling_references(&bills, &account_ids, &asset_ids, &category_ids) {
        rows.push(vec![
            format!("dangling_{}", kind),
            format!("bill {} on {} -> {}", bill.id, bill.date, id),
        ]);
    }
    Ok(rows)
}

pub fn handle(api: &LocalApi) -> Result<()> {
    let rows = diagnose(api)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
