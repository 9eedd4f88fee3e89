// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::models::*;
use billbook::{Ledger, LocalApi, cli, commands::exporter, db};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::time::Duration;
use tempfile::tempdir;

fn seeded_api() -> LocalApi {
    let api = LocalApi::new(Ledger::new(db::open_in_memory().unwrap()), Duration::ZERO);
    let account = api
        .create_account(NewAccount {
            name: "Checking".into(),
            ..Default::default()
        })
        .unwrap();
    let cash = api
        .create_asset(NewAsset::new("Cash", AssetType::Cash).with_balance(Decimal::from(100)))
        .unwrap();
    let bank = api
        .create_asset(NewAsset::new("Bank", AssetType::Bank))
        .unwrap();
    let spec = |t: BillType, cat: &str, amt: &str, date: u32, desc: Option<&str>| NewBill {
        account_id: account.id.clone(),
        asset_id: cash.id.clone(),
        to_account_id: None,
        to_asset_id: None,
        category_id: cat.to_string(),
        amount: Decimal::from_str(amt).unwrap(),
        currency: None,
        bill_type: t,
        description: desc.map(str::to_string),
        date: NaiveDate::from_ymd_opt(2025, 1, date).unwrap(),
    };
    api.create_bill(spec(
        BillType::Expense,
        "sys-expense-groceries",
        "12.34",
        3,
        Some("Weekly run"),
    ))
    .unwrap();
    api.create_bill(NewBill {
        to_account_id: Some(account.id.clone()),
        to_asset_id: Some(bank.id.clone()),
        ..spec(BillType::Transfer, "sys-expense-other", "40", 2, None)
    })
    .unwrap();
    api
}

fn run_export(api: &LocalApi, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "billbook", "export", "bills", "--format", format, "--out", out,
    ]);
    match matches.subcommand() {
        Some(("export", export_m)) => exporter::handle(api, export_m),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_bills_writes_pretty_json_oldest_first() {
    let api = seeded_api();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bills.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&api, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    for item in parsed.as_array_mut().unwrap() {
        item.as_object_mut().unwrap().remove("id");
    }
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "type": "transfer",
                "amount": "40",
                "currency": "USD",
                "account": "Checking",
                "asset": "Cash",
                "to_asset": "Bank",
                "category": "Other Expense",
                "description": null
            },
            {
                "date": "2025-01-03",
                "type": "expense",
                "amount": "12.34",
                "currency": "USD",
                "account": "Checking",
                "asset": "Cash",
                "to_asset": null,
                "category": "Groceries",
                "description": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_bills_writes_csv_with_header() {
    let api = seeded_api();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bills.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&api, "csv", &out_str).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    assert_eq!(&headers[9], "description");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "transfer");
    assert_eq!(&rows[0][7], "Bank");
    assert_eq!(&rows[1][3], "12.34");
    assert_eq!(&rows[1][8], "Groceries");
    assert_eq!(&rows[1][9], "Weekly run");
}

#[test]
fn export_bills_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bills.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let res = cli::build_cli().try_get_matches_from([
        "billbook", "export", "bills", "--format", "xml", "--out", &out_str,
    ]);
    assert!(res.is_err());
    assert!(!out_path.exists());
}

#[test]
fn export_into_missing_directory_fails() {
    let api = seeded_api();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("nope").join("bills.csv");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(run_export(&api, "csv", &out_str).is_err());
}
