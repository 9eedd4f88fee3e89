// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::api::LocalApi;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_opt_date(s: Option<&String>) -> Result<Option<NaiveDate>> {
    s.map(|v| parse_date(v)).transpose()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

/// Resolves an account given by id or (case-insensitive) name.
pub fn id_for_account(api: &LocalApi, key: &str) -> Result<String> {
    let key = key.trim();
    let accounts = api.list_accounts()?;
    accounts
        .iter()
        .find(|a| a.id == key)
        .or_else(|| accounts.iter().find(|a| a.name.eq_ignore_ascii_case(key)))
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow!("Account '{}' not found", key))
}

pub fn id_for_asset(api: &LocalApi, key: &str) -> Result<String> {
    let key = key.trim();
    let assets = api.list_assets(None)?;
    assets
        .iter()
        .find(|a| a.id == key)
        .or_else(|| assets.iter().find(|a| a.name.eq_ignore_ascii_case(key)))
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow!("Asset '{}' not found", key))
}

pub fn id_for_category(api: &LocalApi, key: &str) -> Result<String> {
    let key = key.trim();
    let cats = api.list_categories(None)?;
    cats.iter()
        .find(|c| c.id == key)
        .or_else(|| cats.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("Category '{}' not found", key))
}

/// Argument value as a trimmed string, if present.
pub fn arg(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).map(|s| s.trim().to_string())
}

/// Required argument; clap enforces presence, this only trims.
pub fn req_arg(sub: &clap::ArgMatches, name: &str) -> Result<String> {
    arg(sub, name).with_context(|| format!("Missing --{}", name))
}

/// Tri-state text flag: absent → leave unchanged, empty → clear, else set.
pub fn clearable_arg(sub: &clap::ArgMatches, name: &str) -> Option<Option<String>> {
    arg(sub, name).map(|s| if s.is_empty() { None } else { Some(s) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims() {
        let d = parse_date(" 2025-03-04 ").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert!(parse_date("03/04/2025").is_err());
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(fmt_money(&Decimal::new(15, 1), "USD"), "USD 1.50");
    }

    #[test]
    fn decimal_errors_name_the_input() {
        let err = parse_decimal("12,5").unwrap_err();
        assert!(err.to_string().contains("12,5"));
    }
}
