// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::CategoryType;
use crate::utils::{id_for_account, maybe_print_json, parse_opt_date, pretty_table, req_arg};
use anyhow::Result;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => daily(api, sub)?,
        Some(("category", sub)) => by_category(api, sub)?,
        Some(("account", sub)) => account(api, sub)?,
        Some(("overview", sub)) => overview(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn daily(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_opt_date(sub.get_one::<String>("from"))?;
    let end = parse_opt_date(sub.get_one::<String>("to"))?;
    let stats = api.daily_report(start, end)?;
    if maybe_print_json(sub.get_flag("json"), &stats)? {
        return Ok(());
    }
    let rows = stats
        .into_iter()
        .map(|d| {
            vec![
                d.date.to_string(),
                format!("{:.2}", d.income),
                format!("{:.2}", d.expense),
                format!("{:.2}", d.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Income", "Expense", "Net"], rows)
    );
    Ok(())
}

fn by_category(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_opt_date(sub.get_one::<String>("from"))?;
    let end = parse_opt_date(sub.get_one::<String>("to"))?;
    let category_type: CategoryType = req_arg(sub, "type")?.parse()?;
    let stats = api.category_report(start, end, category_type)?;
    if maybe_print_json(sub.get_flag("json"), &stats)? {
        return Ok(());
    }
    let rows = stats
        .into_iter()
        .map(|c| {
            vec![
                c.category_name,
                format!("{:.2}", c.amount),
                c.count.to_string(),
                format!("{:.2}%", c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Amount", "Bills", "Share"], rows)
    );
    Ok(())
}

fn account(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_opt_date(sub.get_one::<String>("from"))?;
    let end = parse_opt_date(sub.get_one::<String>("to"))?;
    let account_id = id_for_account(api, &req_arg(sub, "account")?)?;
    let s = api.account_report(&account_id, start, end)?;
    if maybe_print_json(sub.get_flag("json"), &s)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Net", "Bills"],
            vec![vec![
                format!("{:.2}", s.income),
                format!("{:.2}", s.expense),
                format!("{:.2}", s.net),
                s.count.to_string(),
            ]],
        )
    );
    Ok(())
}

fn overview(api: &LocalApi, sub: &clap::ArgMatches) -> Result<()> {
    let o = api.asset_overview()?;
    if maybe_print_json(sub.get_flag("json"), &o)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = o
        .by_type
        .iter()
        .map(|(t, sum)| vec![t.to_string(), format!("{:.2}", sum)])
        .collect();
    rows.push(vec!["assets".into(), format!("{:.2}", o.positive)]);
    rows.push(vec!["liabilities".into(), format!("{:.2}", o.negative)]);
    rows.push(vec!["net worth".into(), format!("{:.2}", o.net_worth)]);
    println!("{}", pretty_table(&["Group", "Balance"], rows));
    Ok(())
}
