// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::{Account, AccountPatch, NewAccount};
use crate::utils::{arg, clearable_arg, maybe_print_json, pretty_table, req_arg};
use anyhow::Result;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let members = sub
                .get_many::<String>("member")
                .map(|v| v.map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            let account = api.create_account(NewAccount {
                name: req_arg(sub, "name")?,
                description: arg(sub, "description"),
                currency: arg(sub, "currency"),
                is_shared: sub.get_flag("shared"),
                members,
            })?;
            println!(
                "Added account '{}' ({}) id={}",
                account.name, account.currency, account.id
            );
        }
        Some(("list", sub)) => {
            let accounts = api.list_accounts()?;
            if !maybe_print_json(sub.get_flag("json"), &accounts)? {
                println!("{}", table(accounts));
            }
        }
        Some(("show", sub)) => {
            let id = req_arg(sub, "id")?;
            match api.get_account(&id)? {
                Some(a) => {
                    if !maybe_print_json(sub.get_flag("json"), &a)? {
                        println!("{}", table(vec![a]));
                    }
                }
                None => println!("Account '{}' not found", id),
            }
        }
        Some(("update", sub)) => {
            let id = req_arg(sub, "id")?;
            let patch = AccountPatch {
                name: arg(sub, "name"),
                description: clearable_arg(sub, "description"),
                currency: arg(sub, "currency"),
                is_shared: sub.get_one::<bool>("shared").copied(),
                members: None,
            };
            match api.update_account(&id, patch)? {
                Some(a) => println!("Updated account '{}'", a.name),
                None => println!("Account '{}' not found", id),
            }
        }
        Some(("rm", sub)) => {
            let id = req_arg(sub, "id")?;
            if api.delete_account(&id)? {
                println!("Removed account '{}'", id);
            } else {
                println!("Account '{}' not found (already deleted?)", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn table(accounts: Vec<Account>) -> comfy_table::Table {
    let rows = accounts
        .into_iter()
        .map(|a| {
            vec![
                a.id,
                a.name,
                a.currency,
                if a.is_shared { "shared" } else { "personal" }.to_string(),
                a.members.join(", "),
                a.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["Id", "Name", "Currency", "Kind", "Members", "Created"],
        rows,
    )
}
