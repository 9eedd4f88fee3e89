// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::{CategoryPatch, CategoryType, NewCategory};
use crate::utils::{arg, clearable_arg, id_for_category, maybe_print_json, pretty_table, req_arg};
use anyhow::Result;
use std::collections::HashMap;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let type_filter: Option<CategoryType> =
                arg(sub, "type").map(|s| s.parse()).transpose()?;
            let cats = api.list_categories(type_filter)?;
            if maybe_print_json(sub.get_flag("json"), &cats)? {
                return Ok(());
            }
            let names: HashMap<&str, &str> =
                cats.iter().map(|c| (c.id.as_str(), c.name.as_str())).collect();
            let rows = cats
                .iter()
                .map(|c| {
                    vec![
                        c.id.clone(),
                        c.name.clone(),
                        c.category_type.to_string(),
                        c.parent_id
                            .as_deref()
                            .and_then(|p| names.get(p).copied())
                            .unwrap_or("")
                            .to_string(),
                        c.icon.clone().unwrap_or_default(),
                        if c.is_system { "system" } else { "" }.to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Id", "Category", "Type", "Parent", "Icon", ""], rows)
            );
        }
        Some(("add", sub)) => {
            let category_type: CategoryType = req_arg(sub, "type")?.parse()?;
            let parent_id = arg(sub, "parent")
                .map(|p| id_for_category(api, &p))
                .transpose()?;
            let c = api.create_category(NewCategory {
                name: req_arg(sub, "name")?,
                category_type,
                icon: arg(sub, "icon"),
                color: arg(sub, "color"),
                parent_id,
            })?;
            println!("Added category '{}' id={}", c.name, c.id);
        }
        Some(("update", sub)) => {
            let id = req_arg(sub, "id")?;
            let parent_id = match clearable_arg(sub, "parent") {
                Some(Some(p)) => Some(Some(id_for_category(api, &p)?)),
                other => other,
            };
            let patch = CategoryPatch {
                name: arg(sub, "name"),
                category_type: None,
                icon: clearable_arg(sub, "icon"),
                color: clearable_arg(sub, "color"),
                parent_id,
            };
            match api.update_category(&id, patch)? {
                Some(c) => println!("Updated category '{}'", c.name),
                None => println!("Category '{}' not found", id),
            }
        }
        Some(("rm", sub)) => {
            let id = req_arg(sub, "id")?;
            if api.delete_category(&id)? {
                println!("Removed category '{}'", id);
            } else {
                println!("Category '{}' not found (already deleted?)", id);
            }
        }
        _ => {}
    }
    Ok(())
}
