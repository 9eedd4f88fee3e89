// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::LocalApi;
use crate::models::ProfilePatch;
use crate::utils::{arg, clearable_arg, maybe_print_json, pretty_table, req_arg};
use anyhow::Result;

pub fn handle(api: &LocalApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let user = api.register(&req_arg(sub, "username")?, &req_arg(sub, "email")?)?;
            println!("Registered and signed in as '{}'", user.username);
        }
        Some(("login", sub)) => {
            let who = req_arg(sub, "user")?;
            match api.login(&who)? {
                Some(u) => println!("Signed in as '{}'", u.username),
                None => println!("No user matches '{}'; register first", who),
            }
        }
        Some(("logout", _)) => {
            api.logout()?;
            println!("Signed out");
        }
        Some(("show", sub)) => {
            let user = api.current_user()?;
            if maybe_print_json(sub.get_flag("json"), &user)? {
                return Ok(());
            }
            match user {
                Some(u) => println!(
                    "{}",
                    pretty_table(
                        &["Id", "Username", "Email", "Verified", "Since"],
                        vec![vec![
                            u.id,
                            u.username,
                            u.email,
                            u.verified.to_string(),
                            u.created_at.format("%Y-%m-%d").to_string(),
                        ]],
                    )
                ),
                None => println!("Not signed in"),
            }
        }
        Some(("update", sub)) => {
            let patch = ProfilePatch {
                username: arg(sub, "username"),
                email: arg(sub, "email"),
                verified: sub.get_one::<bool>("verified").copied(),
                avatar: clearable_arg(sub, "avatar"),
            };
            match api.update_profile(patch)? {
                Some(u) => println!("Updated profile for '{}'", u.username),
                None => println!("No user registered"),
            }
        }
        _ => {}
    }
    Ok(())
}
