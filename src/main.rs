// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use billbook::config::Config;
use billbook::{LocalApi, Ledger, cli, commands, db, logging};

fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init(&config);

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = match &config.db_path {
        Some(p) => db::open_at(p)?,
        None => db::open_or_init()?,
    };
    let api = LocalApi::new(Ledger::new(conn), config.latency);

    match matches.subcommand() {
        Some(("init", _)) => match &config.db_path {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("user", sub)) => commands::user::handle(&api, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&api, sub)?,
        Some(("asset", sub)) => commands::assets::handle(&api, sub)?,
        Some(("category", sub)) => commands::categories::handle(&api, sub)?,
        Some(("bill", sub)) => commands::bills::handle(&api, sub)?,
        Some(("report", sub)) => commands::reports::handle(&api, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&api, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&api)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
