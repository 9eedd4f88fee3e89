// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Entity id")
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn range_args() -> [Arg; 2] {
    [
        opt("from", "Start date YYYY-MM-DD (inclusive)"),
        opt("to", "End date YYYY-MM-DD (inclusive)"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("billbook")
        .about("Personal ledger: accounts, assets, categories and bills")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(user_cmd())
        .subcommand(account_cmd())
        .subcommand(asset_cmd())
        .subcommand(category_cmd())
        .subcommand(bill_cmd())
        .subcommand(report_cmd())
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("bills")
                    .about("Export bills, oldest first")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(req("out", "Output file")),
            ),
        )
        .subcommand(Command::new("doctor").about("Check balances and references"))
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Identity and session")
        .subcommand(
            Command::new("register")
                .arg(req("username", "User name"))
                .arg(req("email", "Email address")),
        )
        .subcommand(Command::new("login").arg(req("user", "Username or email")))
        .subcommand(Command::new("logout"))
        .subcommand(Command::new("show").arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(opt("username", "New user name"))
                .arg(opt("email", "New email"))
                .arg(opt("avatar", "Avatar URL; empty clears"))
                .arg(
                    Arg::new("verified")
                        .long("verified")
                        .value_parser(value_parser!(bool)),
                ),
        )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Ledgers that bills are filed under")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Account name"))
                .arg(opt("description", "Description"))
                .arg(opt("currency", "Currency code"))
                .arg(
                    Arg::new("shared")
                        .long("shared")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("member")
                        .long("member")
                        .action(ArgAction::Append)
                        .help("Member name (repeatable)"),
                ),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("show").arg(id_arg()).arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("name", "Account name"))
                .arg(opt("description", "Description; empty clears"))
                .arg(opt("currency", "Currency code"))
                .arg(
                    Arg::new("shared")
                        .long("shared")
                        .value_parser(value_parser!(bool)),
                ),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn asset_type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["cash", "bank", "card", "investment", "other"])
}

fn asset_cmd() -> Command {
    Command::new("asset")
        .about("Balance-bearing assets")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Asset name"))
                .arg(asset_type_arg().required(true))
                .arg(opt("balance", "Opening balance (default 0)"))
                .arg(opt("currency", "Currency code"))
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(ArgAction::SetTrue)
                        .help("Leave out of net worth"),
                )
                .arg(opt("notes", "Notes")),
        )
        .subcommand(Command::new("list").arg(asset_type_arg()).arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("name", "Asset name"))
                .arg(asset_type_arg())
                .arg(opt("balance", "Overwrite the balance"))
                .arg(opt("currency", "Currency code"))
                .arg(
                    Arg::new("include")
                        .long("include")
                        .value_parser(value_parser!(bool))
                        .help("Count in net worth"),
                )
                .arg(opt("notes", "Notes; empty clears")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn category_type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["income", "expense"])
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Income and expense categories")
        .subcommand(
            Command::new("list")
                .arg(category_type_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("add")
                .arg(req("name", "Category name"))
                .arg(category_type_arg().required(true))
                .arg(opt("icon", "Icon name"))
                .arg(opt("color", "Color, e.g. #ff8800"))
                .arg(opt("parent", "Parent category id or name")),
        )
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("name", "Category name"))
                .arg(opt("icon", "Icon; empty clears"))
                .arg(opt("color", "Color; empty clears"))
                .arg(opt("parent", "Parent id or name; empty clears")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn bill_type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["income", "expense", "transfer"])
}

fn bill_cmd() -> Command {
    Command::new("bill")
        .about("Income, expense and transfer records")
        .subcommand(
            Command::new("add")
                .arg(req("account", "Account id or name"))
                .arg(req("asset", "Asset id or name"))
                .arg(req("category", "Category id or name"))
                .arg(req("amount", "Positive amount"))
                .arg(bill_type_arg().required(true))
                .arg(req("date", "Date YYYY-MM-DD"))
                .arg(opt("to-account", "Destination account (transfers)"))
                .arg(opt("to-asset", "Destination asset (transfers)"))
                .arg(opt("description", "Description"))
                .arg(opt("currency", "Currency code (default: asset currency)")),
        )
        .subcommand(
            Command::new("list")
                .arg(opt("account", "Account id or name"))
                .arg(opt("asset", "Asset id or name (source or destination)"))
                .arg(opt("category", "Category id or name"))
                .arg(bill_type_arg())
                .args(range_args())
                .arg(opt("keyword", "Match description or category name"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .value_parser(value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    Arg::new("asc")
                        .long("asc")
                        .action(ArgAction::SetTrue)
                        .help("Oldest first"),
                )
                .arg(json_flag()),
        )
        .subcommand(Command::new("show").arg(id_arg()).arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(opt("account", "Account id or name"))
                .arg(opt("asset", "Asset id or name"))
                .arg(opt("category", "Category id or name"))
                .arg(opt("amount", "Positive amount"))
                .arg(bill_type_arg())
                .arg(opt("date", "Date YYYY-MM-DD"))
                .arg(opt("to-account", "Destination account; empty clears"))
                .arg(opt("to-asset", "Destination asset; empty clears"))
                .arg(opt("description", "Description; empty clears"))
                .arg(opt("currency", "Currency code")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Aggregated views")
        .subcommand(
            Command::new("daily")
                .args(range_args())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("category")
                .arg(category_type_arg().default_value("expense"))
                .args(range_args())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("account")
                .arg(req("account", "Account id or name"))
                .args(range_args())
                .arg(json_flag()),
        )
        .subcommand(Command::new("overview").arg(json_flag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
