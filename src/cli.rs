// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

/// Arguments for creating a record, shared with the shell `add` command.
pub fn tx_add_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .short('t')
            .default_value("expense")
            .help("expense|income"),
    )
    .arg(Arg::new("category").long("category").short('c').required(true))
    .arg(
        Arg::new("payment-mode")
            .long("payment-mode")
            .short('p')
            .help("Cash|Card|Bank Transfer|UPI (expenses only)"),
    )
    .arg(Arg::new("amount").long("amount").short('a').required(true))
    .arg(Arg::new("notes").long("notes").short('n'))
    .arg(Arg::new("date").long("date").short('d').help("YYYY-MM-DD"))
    .arg(
        Arg::new("new-category")
            .long("new-category")
            .action(ArgAction::SetTrue)
            .help("Add the category to this session's list first"),
    )
}

/// Arguments for editing a record, shared with the shell `edit` command.
pub fn tx_edit_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("id").required(true))
        .arg(Arg::new("amount").long("amount").short('a'))
        .arg(Arg::new("category").long("category").short('c'))
        .arg(Arg::new("payment-mode").long("payment-mode").short('p'))
        .arg(Arg::new("notes").long("notes").short('n'))
        .arg(
            Arg::new("date")
                .long("date")
                .short('d')
                .help("Day the record is on (defaults to the selected day)"),
        )
}

/// Arguments for the category breakdown, shared with the shell `chart`.
pub fn chart_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("window")
            .long("window")
            .short('w')
            .default_value("all")
            .help("all|monthly"),
    )
    .arg(
        Arg::new("month")
            .long("month")
            .short('m')
            .help("YYYY-MM (monthly window; defaults to the selected day)"),
    )
}

pub fn build_cli() -> Command {
    command!()
        .name("trackify")
        .about("Day-by-day income and expense ledger")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("TRACKIFY_DB")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Act as this user id for one invocation"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Select the active user")
                .subcommand(
                    Command::new("use")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name")),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(
            Command::new("profile")
                .about("Profile of the active user")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("rename").arg(Arg::new("name").required(true))),
        )
        .subcommand(json_args(
            Command::new("day")
                .about("Records and totals for one day")
                .arg(Arg::new("date").long("date").short('d').help("YYYY-MM-DD")),
        ))
        .subcommand(
            Command::new("tx")
                .about("Create, edit and remove records")
                .subcommand(tx_add_args(Command::new("add")))
                .subcommand(tx_edit_args(Command::new("edit")))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("date").long("date").short('d')),
                ),
        )
        .subcommand(
            Command::new("category").about("Known categories").subcommand(
                Command::new("list").arg(Arg::new("type").long("type").short('t')),
            ),
        )
        .subcommand(json_args(chart_args(
            Command::new("chart").about("Expense totals per category"),
        )))
        .subcommand(
            Command::new("export").about("Write records to a file").subcommand(
                Command::new("day")
                    .arg(Arg::new("date").long("date").short('d'))
                    .arg(Arg::new("format").long("format").short('f').default_value("csv"))
                    .arg(Arg::new("out").long("out").short('o').required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Report records the totals cannot read"))
        .subcommand(
            Command::new("shell")
                .about("Interactive session on stdin")
                .arg(Arg::new("date").long("date").short('d')),
        )
}

/// Command tree for one line typed into `trackify shell`.
pub fn build_shell_cli() -> Command {
    Command::new("shell")
        .no_binary_name(true)
        .disable_help_flag(true)
        .subcommand(Command::new("show"))
        .subcommand(Command::new("prev"))
        .subcommand(Command::new("next"))
        .subcommand(Command::new("goto").arg(Arg::new("date").required(true)))
        .subcommand(tx_add_args(Command::new("add")))
        .subcommand(tx_edit_args(Command::new("edit")))
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
        .subcommand(
            Command::new("category")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").required(true))
                        .arg(Arg::new("name").required(true).num_args(1..)),
                )
                .subcommand(Command::new("list").arg(Arg::new("type"))),
        )
        .subcommand(chart_args(Command::new("chart")))
        .subcommand(Command::new("profile"))
        .subcommand(Command::new("quit").visible_alias("exit"))
}
