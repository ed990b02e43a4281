// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use trackify::identity::SettingsIdentity;
use trackify::store::sqlite::SqliteStore;
use trackify::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_count("verbose"));

    let db_override = matches.get_one::<PathBuf>("db").cloned();
    let conn = db::open_or_init(db_override.as_deref())?;
    let store = SqliteStore::new(conn)?;
    let identity = SettingsIdentity::new(
        store.conn(),
        matches.get_one::<String>("user").cloned(),
    );

    match matches.subcommand() {
        Some(("init", _)) => match db_override {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("user", sub)) => commands::users::handle(&store, &identity, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&store, &identity, sub)?,
        Some(("day", sub)) => commands::day::handle(&store, &identity, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, &identity, sub)?,
        Some(("category", sub)) => commands::categories::handle(sub)?,
        Some(("chart", sub)) => commands::chart::handle(&store, &identity, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &identity, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store, &identity)?,
        Some(("shell", sub)) => commands::shell::handle(&store, &identity, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
