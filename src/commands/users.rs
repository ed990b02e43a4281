// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::db;
use crate::identity::{ACTIVE_USER_KEY, IdentityProvider};
use crate::store::sqlite::SqliteStore;
use crate::utils::pretty_table;

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("use", sub)) => {
            let id = sub
                .get_one::<String>("id")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            if id.is_empty() {
                bail!("User id cannot be empty");
            }
            let name = sub.get_one::<String>("name").map(|s| s.trim());
            db::ensure_user(store.conn(), &id, name)?;
            db::set_setting(store.conn(), ACTIVE_USER_KEY, &id)?;
            println!("Active user is now '{}'", id);
        }
        Some(("show", _)) => match identity.current_user() {
            Some(u) => println!(
                "{}",
                pretty_table(&["User", "Name"], vec![vec![u.id, u.display_name]])
            ),
            None => println!("No active user"),
        },
        _ => {}
    }
    Ok(())
}
