// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::open_session;
use crate::identity::IdentityProvider;
use crate::store::sqlite::SqliteStore;
use crate::utils::{pretty_table, today};

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    let mut session = open_session(store, identity, today())?;
    match m.subcommand() {
        Some(("show", _)) => {
            let p = session.profile().context("Profile not found")?;
            println!("{}", pretty_table(&["User", "Name"], vec![vec![p.id, p.name]]));
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").cloned().unwrap_or_default();
            session.rename(&name).context("Could not rename profile")?;
            println!("Name updated to '{}'", session.user().display_name);
        }
        _ => {}
    }
    session.end();
    Ok(())
}
