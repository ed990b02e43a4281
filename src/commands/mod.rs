// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod chart;
pub mod day;
pub mod doctor;
pub mod exporter;
pub mod profile;
pub mod shell;
pub mod transactions;
pub mod users;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::identity::IdentityProvider;
use crate::session::Session;
use crate::store::sqlite::SqliteStore;
use crate::utils::{parse_date, today};

/// `--date` if given, else today.
pub fn date_arg(m: &clap::ArgMatches, name: &str) -> Result<NaiveDate> {
    match m.get_one::<String>(name) {
        Some(s) => parse_date(s),
        None => Ok(today()),
    }
}

pub fn open_session<'a>(
    store: &'a SqliteStore,
    identity: &dyn IdentityProvider,
    date: NaiveDate,
) -> Result<Session<&'a SqliteStore>> {
    match Session::sign_in(store, identity, date) {
        Ok(s) => Ok(s),
        Err(LedgerError::NoUser) => Err(anyhow!(
            "No active user; run `trackify user use <id>` or pass --user"
        )),
        Err(e) => Err(e.into()),
    }
}
