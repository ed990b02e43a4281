// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Line-oriented dashboard. One engine and one taxonomy live for the whole
//! run, so categories added here are usable until the shell exits.

use anyhow::Result;
use std::io::{BufRead, Write};

use super::{categories, chart, date_arg, day::print_day, open_session, transactions};
use crate::cli::build_shell_cli;
use crate::identity::IdentityProvider;
use crate::models::TransactionType;
use crate::session::Session;
use crate::store::LedgerStore;
use crate::store::sqlite::SqliteStore;
use crate::utils::{parse_date, pretty_table};

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    let mut session = open_session(store, identity, date_arg(m, "date")?)?;
    let stdin = std::io::stdin();
    let mut out = std::io::stdout().lock();
    run(&mut session, stdin.lock(), &mut out)
}

enum Flow {
    Continue,
    Quit,
}

/// Splits a line on whitespace, keeping double-quoted runs together.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    let mut pending = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut cur));
                    pending = false;
                }
            }
            c => {
                cur.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(cur);
    }
    words
}

pub fn run<S: LedgerStore, R: BufRead>(
    session: &mut Session<S>,
    input: R,
    out: &mut dyn Write,
) -> Result<()> {
    print_day(out, session, false, false)?;
    for line in input.lines() {
        let words = split_words(&line?);
        if words.is_empty() {
            continue;
        }
        for e in session.sync().errors {
            writeln!(out, "! live updates interrupted: {}", e)?;
        }
        let matches = match build_shell_cli().try_get_matches_from(&words) {
            Ok(m) => m,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };
        match dispatch(session, &matches, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "error: {:#}", e)?,
        }
    }
    session.end();
    Ok(())
}

fn dispatch<S: LedgerStore>(
    session: &mut Session<S>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<Flow> {
    match m.subcommand() {
        Some(("show", _)) => print_day(out, session, false, false)?,
        Some(("prev", _)) => {
            session.prev_day()?;
            print_day(out, session, false, false)?;
        }
        Some(("next", _)) => {
            session.next_day()?;
            print_day(out, session, false, false)?;
        }
        Some(("goto", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").map_or("", |s| s.as_str()))?;
            session.goto(date)?;
            print_day(out, session, false, false)?;
        }
        Some(("add", sub)) => {
            transactions::add(out, session, sub)?;
        }
        Some(("edit", sub)) => transactions::edit(out, session, sub)?,
        Some(("rm", sub)) => transactions::remove(out, session, sub)?,
        Some(("category", sub)) => match sub.subcommand() {
            Some(("add", add)) => {
                let kind = add
                    .get_one::<String>("type")
                    .map_or("", |s| s.as_str())
                    .parse::<TransactionType>()?;
                let name: Vec<&str> = add
                    .get_many::<String>("name")
                    .map(|v| v.map(|s| s.as_str()).collect())
                    .unwrap_or_default();
                let added = session.add_category(kind, &name.join(" "))?;
                writeln!(out, "Added {} category '{}'", kind, added)?;
            }
            Some(("list", list)) => categories::list(
                out,
                session.taxonomy(),
                list.get_one::<String>("type").map(|s| s.as_str()),
            )?,
            _ => writeln!(out, "usage: category add <type> <name> | category list [type]")?,
        },
        Some(("chart", sub)) => {
            let b = chart::breakdown(session, sub)?;
            chart::print_breakdown(out, &b)?;
        }
        Some(("profile", _)) => {
            let p = session.profile()?;
            writeln!(out, "{}", pretty_table(&["User", "Name"], vec![vec![p.id, p.name]]))?;
        }
        Some(("quit", _)) => return Ok(Flow::Quit),
        _ => writeln!(out, "commands: show prev next goto add edit rm category chart profile quit")?,
    }
    Ok(Flow::Continue)
}
