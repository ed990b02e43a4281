// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io::Write;

use super::open_session;
use crate::aggregation::{BreakdownWindow, CategoryBreakdown};
use crate::identity::IdentityProvider;
use crate::session::Session;
use crate::store::LedgerStore;
use crate::store::sqlite::SqliteStore;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, today};

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    let mut session = open_session(store, identity, today())?;
    let breakdown = breakdown(&mut session, m)?;
    let mut out = std::io::stdout().lock();
    if !maybe_print_json(&mut out, m.get_flag("json"), m.get_flag("jsonl"), &breakdown)? {
        print_breakdown(&mut out, &breakdown)?;
    }
    Ok(())
}

/// Applies `--window`/`--month` to the session and computes the breakdown.
pub fn breakdown<S: LedgerStore>(
    session: &mut Session<S>,
    m: &clap::ArgMatches,
) -> Result<CategoryBreakdown> {
    let window = m
        .get_one::<String>("window")
        .map(|s| s.parse::<BreakdownWindow>())
        .transpose()?
        .unwrap_or_default();
    let reference = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => session.selected_date(),
    };
    session.set_breakdown_window(window, reference);
    Ok(session.breakdown()?)
}

pub fn print_breakdown(out: &mut dyn Write, b: &CategoryBreakdown) -> Result<()> {
    let title = match b.window {
        BreakdownWindow::All => "Expenses by category (all time)".to_string(),
        BreakdownWindow::Monthly => {
            format!("Expenses by category ({})", b.reference.format("%B %Y"))
        }
    };
    writeln!(out, "{}", title)?;
    if b.is_empty() {
        writeln!(out, "No expenses found")?;
        return Ok(());
    }
    let rows: Vec<Vec<String>> = b
        .entries
        .iter()
        .map(|e| vec![e.category.clone(), fmt_money(&e.total), e.color.to_string()])
        .collect();
    writeln!(out, "{}", pretty_table(&["Category", "Spent", "Colour"], rows))?;
    writeln!(out, "Total {}", fmt_money(&b.total()))?;
    if !b.warnings.is_empty() {
        writeln!(
            out,
            "! {} record(s) with unreadable amounts counted as 0",
            b.warnings.len()
        )?;
    }
    Ok(())
}
