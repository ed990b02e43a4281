// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use super::{date_arg, open_session};
use crate::aggregation::Aggregate;
use crate::identity::IdentityProvider;
use crate::models::{Transaction, TransactionType};
use crate::session::Session;
use crate::store::LedgerStore;
use crate::store::sqlite::SqliteStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    let date = date_arg(m, "date")?;
    let session = open_session(store, identity, date)?;
    let mut out = std::io::stdout().lock();
    print_day(&mut out, &session, m.get_flag("json"), m.get_flag("jsonl"))
}

#[derive(Serialize)]
struct DayReport<'a> {
    date: String,
    user: &'a str,
    records: &'a [Transaction],
    totals: &'a Aggregate,
    stale: Option<String>,
}

fn signed_amount(tx: &Transaction) -> String {
    let sign = match tx.kind {
        TransactionType::Expense => "-",
        TransactionType::Income => "+",
    };
    match tx.amount.value() {
        Some(d) => format!("{}{}", sign, fmt_money(&d)),
        None => format!("{}? ({})", sign, tx.amount.raw()),
    }
}

pub fn print_day<S: LedgerStore>(
    out: &mut dyn Write,
    session: &Session<S>,
    json_flag: bool,
    jsonl_flag: bool,
) -> Result<()> {
    let Some(view) = session.view() else {
        writeln!(out, "No day selected")?;
        return Ok(());
    };
    let totals = session.aggregate();
    let stale = session.engine().staleness().map(|e| e.to_string());

    if jsonl_flag {
        maybe_print_json(out, false, true, &view.records)?;
        return Ok(());
    }
    let report = DayReport {
        date: view.date.to_string(),
        user: &session.user().id,
        records: &view.records,
        totals,
        stale: stale.clone(),
    };
    if maybe_print_json(out, json_flag, false, &report)? {
        return Ok(());
    }

    writeln!(
        out,
        "{} ({})",
        view.date.format("%b %d, %Y"),
        session.user().display_name
    )?;
    if !view.is_loaded() {
        writeln!(out, "Loading...")?;
    } else if view.records.is_empty() {
        writeln!(out, "No records for this date")?;
    } else {
        let rows: Vec<Vec<String>> = view
            .records
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.category.clone(),
                    t.payment_mode
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    signed_amount(t),
                    t.notes.clone(),
                ]
            })
            .collect();
        writeln!(
            out,
            "{}",
            pretty_table(&["ID", "Category", "Payment", "Amount", "Notes"], rows)
        )?;
    }
    writeln!(
        out,
        "{}",
        pretty_table(
            &["Expense", "Income", "Balance"],
            vec![vec![
                fmt_money(&totals.expense_total),
                fmt_money(&totals.income_total),
                fmt_money(&totals.balance),
            ]],
        )
    )?;
    if !totals.warnings.is_empty() {
        writeln!(
            out,
            "! {} record(s) with unreadable amounts counted as 0 (see `trackify doctor`)",
            totals.warnings.len()
        )?;
    }
    if let Some(e) = stale {
        writeln!(out, "! view may be out of date: {}", e)?;
    }
    Ok(())
}
