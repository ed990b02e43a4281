// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;

use super::{date_arg, open_session};
use crate::identity::IdentityProvider;
use crate::models::{PaymentMode, TransactionDraft, TransactionPatch, TransactionType};
use crate::session::Session;
use crate::store::LedgerStore;
use crate::store::sqlite::SqliteStore;
use crate::utils::{fmt_money, parse_date};

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = date_arg(sub, "date")?;
            let mut session = open_session(store, identity, date)?;
            add(&mut out, &mut session, sub)?;
        }
        Some(("edit", sub)) => {
            let mut session = open_session(store, identity, date_arg(sub, "date")?)?;
            edit(&mut out, &mut session, sub)?;
        }
        Some(("rm", sub)) => {
            let mut session = open_session(store, identity, date_arg(sub, "date")?)?;
            remove(&mut out, &mut session, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn payment_mode_arg(m: &clap::ArgMatches) -> Result<Option<PaymentMode>> {
    match m.get_one::<String>("payment-mode") {
        Some(s) if !s.trim().is_empty() => Ok(Some(s.parse::<PaymentMode>()?)),
        _ => Ok(None),
    }
}

/// Reads a draft from `tx add` style arguments. `default_date` applies when
/// no `--date` is given.
pub fn draft_from_matches(m: &clap::ArgMatches, default_date: NaiveDate) -> Result<TransactionDraft> {
    let kind = m
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?
        .unwrap_or(TransactionType::Expense);
    let date = match m.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => default_date,
    };
    Ok(TransactionDraft {
        kind,
        category: m.get_one::<String>("category").cloned().unwrap_or_default(),
        payment_mode: payment_mode_arg(m)?,
        amount: m.get_one::<String>("amount").cloned(),
        notes: m.get_one::<String>("notes").cloned(),
        date,
    })
}

pub fn patch_from_matches(m: &clap::ArgMatches) -> Result<TransactionPatch> {
    Ok(TransactionPatch {
        amount: m.get_one::<String>("amount").cloned(),
        category: m.get_one::<String>("category").cloned(),
        payment_mode: payment_mode_arg(m)?,
        notes: m.get_one::<String>("notes").cloned(),
    })
}

pub fn add<S: LedgerStore>(
    out: &mut dyn Write,
    session: &mut Session<S>,
    sub: &clap::ArgMatches,
) -> Result<String> {
    let draft = draft_from_matches(sub, session.selected_date())?;
    if sub.get_flag("new-category") {
        let added = session.add_category(draft.kind, &draft.category)?;
        writeln!(out, "Added {} category '{}'", draft.kind, added)?;
    }
    if draft.date != session.selected_date() {
        session.goto(draft.date)?;
    }
    let id = session
        .create(&draft)
        .with_context(|| format!("Could not record {} '{}'", draft.kind, draft.category))?;
    let totals = session.aggregate();
    writeln!(
        out,
        "Recorded {} {} on {} (id {}); day balance {}",
        draft.kind,
        draft.category.trim(),
        draft.date,
        id,
        fmt_money(&totals.balance)
    )?;
    Ok(id)
}

pub fn edit<S: LedgerStore>(
    out: &mut dyn Write,
    session: &mut Session<S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").cloned().unwrap_or_default();
    let patch = patch_from_matches(sub)?;
    if let Some(d) = sub.get_one::<String>("date") {
        let d = parse_date(d)?;
        if d != session.selected_date() {
            session.goto(d)?;
        }
    }
    session
        .update(&id, &patch)
        .with_context(|| format!("Could not update record {}", id))?;
    writeln!(out, "Updated record {}", id)?;
    Ok(())
}

pub fn remove<S: LedgerStore>(
    out: &mut dyn Write,
    session: &mut Session<S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").cloned().unwrap_or_default();
    session
        .remove(&id)
        .with_context(|| format!("Could not remove record {}", id))?;
    writeln!(out, "Removed record {}", id)?;
    Ok(())
}
