// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;
use std::io::Write;

use super::{date_arg, open_session};
use crate::identity::IdentityProvider;
use crate::models::Transaction;
use crate::store::sqlite::SqliteStore;

pub fn handle(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("day", sub)) => export_day(store, identity, sub),
        _ => Ok(()),
    }
}

fn export_day(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").cloned().unwrap_or_default();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let session = open_session(store, identity, date_arg(sub, "date")?)?;
    let records: &[Transaction] = session.view().map(|v| v.records.as_slice()).unwrap_or(&[]);
    write_records(records, &fmt, &out)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "Exported {} record(s) for {} to {}",
        records.len(),
        session.selected_date(),
        out
    )?;
    Ok(())
}

pub fn write_records(records: &[Transaction], fmt: &str, out: &str) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "category",
                "paymentMode",
                "amount",
                "notes",
            ])?;
            for t in records {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.payment_mode.map(|p| p.to_string()).unwrap_or_default(),
                    t.amount.raw(),
                    t.notes.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<serde_json::Value> = records
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date.to_string(),
                        "type": t.kind.as_str(),
                        "category": t.category,
                        "paymentMode": t.payment_mode.map(|p| p.as_str()).unwrap_or(""),
                        "amount": t.amount.raw(),
                        "notes": t.notes,
                        "userId": t.owner_id,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
