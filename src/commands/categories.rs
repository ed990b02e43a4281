// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io::Write;

use crate::models::TransactionType;
use crate::taxonomy::{TaxonomyStore, icon_for};
use crate::utils::pretty_table;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        // Outside the shell only the defaults exist.
        let taxonomy = TaxonomyStore::new();
        let mut out = std::io::stdout().lock();
        list(&mut out, &taxonomy, sub.get_one::<String>("type").map(|s| s.as_str()))?;
    }
    Ok(())
}

pub fn list(out: &mut dyn Write, taxonomy: &TaxonomyStore, kind: Option<&str>) -> Result<()> {
    let kinds = match kind {
        Some(k) => vec![k.parse::<TransactionType>()?],
        None => vec![TransactionType::Expense, TransactionType::Income],
    };
    let mut rows = Vec::new();
    for k in &kinds {
        for name in taxonomy.categories_for(*k) {
            let icon = icon_for(&name).to_string();
            rows.push(vec![k.to_string(), name, icon]);
        }
    }
    writeln!(out, "{}", pretty_table(&["Type", "Category", "Icon"], rows))?;
    if kinds.contains(&TransactionType::Expense) {
        let modes: Vec<&str> = taxonomy.payment_modes().iter().map(|m| m.as_str()).collect();
        writeln!(out, "Payment modes: {}", modes.join(", "))?;
    }
    Ok(())
}
