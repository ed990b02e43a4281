// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io::Write;

use super::open_session;
use crate::aggregation::daily_aggregate;
use crate::identity::IdentityProvider;
use crate::models::{Transaction, TransactionType};
use crate::store::LedgerStore;
use crate::store::sqlite::SqliteStore;
use crate::taxonomy::TaxonomyStore;
use crate::utils::{pretty_table, today};

pub fn handle(store: &SqliteStore, identity: &dyn IdentityProvider) -> Result<()> {
    let session = open_session(store, identity, today())?;
    let records = session.engine().store().list_for_owner(&session.user().id)?;
    let mut out = std::io::stdout().lock();
    report(&mut out, &records)
}

/// One row per issue: unreadable amounts, income carrying a payment mode,
/// and categories outside the default lists.
pub fn issues(records: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Amounts the totals count as zero
    for w in daily_aggregate(records).warnings {
        rows.push(vec![
            "unreadable_amount".into(),
            format!(
                "{} '{}' ({})",
                w.record_id.unwrap_or_default(),
                w.raw_amount,
                w.reason
            ),
        ]);
    }

    // 2) Income should never carry a payment mode
    for t in records
        .iter()
        .filter(|t| t.kind == TransactionType::Income && t.payment_mode.is_some())
    {
        rows.push(vec!["income_with_payment_mode".into(), t.id.clone()]);
    }

    // 3) Categories charted as their own bucket
    let defaults = TaxonomyStore::new();
    for t in records {
        if !defaults.contains(t.kind, &t.category) {
            rows.push(vec![
                "non_default_category".into(),
                format!("{} '{}' ({})", t.id, t.category, t.kind),
            ]);
        }
    }
    rows
}

pub fn report(out: &mut dyn Write, records: &[Transaction]) -> Result<()> {
    let rows = issues(records);
    if rows.is_empty() {
        writeln!(out, "doctor: no issues found")?;
    } else {
        writeln!(out, "{}", pretty_table(&["Issue", "Detail"], rows))?;
    }
    Ok(())
}
