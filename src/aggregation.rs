// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals for a day and category breakdowns for charting.
//!
//! Both are pure functions of the records passed in. Records whose amount
//! cannot be read contribute zero and are reported as warnings.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{AggregationWarning, ValidationError};
use crate::models::{Transaction, TransactionType};

/// Chart colours, assigned by position.
pub const PALETTE: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Aggregate {
    pub expense_total: Decimal,
    pub income_total: Decimal,
    pub balance: Decimal,
    pub warnings: Vec<AggregationWarning>,
}

fn amount_or_warn(tx: &Transaction, warnings: &mut Vec<AggregationWarning>) -> Decimal {
    match tx.amount.value() {
        Some(d) => d,
        None => {
            let raw = tx.amount.raw();
            warn!(id = %tx.id, raw = %raw, "malformed amount counted as zero");
            warnings.push(AggregationWarning {
                record_id: Some(tx.id.clone()),
                raw_amount: raw.clone(),
                reason: if raw.is_empty() {
                    "amount missing".to_string()
                } else {
                    "amount is not a number".to_string()
                },
            });
            Decimal::ZERO
        }
    }
}

/// Adds `amount` to `total` unless the sum would overflow, in which case
/// the record is left out and reported.
fn add_or_warn(
    total: &mut Decimal,
    amount: Decimal,
    tx: &Transaction,
    warnings: &mut Vec<AggregationWarning>,
) {
    match total.checked_add(amount) {
        Some(sum) => *total = sum,
        None => {
            warn!(id = %tx.id, "amount overflows total; record left out");
            warnings.push(AggregationWarning {
                record_id: Some(tx.id.clone()),
                raw_amount: tx.amount.raw(),
                reason: "amount overflows the total".to_string(),
            });
        }
    }
}

/// Sums amounts by type over a day's records.
pub fn daily_aggregate(records: &[Transaction]) -> Aggregate {
    let mut agg = Aggregate::default();
    for tx in records {
        let amount = amount_or_warn(tx, &mut agg.warnings);
        let total = match tx.kind {
            TransactionType::Expense => &mut agg.expense_total,
            TransactionType::Income => &mut agg.income_total,
        };
        add_or_warn(total, amount, tx, &mut agg.warnings);
    }
    agg.balance = match agg.income_total.checked_sub(agg.expense_total) {
        Some(b) => b,
        None => {
            warn!("balance overflows; clamped");
            agg.warnings.push(AggregationWarning {
                record_id: None,
                raw_amount: String::new(),
                reason: "balance overflows and was clamped".to_string(),
            });
            if agg.income_total > agg.expense_total {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        }
    };
    agg
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakdownWindow {
    #[default]
    All,
    Monthly,
}

impl fmt::Display for BreakdownWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakdownWindow::All => f.write_str("All"),
            BreakdownWindow::Monthly => f.write_str("Monthly"),
        }
    }
}

impl FromStr for BreakdownWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(BreakdownWindow::All),
            "monthly" | "month" => Ok(BreakdownWindow::Monthly),
            _ => Err(ValidationError::UnknownWindow(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub category: String,
    pub total: Decimal,
    pub color_index: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub window: BreakdownWindow,
    pub reference: NaiveDate,
    pub entries: Vec<BreakdownEntry>,
    pub warnings: Vec<AggregationWarning>,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries, clamped at `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.entries.iter().fold(Decimal::ZERO, |acc, e| {
            acc.checked_add(e.total).unwrap_or(if e.total > Decimal::ZERO {
                Decimal::MAX
            } else {
                Decimal::MIN
            })
        })
    }
}

fn in_window(date: NaiveDate, window: BreakdownWindow, reference: NaiveDate) -> bool {
    match window {
        BreakdownWindow::All => true,
        BreakdownWindow::Monthly => {
            date.year() == reference.year() && date.month() == reference.month()
        }
    }
}

/// Expense totals per category, in the order categories are first seen.
/// Category names are compared exactly.
pub fn category_breakdown(
    records: &[Transaction],
    window: BreakdownWindow,
    reference: NaiveDate,
) -> CategoryBreakdown {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for tx in records
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
        .filter(|t| in_window(t.date, window, reference))
    {
        let amount = amount_or_warn(tx, &mut warnings);
        let slot = *index.entry(tx.category.clone()).or_insert_with(|| {
            order.push((tx.category.clone(), Decimal::ZERO));
            order.len() - 1
        });
        add_or_warn(&mut order[slot].1, amount, tx, &mut warnings);
    }

    let entries = order
        .into_iter()
        .enumerate()
        .map(|(i, (category, total))| BreakdownEntry {
            category,
            total,
            color_index: i % PALETTE.len(),
            color: color_for(i),
        })
        .collect();

    CategoryBreakdown {
        window,
        reference,
        entries,
        warnings,
    }
}
