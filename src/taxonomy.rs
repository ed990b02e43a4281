// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category names per transaction type.
//!
//! The taxonomy is owned by the session and lives only as long as it does.
//! Added names are appended after the defaults and are not de-duplicated.

use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{PaymentMode, TransactionType};

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 5] = ["Food", "Travel", "Shopping", "Bills", "Other"];
pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investment", "Gift", "Other"];

/// Icon used when a category has no dedicated one.
pub const FALLBACK_ICON: &str = "category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyStore {
    expense_added: Vec<String>,
    income_added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomySnapshot {
    pub kind: TransactionType,
    pub categories: Vec<String>,
    pub payment_modes: Vec<String>,
}

impl Default for TaxonomyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyStore {
    pub fn new() -> Self {
        TaxonomyStore {
            expense_added: Vec::new(),
            income_added: Vec::new(),
        }
    }

    fn defaults(kind: TransactionType) -> &'static [&'static str] {
        match kind {
            TransactionType::Expense => &DEFAULT_EXPENSE_CATEGORIES,
            TransactionType::Income => &DEFAULT_INCOME_CATEGORIES,
        }
    }

    fn added(&self, kind: TransactionType) -> &[String] {
        match kind {
            TransactionType::Expense => &self.expense_added,
            TransactionType::Income => &self.income_added,
        }
    }

    /// Defaults in their fixed order, then session additions in the order
    /// they were added.
    pub fn categories_for(&self, kind: TransactionType) -> Vec<String> {
        Self::defaults(kind)
            .iter()
            .map(|s| s.to_string())
            .chain(self.added(kind).iter().cloned())
            .collect()
    }

    /// Appends `name` (trimmed) to the list for `kind`. Returns the stored name.
    pub fn add_category(
        &mut self,
        kind: TransactionType,
        name: &str,
    ) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        let list = match kind {
            TransactionType::Expense => &mut self.expense_added,
            TransactionType::Income => &mut self.income_added,
        };
        list.push(name.to_string());
        debug!(%kind, category = name, "category added");
        Ok(name.to_string())
    }

    /// Case-sensitive membership, matching how categories are stored.
    pub fn contains(&self, kind: TransactionType, name: &str) -> bool {
        Self::defaults(kind).contains(&name) || self.added(kind).iter().any(|c| c == name)
    }

    pub fn payment_modes(&self) -> &'static [PaymentMode] {
        &PaymentMode::ALL
    }

    pub fn snapshot(&self, kind: TransactionType) -> TaxonomySnapshot {
        let payment_modes = match kind {
            TransactionType::Expense => self
                .payment_modes()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            TransactionType::Income => Vec::new(),
        };
        TaxonomySnapshot {
            kind,
            categories: self.categories_for(kind),
            payment_modes,
        }
    }

    /// Drops every session addition.
    pub fn reset(&mut self) {
        self.expense_added.clear();
        self.income_added.clear();
    }
}

/// Presentation hint for a category. Stable for the known names, fallback
/// otherwise.
pub fn icon_for(category: &str) -> &'static str {
    match category {
        "Food" => "attach_money",
        "Travel" => "local_grocery_store",
        "Shopping" => "category",
        "Bills" => "credit_card",
        _ => FALLBACK_ICON,
    }
}
