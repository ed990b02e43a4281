// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }

    /// Stored records carry the type as free text. Anything that is not
    /// `expense` has always been counted as income by the dashboard totals.
    pub fn from_store(s: &str) -> Self {
        if s == "expense" {
            TransactionType::Expense
        } else {
            TransactionType::Income
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(ValidationError::UnknownTransactionType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Cash,
        PaymentMode::Card,
        PaymentMode::BankTransfer,
        PaymentMode::Upi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace(['-', '_'], " ");
        match norm.as_str() {
            "cash" => Ok(PaymentMode::Cash),
            "card" => Ok(PaymentMode::Card),
            "bank transfer" | "banktransfer" => Ok(PaymentMode::BankTransfer),
            "upi" => Ok(PaymentMode::Upi),
            _ => Err(ValidationError::UnknownPaymentMode(s.to_string())),
        }
    }
}

/// Amount as it sits in the store: legacy records hold either text or a
/// number, and some hold nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
    Missing,
}

/// Amount after conversion at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Value(Decimal),
    Malformed(String),
}

impl Amount {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Amount::Value(d) => Some(*d),
            Amount::Malformed(_) => None,
        }
    }

    /// The text the amount was read from, for diagnostics.
    pub fn raw(&self) -> String {
        match self {
            Amount::Value(d) => d.to_string(),
            Amount::Malformed(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(d) => write!(f, "{:.2}", d),
            Amount::Malformed(raw) => write!(f, "{}?", raw),
        }
    }
}

impl From<&RawAmount> for Amount {
    fn from(raw: &RawAmount) -> Self {
        match raw {
            RawAmount::Number(n) => match Decimal::try_from(*n) {
                Ok(d) => Amount::Value(d.normalize()),
                Err(_) => Amount::Malformed(n.to_string()),
            },
            RawAmount::Text(s) => match parse_amount(s) {
                Some(d) => Amount::Value(d),
                None => Amount::Malformed(s.clone()),
            },
            RawAmount::Missing => Amount::Malformed(String::new()),
        }
    }
}

/// Parses user or stored amount text. Plain and scientific notation are
/// accepted; trailing garbage is not.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(t).ok())
}

/// A persisted record as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(rename = "paymentMode")]
    pub payment_mode: Option<PaymentMode>,
    pub amount: Amount,
    pub notes: String,
    pub date: NaiveDate,
    #[serde(rename = "userId")]
    pub owner_id: String,
}

/// User input for a new record, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub category: String,
    pub payment_mode: Option<PaymentMode>,
    pub amount: Option<String>,
    pub notes: Option<String>,
    pub date: NaiveDate,
}

/// A validated record ready for `insert`. Has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(rename = "paymentMode")]
    pub payment_mode: Option<PaymentMode>,
    pub amount: Decimal,
    pub notes: String,
    pub date: NaiveDate,
    #[serde(rename = "userId")]
    pub owner_id: String,
}

impl NewTransaction {
    /// Builds the stored shape from a draft that already passed validation.
    /// Income never carries a payment mode.
    pub fn from_draft(draft: &TransactionDraft, amount: Decimal, owner_id: &str) -> Self {
        let payment_mode = match draft.kind {
            TransactionType::Expense => draft.payment_mode,
            TransactionType::Income => None,
        };
        NewTransaction {
            kind: draft.kind,
            category: draft.category.trim().to_string(),
            payment_mode,
            amount,
            notes: draft.notes.clone().unwrap_or_default(),
            date: draft.date,
            owner_id: owner_id.to_string(),
        }
    }

    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            payment_mode: self.payment_mode,
            amount: Amount::Value(self.amount),
            notes: self.notes,
            date: self.date,
            owner_id: self.owner_id,
        }
    }
}

/// User edit of an existing record, before validation. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub payment_mode: Option<PaymentMode>,
    pub notes: Option<String>,
}

/// Partial field update handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    /// `Some(None)` clears the stored payment mode.
    pub payment_mode: Option<Option<PaymentMode>>,
    pub notes: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.payment_mode.is_none()
            && self.notes.is_none()
    }

    pub fn apply_to(&self, tx: &mut Transaction) {
        if let Some(a) = self.amount {
            tx.amount = Amount::Value(a);
        }
        if let Some(c) = &self.category {
            tx.category = c.clone();
        }
        if let Some(pm) = self.payment_mode {
            tx.payment_mode = pm;
        }
        if let Some(n) = &self.notes {
            tx.notes = n.clone();
        }
    }
}

/// Subscription filter: one user, one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DayFilter {
    pub owner_id: String,
    pub date: NaiveDate,
}

impl DayFilter {
    pub fn new(owner_id: impl Into<String>, date: NaiveDate) -> Self {
        DayFilter {
            owner_id: owner_id.into(),
            date,
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.owner_id == self.owner_id && tx.date == self.date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: String,
}
