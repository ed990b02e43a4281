// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy shared by the validator, the store seam and the engine.

use serde::Serialize;

/// Client-side rule violation. Never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,
    #[error("amount '{0}' is not a number")]
    NonNumericAmount(String),
    #[error("category is required")]
    MissingCategory,
    #[error("payment mode is required for expenses")]
    MissingPaymentMode,
    #[error("amount must be greater than 0 (got {0})")]
    NonPositiveAmount(String),
    #[error("category '{category}' is not known for {kind} transactions")]
    UnknownCategory { kind: String, category: String },
    #[error("unknown payment mode '{0}'")]
    UnknownPaymentMode(String),
    #[error("unknown transaction type '{0}'")]
    UnknownTransactionType(String),
    #[error("unknown breakdown window '{0}' (use all|monthly)")]
    UnknownWindow(String),
    #[error("category name cannot be empty")]
    EmptyCategoryName,
    #[error("name cannot be empty")]
    EmptyName,
}

/// Failure reported by the persistent store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("record '{id}' not found")]
    NotFound { id: String },
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Error returned by engine commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no signed-in user")]
    NoUser,
    #[error("no day is bound")]
    NotBound,
    #[error("engine is closed")]
    Closed,
    #[error("date is outside the supported calendar range")]
    DateOutOfRange,
}

/// Non-fatal aggregation diagnostic: a record whose amount could not be
/// read contributed zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationWarning {
    pub record_id: Option<String>,
    pub raw_amount: String,
    pub reason: String,
}
