// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pre-write checks. Rules run in a fixed order and the first failure wins:
//! amount present and numeric, category present, payment mode present for
//! expenses, amount strictly positive.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{
    parse_amount, RecordUpdate, TransactionDraft, TransactionPatch, TransactionType,
};
use crate::taxonomy::TaxonomyStore;

fn numeric_amount(raw: Option<&str>) -> Result<Decimal, ValidationError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ValidationError::MissingAmount),
    };
    parse_amount(raw).ok_or_else(|| ValidationError::NonNumericAmount(raw.to_string()))
}

fn positive(amount: Decimal, raw: &str) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(raw.trim().to_string()));
    }
    Ok(())
}

/// Checks a draft and returns its parsed amount.
pub fn validate(draft: &TransactionDraft) -> Result<Decimal, ValidationError> {
    let amount = numeric_amount(draft.amount.as_deref())?;
    if draft.category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if draft.kind == TransactionType::Expense && draft.payment_mode.is_none() {
        return Err(ValidationError::MissingPaymentMode);
    }
    positive(amount, draft.amount.as_deref().unwrap_or_default())?;
    Ok(amount)
}

/// `validate`, then require the category to be known for the draft's type.
pub fn validate_with(
    draft: &TransactionDraft,
    taxonomy: &TaxonomyStore,
) -> Result<Decimal, ValidationError> {
    let amount = validate(draft)?;
    let category = draft.category.trim();
    if !taxonomy.contains(draft.kind, category) {
        return Err(ValidationError::UnknownCategory {
            kind: draft.kind.to_string(),
            category: category.to_string(),
        });
    }
    Ok(amount)
}

/// Checks the fields an edit touches. `kind` is the type of the record being
/// edited when known; income edits always clear the payment mode.
pub fn validate_patch(
    patch: &TransactionPatch,
    kind: Option<TransactionType>,
) -> Result<RecordUpdate, ValidationError> {
    let amount = match patch.amount.as_deref() {
        Some(raw) => Some(numeric_amount(Some(raw))?),
        None => None,
    };
    if patch.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ValidationError::MissingCategory);
    }
    if let (Some(a), Some(raw)) = (amount, patch.amount.as_deref()) {
        positive(a, raw)?;
    }
    let payment_mode = match kind {
        Some(TransactionType::Income) => Some(None),
        _ => patch.payment_mode.map(Some),
    };
    Ok(RecordUpdate {
        amount,
        category: patch.category.as_ref().map(|c| c.trim().to_string()),
        payment_mode,
        notes: patch.notes.clone(),
    })
}
