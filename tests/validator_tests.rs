// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use trackify::error::ValidationError;
use trackify::models::{PaymentMode, TransactionDraft, TransactionPatch, TransactionType};
use trackify::taxonomy::TaxonomyStore;
use trackify::validator::{validate, validate_patch, validate_with};

fn draft(kind: TransactionType, category: &str, mode: Option<PaymentMode>, amount: Option<&str>) -> TransactionDraft {
    TransactionDraft {
        kind,
        category: category.to_string(),
        payment_mode: mode,
        amount: amount.map(|s| s.to_string()),
        notes: None,
        date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    }
}

#[test]
fn zero_amount_is_rejected() {
    let d = draft(TransactionType::Expense, "Food", Some(PaymentMode::Cash), Some("0"));
    assert_eq!(
        validate(&d),
        Err(ValidationError::NonPositiveAmount("0".into()))
    );
}

#[test]
fn negative_amount_is_rejected() {
    let d = draft(TransactionType::Expense, "Food", Some(PaymentMode::Cash), Some("-5"));
    assert!(matches!(validate(&d), Err(ValidationError::NonPositiveAmount(_))));
}

#[test]
fn income_needs_no_payment_mode() {
    let d = draft(TransactionType::Income, "Salary", None, Some("500"));
    assert_eq!(validate(&d), Ok(Decimal::from(500)));
}

#[test]
fn expense_needs_payment_mode() {
    let d = draft(TransactionType::Expense, "Food", None, Some("12"));
    assert_eq!(validate(&d), Err(ValidationError::MissingPaymentMode));
}

#[test]
fn rules_run_in_order() {
    // Missing amount wins over missing category and payment mode.
    let d = draft(TransactionType::Expense, "", None, None);
    assert_eq!(validate(&d), Err(ValidationError::MissingAmount));

    let d = draft(TransactionType::Expense, "  ", None, Some("3"));
    assert_eq!(validate(&d), Err(ValidationError::MissingCategory));

    // Category and payment mode are checked before the sign of the amount.
    let d = draft(TransactionType::Expense, "Food", None, Some("0"));
    assert_eq!(validate(&d), Err(ValidationError::MissingPaymentMode));
}

#[test]
fn amount_text_forms() {
    let blank = draft(TransactionType::Income, "Gift", None, Some("   "));
    assert_eq!(validate(&blank), Err(ValidationError::MissingAmount));

    let junk = draft(TransactionType::Income, "Gift", None, Some("12abc"));
    assert_eq!(
        validate(&junk),
        Err(ValidationError::NonNumericAmount("12abc".into()))
    );

    let sci = draft(TransactionType::Income, "Gift", None, Some("1e3"));
    assert_eq!(validate(&sci), Ok(Decimal::from(1000)));

    let cents = draft(TransactionType::Income, "Gift", None, Some(" 12.50 "));
    assert_eq!(validate(&cents), Ok(Decimal::new(1250, 2)));
}

#[test]
fn unknown_category_needs_adding_first() {
    let mut tax = TaxonomyStore::new();
    let d = draft(TransactionType::Expense, "Pets", Some(PaymentMode::Upi), Some("40"));
    assert!(matches!(
        validate_with(&d, &tax),
        Err(ValidationError::UnknownCategory { .. })
    ));
    tax.add_category(TransactionType::Expense, "Pets").unwrap();
    assert_eq!(validate_with(&d, &tax), Ok(Decimal::from(40)));
}

#[test]
fn patch_checks_only_touched_fields() {
    let empty = validate_patch(&TransactionPatch::default(), Some(TransactionType::Expense)).unwrap();
    assert!(empty.is_empty());

    let p = TransactionPatch {
        amount: Some("0".into()),
        ..Default::default()
    };
    assert!(matches!(
        validate_patch(&p, None),
        Err(ValidationError::NonPositiveAmount(_))
    ));

    let p = TransactionPatch {
        category: Some(" ".into()),
        ..Default::default()
    };
    assert_eq!(validate_patch(&p, None), Err(ValidationError::MissingCategory));
}

#[test]
fn income_patch_clears_payment_mode() {
    let p = TransactionPatch {
        payment_mode: Some(PaymentMode::Card),
        notes: Some("bonus".into()),
        ..Default::default()
    };
    let u = validate_patch(&p, Some(TransactionType::Income)).unwrap();
    assert_eq!(u.payment_mode, Some(None));
    assert_eq!(u.notes.as_deref(), Some("bonus"));

    let u = validate_patch(&p, Some(TransactionType::Expense)).unwrap();
    assert_eq!(u.payment_mode, Some(Some(PaymentMode::Card)));
}
