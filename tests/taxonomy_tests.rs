// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use trackify::error::ValidationError;
use trackify::models::TransactionType;
use trackify::taxonomy::{FALLBACK_ICON, TaxonomyStore, icon_for};

#[test]
fn defaults_come_first() {
    let tax = TaxonomyStore::new();
    assert_eq!(
        tax.categories_for(TransactionType::Expense),
        vec!["Food", "Travel", "Shopping", "Bills", "Other"]
    );
    assert_eq!(
        tax.categories_for(TransactionType::Income),
        vec!["Salary", "Freelance", "Investment", "Gift", "Other"]
    );
}

#[test]
fn blank_name_leaves_list_unchanged() {
    let mut tax = TaxonomyStore::new();
    assert_eq!(
        tax.add_category(TransactionType::Expense, "  "),
        Err(ValidationError::EmptyCategoryName)
    );
    assert_eq!(tax.categories_for(TransactionType::Expense).len(), 5);
}

#[test]
fn added_category_is_appended_and_trimmed() {
    let mut tax = TaxonomyStore::new();
    assert_eq!(
        tax.add_category(TransactionType::Expense, " Pets "),
        Ok("Pets".to_string())
    );
    let cats = tax.categories_for(TransactionType::Expense);
    assert_eq!(cats.last().map(|s| s.as_str()), Some("Pets"));
    assert!(tax.contains(TransactionType::Expense, "Pets"));
    assert!(!tax.contains(TransactionType::Income, "Pets"));
    assert!(!tax.contains(TransactionType::Expense, "pets"));
}

#[test]
fn duplicates_are_kept() {
    let mut tax = TaxonomyStore::new();
    tax.add_category(TransactionType::Income, "Food").unwrap();
    tax.add_category(TransactionType::Income, "Food").unwrap();
    let cats = tax.categories_for(TransactionType::Income);
    assert_eq!(cats.iter().filter(|c| *c == "Food").count(), 2);
}

#[test]
fn snapshot_lists_payment_modes_for_expenses_only() {
    let tax = TaxonomyStore::new();
    assert_eq!(
        tax.snapshot(TransactionType::Expense).payment_modes,
        vec!["Cash", "Card", "Bank Transfer", "UPI"]
    );
    assert!(tax.snapshot(TransactionType::Income).payment_modes.is_empty());
}

#[test]
fn reset_forgets_additions() {
    let mut tax = TaxonomyStore::new();
    tax.add_category(TransactionType::Expense, "Pets").unwrap();
    tax.reset();
    assert!(!tax.contains(TransactionType::Expense, "Pets"));
    assert_eq!(tax, TaxonomyStore::new());
}

#[test]
fn icons_fall_back() {
    assert_eq!(icon_for("Bills"), "credit_card");
    assert_eq!(icon_for("Pets"), FALLBACK_ICON);
}
