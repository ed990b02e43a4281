// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;
use tempfile::tempdir;
use trackify::db;
use trackify::engine::LedgerEngine;
use trackify::error::{LedgerError, StoreError};
use trackify::identity::{IdentityProvider, SettingsIdentity};
use trackify::models::{
    Amount, CurrentUser, PaymentMode, TransactionDraft, TransactionPatch, TransactionType,
};
use trackify::store::LedgerStore;
use trackify::store::sqlite::SqliteStore;
use trackify::taxonomy::TaxonomyStore;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn user() -> CurrentUser {
    CurrentUser {
        id: "u1".into(),
        display_name: "u1".into(),
    }
}

fn legacy_row(store: &SqliteStore, kind: &str, category: &str, mode: &str, amount: rusqlite::types::Value) {
    store
        .conn()
        .execute(
            "INSERT INTO transactions(type, category, payment_mode, amount, date, user_id) VALUES (?1, ?2, ?3, ?4, '2024-03-15', 'u1')",
            params![kind, category, mode, amount],
        )
        .unwrap();
}

#[test]
fn insert_round_trips_through_subscription() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut engine = LedgerEngine::new(&store);
    engine.bind_day(&user(), d(15)).unwrap();
    engine.pump();

    let draft = TransactionDraft {
        kind: TransactionType::Expense,
        category: "Food".into(),
        payment_mode: Some(PaymentMode::BankTransfer),
        amount: Some("19.99".into()),
        notes: Some("groceries".into()),
        date: d(15),
    };
    let id = engine.create(&draft, &TaxonomyStore::new()).unwrap();
    engine.pump();

    let t = engine.view().unwrap().get(&id).unwrap().clone();
    assert_eq!(t.payment_mode, Some(PaymentMode::BankTransfer));
    assert_eq!(t.amount, Amount::Value(Decimal::new(1999, 2)));
    assert_eq!(t.notes, "groceries");

    let stored: String = store
        .conn()
        .query_row("SELECT amount FROM transactions WHERE id=?1", params![id], |r| r.get(0))
        .unwrap();
    assert_eq!(stored, "19.99");
}

#[test]
fn legacy_rows_are_read_leniently() {
    let store = SqliteStore::open_in_memory().unwrap();
    legacy_row(&store, "expense", "Food", "Cash", rusqlite::types::Value::Real(12.5));
    legacy_row(&store, "expense", "Bills", "Cheque", rusqlite::types::Value::Text("abc".into()));
    legacy_row(&store, "gift", "Gift", "", rusqlite::types::Value::Null);

    let rows = store.list_for_owner("u1").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].amount.value(), Some(Decimal::new(125, 1)));
    assert_eq!(rows[1].amount, Amount::Malformed("abc".into()));
    assert_eq!(rows[1].payment_mode, None);
    assert_eq!(rows[2].kind, TransactionType::Income);
    assert_eq!(rows[2].amount.value(), None);
}

#[test]
fn writes_to_unknown_ids_are_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(store.delete("u1", "42"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.delete("u1", "tx-1"), Err(StoreError::NotFound { .. })));
    assert!(matches!(
        store.get_profile("nobody"),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn settings_identity_prefers_override() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let conn = db::open_or_init(Some(path.as_path())).unwrap();
    let store = SqliteStore::new(conn).unwrap();

    assert!(SettingsIdentity::new(store.conn(), None).current_user().is_none());

    db::ensure_user(store.conn(), "u1", Some("Asha")).unwrap();
    db::set_setting(store.conn(), "active_user", "u1").unwrap();
    let u = SettingsIdentity::new(store.conn(), None).current_user().unwrap();
    assert_eq!(u.display_name, "Asha");

    let u = SettingsIdentity::new(store.conn(), Some("u2".into()))
        .current_user()
        .unwrap();
    assert_eq!(u.id, "u2");
    assert_eq!(u.display_name, "u2");
}

#[test]
fn profile_rename_persists() {
    let store = SqliteStore::open_in_memory().unwrap();
    db::ensure_user(store.conn(), "u1", None).unwrap();
    store.rename_profile("u1", "Ravi").unwrap();
    assert_eq!(store.get_profile("u1").unwrap().name, "Ravi");
    // A bare ensure does not clobber the name.
    db::ensure_user(store.conn(), "u1", None).unwrap();
    assert_eq!(store.get_profile("u1").unwrap().name, "Ravi");
}

fn seed_income(store: &SqliteStore, owner: &str, date: &str) -> String {
    store
        .conn()
        .execute(
            "INSERT INTO transactions(type, category, payment_mode, amount, date, user_id) VALUES ('income', 'Salary', 'Cash', '500', ?1, ?2)",
            params![date, owner],
        )
        .unwrap();
    store.conn().last_insert_rowid().to_string()
}

#[test]
fn writes_are_scoped_to_the_owner() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = seed_income(&store, "u2", "2024-03-15");

    let mut engine = LedgerEngine::new(&store);
    engine.bind_day(&user(), d(15)).unwrap();
    engine.pump();

    let patch = TransactionPatch {
        amount: Some("1".into()),
        ..Default::default()
    };
    assert!(matches!(
        engine.update(&id, &patch),
        Err(LedgerError::Store(StoreError::PermissionDenied(_)))
    ));
    assert!(matches!(
        engine.remove(&id),
        Err(LedgerError::Store(StoreError::PermissionDenied(_)))
    ));
    let kept = store.get("u2", &id).unwrap();
    assert_eq!(kept.amount.value(), Some(Decimal::from(500)));
}

#[test]
fn editing_income_on_another_day_clears_payment_mode() {
    let store = SqliteStore::open_in_memory().unwrap();
    // Legacy row that still carries a mode.
    let id = seed_income(&store, "u1", "2024-03-14");

    let mut engine = LedgerEngine::new(&store);
    engine.bind_day(&user(), d(15)).unwrap();
    engine.pump();

    let patch = TransactionPatch {
        payment_mode: Some(PaymentMode::Card),
        notes: Some("bonus".into()),
        ..Default::default()
    };
    engine.update(&id, &patch).unwrap();
    let t = store.get("u1", &id).unwrap();
    assert_eq!(t.payment_mode, None);
    assert_eq!(t.notes, "bonus");
}
