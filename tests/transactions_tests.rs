// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use trackify::models::{CurrentUser, PaymentMode, TransactionType};
use trackify::session::Session;
use trackify::store::memory::MemoryStore;
use trackify::{cli, commands::transactions};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn start(store: &MemoryStore) -> Session<&MemoryStore> {
    let user = CurrentUser {
        id: "u1".into(),
        display_name: "Asha".into(),
    };
    Session::start(store, user, day()).unwrap()
}

fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["trackify", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => match tx_m.subcommand() {
            Some((_, sub)) => sub.clone(),
            None => panic!("no tx subcommand"),
        },
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn draft_defaults_to_expense_on_selected_day() {
    let m = tx_matches(&["add", "-c", "Food", "-p", "upi", "-a", "12"]);
    let draft = transactions::draft_from_matches(&m, day()).unwrap();
    assert_eq!(draft.kind, TransactionType::Expense);
    assert_eq!(draft.payment_mode, Some(PaymentMode::Upi));
    assert_eq!(draft.date, day());
    assert_eq!(draft.amount.as_deref(), Some("12"));
}

#[test]
fn bad_payment_mode_is_an_error() {
    let m = tx_matches(&["add", "-c", "Food", "-p", "cheque", "-a", "12"]);
    assert!(transactions::draft_from_matches(&m, day()).is_err());
}

#[test]
fn add_records_and_reports_balance() {
    let store = MemoryStore::new();
    let mut session = start(&store);
    let m = tx_matches(&["add", "-c", "Food", "-p", "cash", "-a", "100", "-n", "dinner"]);
    let mut out = Vec::new();
    let id = transactions::add(&mut out, &mut session, &m).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Recorded expense Food on 2024-03-15"));
    assert!(text.contains(&format!("(id {})", id)));
    assert_eq!(session.aggregate().expense_total, Decimal::from(100));
    assert_eq!(session.view().unwrap().get(&id).unwrap().notes, "dinner");
}

#[test]
fn add_on_another_day_moves_selection() {
    let store = MemoryStore::new();
    let mut session = start(&store);
    let m = tx_matches(&[
        "add", "-t", "income", "-c", "Salary", "-a", "500", "-d", "2024-03-16",
    ]);
    let mut out = Vec::new();
    transactions::add(&mut out, &mut session, &m).unwrap();
    assert_eq!(session.selected_date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    assert_eq!(session.aggregate().balance, Decimal::from(500));
}

#[test]
fn new_category_flag_adds_before_create() {
    let store = MemoryStore::new();
    let mut session = start(&store);

    let m = tx_matches(&["add", "-c", "Pets", "-p", "card", "-a", "40"]);
    let mut out = Vec::new();
    assert!(transactions::add(&mut out, &mut session, &m).is_err());
    assert!(store.is_empty());

    let m = tx_matches(&["add", "-c", "Pets", "-p", "card", "-a", "40", "--new-category"]);
    let mut out = Vec::new();
    transactions::add(&mut out, &mut session, &m).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Added expense category 'Pets'"));
    assert_eq!(store.len(), 1);
}

#[test]
fn edit_and_remove() {
    let store = MemoryStore::new();
    let mut session = start(&store);
    let mut out = Vec::new();
    let id = transactions::add(
        &mut out,
        &mut session,
        &tx_matches(&["add", "-c", "Food", "-p", "cash", "-a", "10"]),
    )
    .unwrap();

    transactions::edit(&mut out, &mut session, &tx_matches(&["edit", id.as_str(), "-a", "30"])).unwrap();
    assert_eq!(session.aggregate().expense_total, Decimal::from(30));

    let err = transactions::edit(&mut out, &mut session, &tx_matches(&["edit", id.as_str(), "-a", "0"]));
    assert!(err.is_err());
    assert_eq!(session.aggregate().expense_total, Decimal::from(30));

    transactions::remove(&mut out, &mut session, &tx_matches(&["rm", id.as_str()])).unwrap();
    assert!(session.view().unwrap().records.is_empty());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&format!("Removed record {}", id)));
}
