// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use std::io::Cursor;
use trackify::commands::shell::{run, split_words};
use trackify::error::{LedgerError, ValidationError};
use trackify::models::{CurrentUser, TransactionType, UserProfile};
use trackify::session::Session;
use trackify::store::memory::MemoryStore;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn store_with_profile() -> MemoryStore {
    let store = MemoryStore::new();
    store.put_profile(UserProfile {
        id: "u1".into(),
        name: "Asha".into(),
    });
    store
}

fn start(store: &MemoryStore) -> Session<&MemoryStore> {
    let user = CurrentUser {
        id: "u1".into(),
        display_name: "Asha".into(),
    };
    Session::start(store, user, day()).unwrap()
}

fn script(store: &MemoryStore, lines: &str) -> String {
    let mut session = start(store);
    let mut out = Vec::new();
    run(&mut session, Cursor::new(lines.to_string()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn words_respect_quotes() {
    assert_eq!(
        split_words(r#"add -c Food -n "late dinner" -a 5"#),
        vec!["add", "-c", "Food", "-n", "late dinner", "-a", "5"]
    );
    assert_eq!(split_words(r#"add -n """#), vec!["add", "-n", ""]);
    assert!(split_words("   ").is_empty());
}

#[test]
fn shell_session_keeps_added_categories() {
    let store = store_with_profile();
    let text = script(
        &store,
        "category add expense Pet Care\n\
         add -c \"Pet Care\" -p upi -a 40\n\
         category list expense\n\
         quit\n\
         add -c Food -p cash -a 1\n",
    );
    assert!(text.contains("Added expense category 'Pet Care'"));
    assert!(text.contains("Recorded expense Pet Care"));
    assert!(text.contains("Pet Care"));
    // Nothing after quit runs.
    assert_eq!(store.len(), 1);
}

#[test]
fn errors_are_printed_and_the_loop_continues() {
    let store = store_with_profile();
    let text = script(
        &store,
        "add -c Food -p cash -a 0\n\
         bogus\n\
         add -c Food -p cash -a 12\n",
    );
    assert!(text.contains("error:"));
    assert!(text.contains("Recorded expense Food"));
    assert_eq!(store.len(), 1);
}

#[test]
fn navigation_rebinds_the_day() {
    let store = store_with_profile();
    let text = script(&store, "next\nadd -c Food -p card -a 3\nprev\ngoto 2024-03-16\n");
    assert!(text.contains("Mar 16, 2024 (Asha)"));
    assert!(text.contains("Mar 15, 2024 (Asha)"));
    let records = store.len();
    assert_eq!(records, 1);
    let t = store.record("tx-000001").unwrap();
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
}

#[test]
fn chart_and_profile() {
    let store = store_with_profile();
    let text = script(
        &store,
        "chart\n\
         add -c Travel -p cash -a 8\n\
         chart --window monthly --month 2024-03\n\
         profile\n",
    );
    assert!(text.contains("No expenses found"));
    assert!(text.contains("Expenses by category (March 2024)"));
    assert!(text.contains("Travel"));
    assert!(text.contains("Asha"));
}

#[test]
fn categories_are_forgotten_when_session_ends() {
    let store = store_with_profile();
    let mut session = start(&store);
    session.add_category(TransactionType::Income, "Prize").unwrap();
    session.end();
    assert!(!session.taxonomy().contains(TransactionType::Income, "Prize"));
    assert_eq!(store.live_subscriptions(), 0);
}

#[test]
fn rename_updates_display_name() {
    let store = store_with_profile();
    let mut session = start(&store);
    assert_eq!(
        session.rename("   "),
        Err(LedgerError::Validation(ValidationError::EmptyName))
    );
    session.rename(" Ravi ").unwrap();
    assert_eq!(session.user().display_name, "Ravi");
    assert_eq!(session.profile().unwrap().name, "Ravi");
}

#[test]
fn session_totals_follow_writes() {
    let store = store_with_profile();
    let text = script(
        &store,
        "add -c Food -p cash -a 100\n\
         add -t income -c Salary -a 500\n\
         show\n",
    );
    assert!(text.contains("₹400.00"));
}

#[test]
fn stepping_past_the_calendar_is_an_error() {
    let store = store_with_profile();
    let user = CurrentUser {
        id: "u1".into(),
        display_name: "Asha".into(),
    };
    let mut session = Session::start(&store, user, NaiveDate::MAX).unwrap();
    assert_eq!(session.next_day(), Err(LedgerError::DateOutOfRange));
    assert_eq!(session.selected_date(), NaiveDate::MAX);
    session.goto(NaiveDate::MIN).unwrap();
    assert_eq!(session.prev_day(), Err(LedgerError::DateOutOfRange));
    assert_eq!(session.selected_date(), NaiveDate::MIN);
}
