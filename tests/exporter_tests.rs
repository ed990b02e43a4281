// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;
use trackify::commands::{doctor, exporter};
use trackify::models::{Amount, PaymentMode, Transaction, TransactionType};

fn records() -> Vec<Transaction> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    vec![
        Transaction {
            id: "7".into(),
            kind: TransactionType::Expense,
            category: "Food".into(),
            payment_mode: Some(PaymentMode::BankTransfer),
            amount: Amount::Value(Decimal::new(1234, 2)),
            notes: "Weekly run".into(),
            date,
            owner_id: "u1".into(),
        },
        Transaction {
            id: "8".into(),
            kind: TransactionType::Income,
            category: "Gift".into(),
            payment_mode: None,
            amount: Amount::Malformed("abc".into()),
            notes: String::new(),
            date,
            owner_id: "u1".into(),
        },
    ]
}

#[test]
fn export_day_as_json() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("day.json");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::write_records(&records(), "json", &out_str).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(
        parsed[0],
        json!({
            "id": "7",
            "date": "2024-03-15",
            "type": "expense",
            "category": "Food",
            "paymentMode": "Bank Transfer",
            "amount": "12.34",
            "notes": "Weekly run",
            "userId": "u1",
        })
    );
    assert_eq!(parsed[1]["paymentMode"], "");
    assert_eq!(parsed[1]["amount"], "abc");
}

#[test]
fn export_day_as_csv() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("day.csv");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::write_records(&records(), "csv", &out_str).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "type", "category", "paymentMode", "amount", "notes"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][4], "Bank Transfer");
    assert_eq!(&rows[1][2], "income");
}

#[test]
fn unknown_format_is_rejected() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("day.xml");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(exporter::write_records(&records(), "xml", &out_str).is_err());
    assert!(!out_path.exists());
}

#[test]
fn doctor_reports_unreadable_and_foreign_categories() {
    let mut recs = records();
    recs[0].category = "Pets".into();
    let issues = doctor::issues(&recs);
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kinds, vec!["unreadable_amount", "non_default_category"]);

    let mut out = Vec::new();
    doctor::report(&mut out, &records()[..1]).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "doctor: no issues found\n");
}
