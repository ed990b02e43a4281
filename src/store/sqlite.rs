// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed store. Subscriptions are served in-process: every
//! successful write re-queries the affected day and pushes it to the
//! matching subscribers.

use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{info, warn};

use super::{LedgerStore, SnapshotResult, SnapshotSink, SubscriberRegistry, Subscription};
use crate::db;
use crate::error::StoreError;
use crate::models::{
    Amount, DayFilter, NewTransaction, PaymentMode, RawAmount, RecordUpdate, Transaction,
    TransactionType, UserProfile,
};

const SELECT_COLUMNS: &str =
    "SELECT id, type, category, payment_mode, amount, notes, date, user_id FROM transactions";

pub struct SqliteStore {
    conn: Connection,
    registry: SubscriberRegistry,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        db::init_schema(&conn)?;
        Ok(SqliteStore {
            conn,
            registry: SubscriberRegistry::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn query_day(&self, filter: &DayFilter) -> SnapshotResult {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE user_id=?1 AND date=?2 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![filter.owner_id, filter.date.to_string()],
            row_to_transaction,
        )?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn fetch(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("{} WHERE id=?1", SELECT_COLUMNS),
                params![id],
                row_to_transaction,
            )
            .optional()?)
    }

    /// The row behind `id`, if `owner_id` holds it.
    fn owned(&self, owner_id: &str, id: &str) -> Result<(i64, Transaction), StoreError> {
        let row_id = parse_id(id)?;
        let tx = self
            .fetch(row_id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if tx.owner_id != owner_id {
            warn!(id = row_id, owner = %owner_id, "access to another user's record refused");
            return Err(StoreError::PermissionDenied(format!(
                "record '{}' belongs to another user",
                id
            )));
        }
        Ok((row_id, tx))
    }

    fn publish(&self, filter: DayFilter) {
        self.registry.publish(&[filter], |f| self.query_day(f));
    }
}

fn parse_id(id: &str) -> Result<i64, StoreError> {
    id.parse::<i64>()
        .map_err(|_| StoreError::NotFound { id: id.to_string() })
}

fn payment_mode_column(pm: Option<PaymentMode>) -> &'static str {
    pm.map(|m| m.as_str()).unwrap_or("")
}

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: i64 = r.get(0)?;
    let kind: String = r.get(1)?;
    let payment_mode: String = r.get(3)?;
    let raw = match r.get::<_, Value>(4)? {
        Value::Text(s) => RawAmount::Text(s),
        Value::Real(f) => RawAmount::Number(f),
        Value::Integer(i) => RawAmount::Number(i as f64),
        Value::Null | Value::Blob(_) => RawAmount::Missing,
    };
    let date: String = r.get(6)?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
    let payment_mode = if payment_mode.is_empty() {
        None
    } else {
        match payment_mode.parse::<PaymentMode>() {
            Ok(m) => Some(m),
            Err(_) => {
                warn!(id, payment_mode = %payment_mode, "unknown stored payment mode ignored");
                None
            }
        }
    };
    Ok(Transaction {
        id: id.to_string(),
        kind: TransactionType::from_store(&kind),
        category: r.get(2)?,
        payment_mode,
        amount: Amount::from(&raw),
        notes: r.get(5)?,
        date,
        owner_id: r.get(7)?,
    })
}

impl LedgerStore for SqliteStore {
    fn subscribe(
        &self,
        filter: &DayFilter,
        sink: SnapshotSink,
    ) -> Result<Subscription, StoreError> {
        let initial = self.query_day(filter)?;
        sink.push(Ok(initial));
        Ok(self.registry.register(filter, sink))
    }

    fn insert(&self, record: &NewTransaction) -> Result<String, StoreError> {
        self.conn.execute(
            "INSERT INTO transactions(type, category, payment_mode, amount, notes, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.kind.as_str(),
                record.category,
                payment_mode_column(record.payment_mode),
                record.amount.to_string(),
                record.notes,
                record.date.to_string(),
                record.owner_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, date = %record.date, kind = %record.kind, "transaction inserted");
        self.publish(DayFilter::new(record.owner_id.clone(), record.date));
        Ok(id.to_string())
    }

    fn get(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError> {
        Ok(self.owned(owner_id, id)?.1)
    }

    fn update(&self, owner_id: &str, id: &str, fields: &RecordUpdate) -> Result<(), StoreError> {
        let (row_id, current) = self.owned(owner_id, id)?;
        // Income rows lose any payment mode they are edited with or carry.
        let payment_mode = match current.kind {
            TransactionType::Income => (fields.payment_mode.is_some()
                || current.payment_mode.is_some())
            .then_some(None),
            TransactionType::Expense => fields.payment_mode,
        };
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(a) = fields.amount {
            sets.push("amount=?");
            values.push(a.to_string());
        }
        if let Some(c) = &fields.category {
            sets.push("category=?");
            values.push(c.clone());
        }
        if let Some(pm) = payment_mode {
            sets.push("payment_mode=?");
            values.push(payment_mode_column(pm).to_string());
        }
        if let Some(n) = &fields.notes {
            sets.push("notes=?");
            values.push(n.clone());
        }
        if sets.is_empty() {
            return Ok(());
        }
        values.push(row_id.to_string());
        values.push(owner_id.to_string());
        let sql = format!(
            "UPDATE transactions SET {} WHERE id=? AND user_id=?",
            sets.join(", ")
        );
        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        info!(id = row_id, "transaction updated");
        self.publish(DayFilter::new(current.owner_id, current.date));
        Ok(())
    }

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let (row_id, current) = self.owned(owner_id, id)?;
        let changed = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            params![row_id, owner_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        info!(id = row_id, "transaction deleted");
        self.publish(DayFilter::new(current.owner_id, current.date));
        Ok(())
    }

    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE user_id=?1 ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map(params![owner_id], row_to_transaction)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name FROM users WHERE id=?1",
                params![user_id],
                |r| {
                    Ok(UserProfile {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                id: user_id.to_string(),
            })
    }

    fn rename_profile(&self, user_id: &str, name: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE users SET name=?1 WHERE id=?2",
            params![name, user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                id: user_id.to_string(),
            });
        }
        Ok(())
    }
}
