// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process store with fault injection, for tests and demos.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{LedgerStore, SnapshotResult, SnapshotSink, SubscriberRegistry, Subscription};
use crate::error::StoreError;
use crate::models::{
    DayFilter, NewTransaction, RecordUpdate, Transaction, TransactionType, UserProfile,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<String, Transaction>>,
    profiles: RefCell<HashMap<String, UserProfile>>,
    registry: SubscriberRegistry,
    next_id: Cell<u64>,
    fail_next_write: RefCell<Option<StoreError>>,
    fail_next_subscribe: RefCell<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps cancelled subscriptions around so `deliver_late` can reach them.
    pub fn with_late_delivery() -> Self {
        MemoryStore {
            registry: SubscriberRegistry::retaining_cancelled(),
            ..Default::default()
        }
    }

    fn next_id(&self) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("tx-{:06}", n)
    }

    fn snapshot(&self, filter: &DayFilter) -> SnapshotResult {
        Ok(self
            .records
            .borrow()
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    fn publish(&self, affected: &[DayFilter]) {
        self.registry.publish(affected, |f| self.snapshot(f));
    }

    fn owned(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError> {
        let records = self.records.borrow();
        let tx = records
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if tx.owner_id != owner_id {
            return Err(StoreError::PermissionDenied(format!(
                "record '{}' belongs to another user",
                id
            )));
        }
        Ok(tx.clone())
    }

    fn take_write_failure(&self) -> Result<(), StoreError> {
        match self.fail_next_write.borrow_mut().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stores a record as-is, bypassing validation, and notifies subscribers.
    /// Returns the assigned id. Used to model legacy or foreign writes.
    pub fn seed(&self, mut record: Transaction) -> String {
        if record.id.is_empty() {
            record.id = self.next_id();
        }
        let id = record.id.clone();
        let filter = DayFilter::new(record.owner_id.clone(), record.date);
        self.records.borrow_mut().insert(id.clone(), record);
        self.publish(&[filter]);
        id
    }

    pub fn put_profile(&self, profile: UserProfile) {
        self.profiles
            .borrow_mut()
            .insert(profile.id.clone(), profile);
    }

    /// The next insert, update or delete fails with `err`.
    pub fn fail_next_write(&self, err: StoreError) {
        *self.fail_next_write.borrow_mut() = Some(err);
    }

    /// The next subscribe call fails with `err`.
    pub fn fail_next_subscribe(&self, err: StoreError) {
        *self.fail_next_subscribe.borrow_mut() = Some(err);
    }

    /// Pushes `err` down every live subscription.
    pub fn break_streams(&self, err: StoreError) {
        self.registry.fail_all(&err);
    }

    /// Delivers current snapshots to subscriptions that were already
    /// cancelled. Returns how many were sent.
    pub fn deliver_late(&self) -> usize {
        self.registry.publish_retired(|f| self.snapshot(f))
    }

    pub fn live_subscriptions(&self) -> usize {
        self.registry.live_count()
    }

    pub fn record(&self, id: &str) -> Option<Transaction> {
        self.records.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl LedgerStore for MemoryStore {
    fn subscribe(
        &self,
        filter: &DayFilter,
        sink: SnapshotSink,
    ) -> Result<Subscription, StoreError> {
        if let Some(e) = self.fail_next_subscribe.borrow_mut().take() {
            return Err(e);
        }
        let initial = self.snapshot(filter);
        sink.push(initial);
        Ok(self.registry.register(filter, sink))
    }

    fn insert(&self, record: &NewTransaction) -> Result<String, StoreError> {
        self.take_write_failure()?;
        let id = self.next_id();
        let tx = record.clone().into_transaction(id.clone());
        let filter = DayFilter::new(tx.owner_id.clone(), tx.date);
        self.records.borrow_mut().insert(id.clone(), tx);
        debug!(%id, "memory insert");
        self.publish(&[filter]);
        Ok(id)
    }

    fn get(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError> {
        self.owned(owner_id, id)
    }

    fn update(&self, owner_id: &str, id: &str, fields: &RecordUpdate) -> Result<(), StoreError> {
        self.take_write_failure()?;
        self.owned(owner_id, id)?;
        let filter = {
            let mut records = self.records.borrow_mut();
            let tx = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
            fields.apply_to(tx);
            if tx.kind == TransactionType::Income {
                tx.payment_mode = None;
            }
            DayFilter::new(tx.owner_id.clone(), tx.date)
        };
        self.publish(&[filter]);
        Ok(())
    }

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        self.take_write_failure()?;
        self.owned(owner_id, id)?;
        let removed = self
            .records
            .borrow_mut()
            .remove(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        self.publish(&[DayFilter::new(removed.owner_id, removed.date)]);
        Ok(())
    }

    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .records
            .borrow()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        self.profiles
            .borrow()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                id: user_id.to_string(),
            })
    }

    fn rename_profile(&self, user_id: &str, name: &str) -> Result<(), StoreError> {
        self.take_write_failure()?;
        let mut profiles = self.profiles.borrow_mut();
        let p = profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound {
                id: user_id.to_string(),
            })?;
        p.name = name.to_string();
        Ok(())
    }
}
