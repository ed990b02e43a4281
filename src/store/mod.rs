// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The persistent store seam.
//!
//! A store offers CRUD on transaction records plus day-filtered
//! subscriptions. Subscribers receive a full snapshot of the filtered result
//! on subscribe and again after every write that touches the filter.
//! Snapshots travel over a channel tagged with the subscriber's generation so
//! the receiving engine can tell superseded bindings apart.

pub mod memory;
pub mod sqlite;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::mpsc::Sender;

use tracing::debug;

use crate::error::StoreError;
use crate::models::{DayFilter, NewTransaction, RecordUpdate, Transaction, UserProfile};

pub type SnapshotResult = Result<Vec<Transaction>, StoreError>;

/// One delivery from a subscription.
#[derive(Debug)]
pub struct Push {
    pub generation: u64,
    pub snapshot: SnapshotResult,
}

/// Sending half of a subscription, handed to the store on `subscribe`.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
    generation: u64,
    tx: Sender<Push>,
}

impl SnapshotSink {
    pub fn new(generation: u64, tx: Sender<Push>) -> Self {
        SnapshotSink { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once the receiving side is gone.
    pub fn push(&self, snapshot: SnapshotResult) -> bool {
        self.tx
            .send(Push {
                generation: self.generation,
                snapshot,
            })
            .is_ok()
    }
}

/// Cancelable handle for a live subscription. Dropping it cancels.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(id: u64, cancel: impl FnOnce() + 'static) -> Self {
        Subscription {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub trait LedgerStore {
    /// Installs a subscription. The current snapshot is pushed before this
    /// returns.
    fn subscribe(&self, filter: &DayFilter, sink: SnapshotSink)
    -> Result<Subscription, StoreError>;

    fn insert(&self, record: &NewTransaction) -> Result<String, StoreError>;

    /// Fetches one record owned by `owner_id`. A record held by someone else
    /// is `PermissionDenied`.
    fn get(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError>;

    /// Applies `fields` to a record owned by `owner_id`. Income records
    /// never keep a payment mode, whatever `fields` says.
    fn update(&self, owner_id: &str, id: &str, fields: &RecordUpdate) -> Result<(), StoreError>;

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;

    /// One-shot fetch of every record owned by `owner_id`, in store order.
    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Transaction>, StoreError>;

    fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError>;

    fn rename_profile(&self, user_id: &str, name: &str) -> Result<(), StoreError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Rc<T> {
    fn subscribe(
        &self,
        filter: &DayFilter,
        sink: SnapshotSink,
    ) -> Result<Subscription, StoreError> {
        (**self).subscribe(filter, sink)
    }

    fn insert(&self, record: &NewTransaction) -> Result<String, StoreError> {
        (**self).insert(record)
    }

    fn get(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError> {
        (**self).get(owner_id, id)
    }

    fn update(&self, owner_id: &str, id: &str, fields: &RecordUpdate) -> Result<(), StoreError> {
        (**self).update(owner_id, id, fields)
    }

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(owner_id, id)
    }

    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Transaction>, StoreError> {
        (**self).list_for_owner(owner_id)
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        (**self).get_profile(user_id)
    }

    fn rename_profile(&self, user_id: &str, name: &str) -> Result<(), StoreError> {
        (**self).rename_profile(user_id, name)
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn subscribe(
        &self,
        filter: &DayFilter,
        sink: SnapshotSink,
    ) -> Result<Subscription, StoreError> {
        (**self).subscribe(filter, sink)
    }

    fn insert(&self, record: &NewTransaction) -> Result<String, StoreError> {
        (**self).insert(record)
    }

    fn get(&self, owner_id: &str, id: &str) -> Result<Transaction, StoreError> {
        (**self).get(owner_id, id)
    }

    fn update(&self, owner_id: &str, id: &str, fields: &RecordUpdate) -> Result<(), StoreError> {
        (**self).update(owner_id, id, fields)
    }

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(owner_id, id)
    }

    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Transaction>, StoreError> {
        (**self).list_for_owner(owner_id)
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        (**self).get_profile(user_id)
    }

    fn rename_profile(&self, user_id: &str, name: &str) -> Result<(), StoreError> {
        (**self).rename_profile(user_id, name)
    }
}

#[derive(Debug, Clone)]
struct Subscriber {
    id: u64,
    filter: DayFilter,
    sink: SnapshotSink,
}

#[derive(Debug, Default)]
struct Registry {
    live: Vec<Subscriber>,
    retired: Vec<Subscriber>,
    keep_retired: bool,
}

/// Live subscriber bookkeeping shared by the store implementations.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    inner: Rc<RefCell<Registry>>,
    next_id: Cell<u64>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps cancelled sinks around so late deliveries can be simulated.
    pub fn retaining_cancelled() -> Self {
        let reg = Self::default();
        reg.inner.borrow_mut().keep_retired = true;
        reg
    }

    pub fn register(&self, filter: &DayFilter, sink: SnapshotSink) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.inner.borrow_mut().live.push(Subscriber {
            id,
            filter: filter.clone(),
            sink,
        });
        debug!(subscription = id, owner = %filter.owner_id, date = %filter.date, "subscribed");
        let weak: Weak<RefCell<Registry>> = Rc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                let mut reg = inner.borrow_mut();
                if let Some(pos) = reg.live.iter().position(|s| s.id == id) {
                    let sub = reg.live.remove(pos);
                    if reg.keep_retired {
                        reg.retired.push(sub);
                    }
                    debug!(subscription = id, "unsubscribed");
                }
            }
        })
    }

    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    fn targets(&self, affected: Option<&[DayFilter]>) -> Vec<Subscriber> {
        self.inner
            .borrow()
            .live
            .iter()
            .filter(|s| affected.is_none_or(|fs| fs.contains(&s.filter)))
            .cloned()
            .collect()
    }

    /// Sends a fresh snapshot to every live subscriber whose filter is in
    /// `affected`. The registry is not borrowed while fetching or sending.
    pub fn publish(&self, affected: &[DayFilter], fetch: impl Fn(&DayFilter) -> SnapshotResult) {
        for sub in self.targets(Some(affected)) {
            sub.sink.push(fetch(&sub.filter));
        }
    }

    /// Sends `err` down every live subscription.
    pub fn fail_all(&self, err: &StoreError) {
        for sub in self.targets(None) {
            sub.sink.push(Err(err.clone()));
        }
    }

    /// Delivers snapshots to cancelled subscribers, as a slow backend would,
    /// then forgets them.
    pub fn publish_retired(&self, fetch: impl Fn(&DayFilter) -> SnapshotResult) -> usize {
        let subs = std::mem::take(&mut self.inner.borrow_mut().retired);
        for sub in &subs {
            sub.sink.push(fetch(&sub.filter));
        }
        subs.len()
    }
}
