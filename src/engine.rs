// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger sync engine.
//!
//! Owns at most one day subscription at a time and the live `DayView` it
//! feeds. Every binding gets a fresh generation number; pushes carrying an
//! older generation are dropped, so the last `bind_day` always wins.
//!
//! Writes go to the store and nowhere else. The view only changes when the
//! store pushes a snapshot back, which `pump` applies.

use std::sync::mpsc::{self, Receiver, Sender};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregation::{self, Aggregate, BreakdownWindow, CategoryBreakdown};
use crate::error::{LedgerError, StoreError};
use crate::identity::IdentityProvider;
use crate::models::{
    CurrentUser, DayFilter, NewTransaction, Transaction, TransactionDraft, TransactionPatch,
};
use crate::store::{LedgerStore, Push, SnapshotSink, Subscription};
use crate::taxonomy::TaxonomyStore;
use crate::validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncState {
    Idle,
    Subscribing,
    Live,
    Rebinding,
    Closed,
}

/// A user's records for one day, as last pushed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub owner_id: String,
    pub date: NaiveDate,
    pub records: Vec<Transaction>,
    /// Snapshots applied since this day was bound.
    pub revision: u64,
}

impl DayView {
    fn empty(filter: &DayFilter) -> Self {
        DayView {
            owner_id: filter.owner_id.clone(),
            date: filter.date,
            records: Vec::new(),
            revision: 0,
        }
    }

    /// False until the first snapshot for this day arrives.
    pub fn is_loaded(&self) -> bool {
        self.revision > 0
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.records.iter().find(|t| t.id == id)
    }
}

/// Outcome of one `pump`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: usize,
    pub dropped: usize,
    pub errors: Vec<StoreError>,
}

pub struct LedgerEngine<S: LedgerStore> {
    store: S,
    state: SyncState,
    generation: u64,
    subscription: Option<Subscription>,
    tx: Sender<Push>,
    rx: Receiver<Push>,
    view: Option<DayView>,
    aggregate: Aggregate,
    aggregate_revision: u64,
    stale: Option<StoreError>,
    window: BreakdownWindow,
    reference: Option<NaiveDate>,
}

impl<S: LedgerStore> LedgerEngine<S> {
    pub fn new(store: S) -> Self {
        let (tx, rx) = mpsc::channel();
        LedgerEngine {
            store,
            state: SyncState::Idle,
            generation: 0,
            subscription: None,
            tx,
            rx,
            view: None,
            aggregate: Aggregate::default(),
            aggregate_revision: 0,
            stale: None,
            window: BreakdownWindow::All,
            reference: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> Option<&DayView> {
        self.view.as_ref()
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    /// Revision of the view the current aggregate was computed from.
    pub fn aggregate_revision(&self) -> u64 {
        self.aggregate_revision
    }

    /// Last subscription failure since the most recent good snapshot.
    pub fn staleness(&self) -> Option<&StoreError> {
        self.stale.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn cancel_active(&mut self) {
        if let Some(sub) = self.subscription.take() {
            debug!(subscription = sub.id(), generation = self.generation, "cancel");
            sub.cancel();
        }
        self.generation += 1;
    }

    /// Binds the view to `user` on `date`, replacing any previous binding.
    pub fn bind_day(&mut self, user: &CurrentUser, date: NaiveDate) -> Result<(), LedgerError> {
        if self.state == SyncState::Closed {
            return Err(LedgerError::Closed);
        }
        if self.subscription.is_some() {
            self.state = SyncState::Rebinding;
        }
        self.cancel_active();

        let filter = DayFilter::new(user.id.clone(), date);
        self.view = Some(DayView::empty(&filter));
        self.aggregate = Aggregate::default();
        self.aggregate_revision = 0;
        self.stale = None;
        self.state = SyncState::Subscribing;

        let sink = SnapshotSink::new(self.generation, self.tx.clone());
        match self.store.subscribe(&filter, sink) {
            Ok(sub) => {
                debug!(generation = self.generation, %date, owner = %user.id, "bound");
                self.subscription = Some(sub);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %date, "subscribe failed");
                self.view = None;
                self.state = SyncState::Idle;
                Err(e.into())
            }
        }
    }

    /// Binds for whoever the identity provider reports. Signed out means no
    /// subscription is attempted and any existing one is dropped.
    pub fn bind_current(
        &mut self,
        identity: &dyn IdentityProvider,
        date: NaiveDate,
    ) -> Result<(), LedgerError> {
        match identity.current_user() {
            Some(user) => self.bind_day(&user, date),
            None => {
                self.unbind();
                Err(LedgerError::NoUser)
            }
        }
    }

    pub fn unbind(&mut self) {
        if self.state == SyncState::Closed {
            return;
        }
        self.cancel_active();
        self.view = None;
        self.aggregate = Aggregate::default();
        self.aggregate_revision = 0;
        self.stale = None;
        self.state = SyncState::Idle;
    }

    /// Terminal: unbinds and refuses further bindings.
    pub fn close(&mut self) {
        self.unbind();
        self.state = SyncState::Closed;
    }

    /// Applies every push received so far, in arrival order.
    pub fn pump(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        while let Ok(push) = self.rx.try_recv() {
            if push.generation != self.generation || self.subscription.is_none() {
                warn!(
                    push = push.generation,
                    current = self.generation,
                    "dropping push from superseded binding"
                );
                report.dropped += 1;
                continue;
            }
            match push.snapshot {
                Ok(records) => {
                    self.apply_snapshot(records);
                    report.applied += 1;
                }
                Err(e) => {
                    warn!(error = %e, "subscription failed; keeping last view");
                    self.stale = Some(e.clone());
                    report.errors.push(e);
                }
            }
        }
        report
    }

    fn apply_snapshot(&mut self, records: Vec<Transaction>) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let aggregate = aggregation::daily_aggregate(&records);
        view.records = records;
        view.revision += 1;
        self.aggregate = aggregate;
        self.aggregate_revision = view.revision;
        self.stale = None;
        self.state = SyncState::Live;
        debug!(
            revision = view.revision,
            records = view.records.len(),
            "snapshot applied"
        );
    }

    fn bound_owner(&self) -> Result<String, LedgerError> {
        match (&self.state, &self.view) {
            (SyncState::Closed, _) => Err(LedgerError::Closed),
            (_, Some(v)) => Ok(v.owner_id.clone()),
            (_, None) => Err(LedgerError::NotBound),
        }
    }

    /// Validates `draft` and inserts it for the bound user. The view picks
    /// the record up from the next push.
    pub fn create(
        &mut self,
        draft: &TransactionDraft,
        taxonomy: &TaxonomyStore,
    ) -> Result<String, LedgerError> {
        let owner = self.bound_owner()?;
        let amount = validator::validate_with(draft, taxonomy)?;
        let record = NewTransaction::from_draft(draft, amount, &owner);
        let id = self.store.insert(&record)?;
        info!(%id, kind = %record.kind, category = %record.category, "created");
        Ok(id)
    }

    /// Validates `patch` against the stored record, wherever it sits, and
    /// writes it for the bound user.
    pub fn update(&mut self, id: &str, patch: &TransactionPatch) -> Result<(), LedgerError> {
        let owner = self.bound_owner()?;
        let current = self.store.get(&owner, id)?;
        let fields = validator::validate_patch(patch, Some(current.kind))?;
        self.store.update(&owner, id, &fields)?;
        info!(%id, "updated");
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), LedgerError> {
        let owner = self.bound_owner()?;
        self.store.delete(&owner, id)?;
        info!(%id, "removed");
        Ok(())
    }

    pub fn set_breakdown_window(&mut self, window: BreakdownWindow, reference: NaiveDate) {
        self.window = window;
        self.reference = Some(reference);
    }

    pub fn breakdown_window(&self) -> BreakdownWindow {
        self.window
    }

    /// Category breakdown over all of the bound user's records for the
    /// current window. The reference date defaults to the bound day.
    pub fn breakdown(&self) -> Result<CategoryBreakdown, LedgerError> {
        let owner = self.bound_owner()?;
        let reference = self
            .reference
            .or_else(|| self.view.as_ref().map(|v| v.date))
            .ok_or(LedgerError::NotBound)?;
        let records = self.store.list_for_owner(&owner)?;
        Ok(aggregation::category_breakdown(
            &records,
            self.window,
            reference,
        ))
    }
}
