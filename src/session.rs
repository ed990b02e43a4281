// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A signed-in dashboard: the engine, the session's taxonomy, and the day
//! currently being looked at.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::aggregation::{Aggregate, BreakdownWindow, CategoryBreakdown};
use crate::engine::{DayView, LedgerEngine, SyncReport};
use crate::error::{LedgerError, ValidationError};
use crate::identity::IdentityProvider;
use crate::models::{CurrentUser, TransactionDraft, TransactionPatch, TransactionType, UserProfile};
use crate::store::LedgerStore;
use crate::taxonomy::{TaxonomySnapshot, TaxonomyStore};

pub struct Session<S: LedgerStore> {
    user: CurrentUser,
    engine: LedgerEngine<S>,
    taxonomy: TaxonomyStore,
    selected: NaiveDate,
}

impl<S: LedgerStore> Session<S> {
    /// Binds `date` straight away and applies the initial snapshot.
    pub fn start(store: S, user: CurrentUser, date: NaiveDate) -> Result<Self, LedgerError> {
        let mut engine = LedgerEngine::new(store);
        engine.bind_day(&user, date)?;
        engine.pump();
        Ok(Session {
            user,
            engine,
            taxonomy: TaxonomyStore::new(),
            selected: date,
        })
    }

    /// `start` for whoever is signed in.
    pub fn sign_in(
        store: S,
        identity: &dyn IdentityProvider,
        date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        let user = identity.current_user().ok_or(LedgerError::NoUser)?;
        Self::start(store, user, date)
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn engine(&self) -> &LedgerEngine<S> {
        &self.engine
    }

    pub fn view(&self) -> Option<&DayView> {
        self.engine.view()
    }

    pub fn aggregate(&self) -> &Aggregate {
        self.engine.aggregate()
    }

    pub fn taxonomy(&self) -> &TaxonomyStore {
        &self.taxonomy
    }

    pub fn taxonomy_snapshot(&self, kind: TransactionType) -> TaxonomySnapshot {
        self.taxonomy.snapshot(kind)
    }

    pub fn sync(&mut self) -> SyncReport {
        self.engine.pump()
    }

    pub fn goto(&mut self, date: NaiveDate) -> Result<SyncReport, LedgerError> {
        self.engine.bind_day(&self.user, date)?;
        self.selected = date;
        debug!(%date, "selected day changed");
        Ok(self.engine.pump())
    }

    pub fn prev_day(&mut self) -> Result<SyncReport, LedgerError> {
        let date = self
            .selected
            .checked_sub_signed(Duration::days(1))
            .ok_or(LedgerError::DateOutOfRange)?;
        self.goto(date)
    }

    pub fn next_day(&mut self) -> Result<SyncReport, LedgerError> {
        let date = self
            .selected
            .checked_add_signed(Duration::days(1))
            .ok_or(LedgerError::DateOutOfRange)?;
        self.goto(date)
    }

    pub fn add_category(
        &mut self,
        kind: TransactionType,
        name: &str,
    ) -> Result<String, ValidationError> {
        self.taxonomy.add_category(kind, name)
    }

    pub fn create(&mut self, draft: &TransactionDraft) -> Result<String, LedgerError> {
        let id = self.engine.create(draft, &self.taxonomy)?;
        self.engine.pump();
        Ok(id)
    }

    pub fn update(&mut self, id: &str, patch: &TransactionPatch) -> Result<(), LedgerError> {
        self.engine.update(id, patch)?;
        self.engine.pump();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), LedgerError> {
        self.engine.remove(id)?;
        self.engine.pump();
        Ok(())
    }

    pub fn set_breakdown_window(&mut self, window: BreakdownWindow, reference: NaiveDate) {
        self.engine.set_breakdown_window(window, reference);
    }

    pub fn breakdown(&self) -> Result<CategoryBreakdown, LedgerError> {
        self.engine.breakdown()
    }

    pub fn profile(&self) -> Result<UserProfile, LedgerError> {
        Ok(self.engine.store().get_profile(&self.user.id)?)
    }

    pub fn rename(&mut self, name: &str) -> Result<(), LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.engine.store().rename_profile(&self.user.id, name)?;
        self.user.display_name = name.to_string();
        Ok(())
    }

    /// Unbinds and forgets session categories.
    pub fn end(&mut self) {
        self.engine.close();
        self.taxonomy.reset();
    }
}
