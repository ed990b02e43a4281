// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use crate::db;
use crate::models::CurrentUser;

pub const ACTIVE_USER_KEY: &str = "active_user";

/// Who is signed in. `None` means nothing can be bound.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<CurrentUser>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<CurrentUser>);

impl StaticIdentity {
    pub fn signed_in(id: &str, display_name: &str) -> Self {
        StaticIdentity(Some(CurrentUser {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }))
    }

    pub fn signed_out() -> Self {
        StaticIdentity(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<CurrentUser> {
        self.0.clone()
    }
}

/// Reads the active user from the `settings` table, with an optional
/// per-invocation override.
pub struct SettingsIdentity<'a> {
    conn: &'a Connection,
    override_id: Option<String>,
}

impl<'a> SettingsIdentity<'a> {
    pub fn new(conn: &'a Connection, override_id: Option<String>) -> Self {
        SettingsIdentity { conn, override_id }
    }
}

impl IdentityProvider for SettingsIdentity<'_> {
    fn current_user(&self) -> Option<CurrentUser> {
        let id = match &self.override_id {
            Some(id) => Some(id.clone()),
            None => db::get_setting(self.conn, ACTIVE_USER_KEY).ok().flatten(),
        }?;
        let display_name = self
            .conn
            .query_row(
                "SELECT name FROM users WHERE id=?1",
                rusqlite::params![id],
                |r| r.get::<_, String>(0),
            )
            .unwrap_or_else(|_| id.clone());
        Some(CurrentUser { id, display_name })
    }
}
