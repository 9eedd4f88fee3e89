// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tracing::{debug, info};

use super::{new_id, normalize_optional, now, required_text};
use crate::db::{self, KEY_SESSION};
use crate::error::{LedgerError, Result};
use crate::models::{ProfilePatch, Session, User};

/// Single-user identity record plus the signed-in flag.
pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn session(&self) -> Result<Session> {
        Ok(db::load_record(self.conn, KEY_SESSION)?.unwrap_or_default())
    }

    fn save(&self, s: &Session) -> Result<()> {
        db::save_record(self.conn, KEY_SESSION, s)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        let s = self.session()?;
        Ok(s.logged_in && s.user.is_some())
    }

    /// The signed-in user, if any.
    pub fn current(&self) -> Result<Option<User>> {
        let s = self.session()?;
        Ok(if s.logged_in { s.user } else { None })
    }

    /// Creates the user record, replacing any previous one, and signs in.
    pub fn register(&self, username: &str, email: &str) -> Result<User> {
        let user = User {
            id: new_id(),
            username: required_text("username", username)?,
            email: validate_email(email)?,
            verified: false,
            avatar: None,
            created_at: now(),
        };
        self.save(&Session {
            user: Some(user.clone()),
            logged_in: true,
        })?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Signs in the stored user when `identifier` matches its username or
    /// email (case-insensitive). Returns `None` when it does not.
    pub fn login(&self, identifier: &str) -> Result<Option<User>> {
        let mut s = self.session()?;
        let needle = identifier.trim().to_lowercase();
        let matched = s.user.as_ref().is_some_and(|u| {
            u.username.to_lowercase() == needle || u.email.to_lowercase() == needle
        });
        if !matched {
            debug!(identifier = %identifier, "login did not match stored user");
            return Ok(None);
        }
        s.logged_in = true;
        self.save(&s)?;
        Ok(s.user)
    }

    pub fn logout(&self) -> Result<()> {
        let mut s = self.session()?;
        s.logged_in = false;
        self.save(&s)?;
        debug!("logged out");
        Ok(())
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Option<User>> {
        let mut s = self.session()?;
        let Some(user) = s.user.as_mut() else {
            return Ok(None);
        };
        if let Some(name) = patch.username {
            user.username = required_text("username", &name)?;
        }
        if let Some(email) = patch.email {
            user.email = validate_email(&email)?;
        }
        if let Some(v) = patch.verified {
            user.verified = v;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = normalize_optional(avatar);
        }
        let updated = user.clone();
        self.save(&s)?;
        debug!(user_id = %updated.id, "profile updated");
        Ok(Some(updated))
    }
}

fn validate_email(email: &str) -> Result<String> {
    let e = email.trim();
    match e.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(e.to_string()),
        _ => Err(LedgerError::invalid(format!("invalid email '{}'", e))),
    }
}
