// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the ledger engine.
//!
//! Only genuinely invalid requests become errors. Lookups that miss are
//! reported through `Option`/`bool` return values so callers can render an
//! "already deleted" message without unwinding.

use thiserror::Error;

/// Errors raised by the stores and the facade.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A request was malformed: non-positive amount, missing transfer
    /// fields, category type mismatch and similar.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced account/asset/category does not exist.
    #[error("Missing dependency: {kind} '{id}' not found")]
    MissingDependency {
        /// Entity kind ("account", "asset", "category").
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// The operation is refused by a store rule (e.g. deleting a system category).
    #[error("Operation refused: {0}")]
    Constraint(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    pub(crate) fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        LedgerError::MissingDependency {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// True for errors the caller caused (as opposed to storage failures).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_)
                | LedgerError::MissingDependency { .. }
                | LedgerError::Constraint(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
