// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! "Ledger changed" notifications.
//!
//! Subscribers get the id of the bill that changed and are expected to
//! re-query whatever they display.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "bill_id", rename_all = "snake_case")]
pub enum LedgerEvent {
    BillCreated(String),
    BillUpdated(String),
    BillDeleted(String),
}

impl LedgerEvent {
    pub fn bill_id(&self) -> &str {
        match self {
            LedgerEvent::BillCreated(id)
            | LedgerEvent::BillUpdated(id)
            | LedgerEvent::BillDeleted(id) => id,
        }
    }
}

pub struct LedgerEvents {
    tx: broadcast::Sender<LedgerEvent>,
}

impl Default for LedgerEvents {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl LedgerEvents {
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget; having no subscribers is fine.
    pub fn publish(&self, event: LedgerEvent) {
        let delivered = self.tx.send(event.clone()).unwrap_or(0);
        trace!(?event, delivered, "ledger event published");
    }
}
