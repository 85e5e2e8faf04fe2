//! Optimistic local subscription list with explicit pending writes
//!
//! Changes apply to the local list immediately and are recorded as write
//! intents. Settling an intent produces a user notice. A failed write is
//! not rolled back: the subscription stays in (or out of) the local list
//! and the intent moves to `diverged` so the mismatch with the store is
//! visible to the caller.

use crate::services::store::SubscriptionStore;
use crate::services::Aggregator;
use crate::types::{DashboardSummary, Notice, Result, Subscription};
use log::{info, warn};

/// Identifies one locally applied change
pub type IntentId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Create(Subscription),
    Delete(Subscription),
}

impl WriteOp {
    fn subscription(&self) -> &Subscription {
        match self {
            Self::Create(sub) | Self::Delete(sub) => sub,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub intent: IntentId,
    pub op: WriteOp,
}

#[derive(Debug, Default)]
pub struct SubscriptionLedger {
    subscriptions: Vec<Subscription>,
    pending: Vec<PendingWrite>,
    diverged: Vec<PendingWrite>,
    next_intent: IntentId,
}

impl SubscriptionLedger {
    /// Start from a snapshot loaded from the store
    pub fn new(snapshot: Vec<Subscription>) -> Self {
        Self {
            subscriptions: snapshot,
            ..Self::default()
        }
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn pending(&self) -> &[PendingWrite] {
        &self.pending
    }

    /// Writes whose remote half failed; local state kept the change
    pub fn diverged(&self) -> &[PendingWrite] {
        &self.diverged
    }

    /// Recomputed from the local list
    pub fn summary(&self) -> DashboardSummary {
        Aggregator::summary(&self.subscriptions)
    }

    /// Append locally and record a pending create
    pub fn add(&mut self, sub: Subscription) -> IntentId {
        self.subscriptions.push(sub.clone());
        self.record(WriteOp::Create(sub))
    }

    /// Remove locally; `None` when the id isn't in the local list
    pub fn remove(&mut self, id: &str) -> Option<IntentId> {
        let pos = self.subscriptions.iter().position(|s| s.id == id)?;
        let sub = self.subscriptions.remove(pos);
        Some(self.record(WriteOp::Delete(sub)))
    }

    fn record(&mut self, op: WriteOp) -> IntentId {
        let intent = self.next_intent;
        self.next_intent += 1;
        self.pending.push(PendingWrite { intent, op });
        intent
    }

    /// Resolve an intent with the store's outcome.
    ///
    /// Returns `None` for an unknown (or already settled) intent.
    pub fn settle(&mut self, intent: IntentId, outcome: Result<()>) -> Option<Notice> {
        let pos = self.pending.iter().position(|p| p.intent == intent)?;
        let write = self.pending.remove(pos);
        let name = write.op.subscription().name.clone();
        let is_create = matches!(write.op, WriteOp::Create(_));

        let notice = match outcome {
            Ok(()) if is_create => Notice::success(format!("Added {}", name)),
            Ok(()) => Notice::success(format!("Removed {}", name)),
            Err(e) => {
                warn!("write intent {} failed, keeping local state: {}", intent, e);
                let verb = if is_create { "save" } else { "delete" };
                self.diverged.push(write);
                Notice::error(format!("Failed to {} {}: {}", verb, name, e))
            }
        };
        Some(notice)
    }

    /// Send every pending write to `store` in order and settle each one
    pub fn flush<S: SubscriptionStore + ?Sized>(
        &mut self,
        store: &S,
        user_id: &str,
    ) -> Vec<Notice> {
        let pending = self.pending.clone();
        let mut notices = Vec::with_capacity(pending.len());

        for write in pending {
            let outcome = match &write.op {
                WriteOp::Create(sub) => store.create_subscription(user_id, sub),
                WriteOp::Delete(sub) => store.delete_subscription(user_id, &sub.id),
            };
            if let Some(notice) = self.settle(write.intent, outcome) {
                notices.push(notice);
            }
        }

        info!(
            "flushed {} write(s), {} diverged",
            notices.len(),
            self.diverged.len()
        );
        notices
    }
}
