//! Request lifecycle tracking shared by every slice.
//!
//! Each slice embeds one [`RequestStatus`]: Idle → Pending →
//! (Succeeded | Failed) → Idle via [`RequestStatus::reset`]. Starting an
//! operation issues a [`Ticket`]; a completion presenting a stale ticket
//! (a newer operation or a reset happened in between) is discarded, so
//! the cache only ever reflects the most recently dispatched request.

use crate::types::{OpKind, SyncPhase};
use serde::Serialize;

/// Handle for one in-flight request. Obtained from
/// [`RequestStatus::begin`] and presented back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestStatus {
    phase: SyncPhase,
    outcome: Option<OpKind>,
    message: String,
    #[serde(skip)]
    epoch: u64,
}

impl RequestStatus {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SyncPhase::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.phase == SyncPhase::Pending
    }

    pub fn succeeded(&self) -> bool {
        self.phase == SyncPhase::Succeeded
    }

    pub fn failed(&self) -> bool {
        self.phase == SyncPhase::Failed
    }

    /// What the last successful operation did, if the slice is in the
    /// Succeeded phase.
    pub fn outcome(&self) -> Option<OpKind> {
        self.outcome
    }

    /// Human-readable success or failure text. Display only; branch on
    /// [`RequestStatus::outcome`] instead.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Enter Pending, clearing any previous outcome and message.
    /// Invalidates every ticket issued before this one.
    pub fn begin(&mut self) -> Ticket {
        self.phase = SyncPhase::Pending;
        self.outcome = None;
        self.message.clear();
        self.epoch += 1;
        Ticket(self.epoch)
    }

    /// True if `ticket` belongs to the most recent `begin`.
    pub fn accepts(&self, ticket: Ticket) -> bool {
        ticket.0 == self.epoch && self.phase == SyncPhase::Pending
    }

    /// Complete successfully. Returns false (and changes nothing) when
    /// the ticket is stale.
    pub fn succeed(&mut self, ticket: Ticket, outcome: OpKind, message: impl Into<String>) -> bool {
        if !self.accepts(ticket) {
            tracing::warn!(?outcome, "discarding stale success response");
            return false;
        }
        self.phase = SyncPhase::Succeeded;
        self.outcome = Some(outcome);
        self.message = message.into();
        true
    }

    /// Complete with a failure message. Returns false when the ticket is
    /// stale.
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.accepts(ticket) {
            tracing::warn!("discarding stale failure response");
            return false;
        }
        self.phase = SyncPhase::Failed;
        self.outcome = None;
        self.message = message.into();
        true
    }

    /// Return to Idle. Also invalidates any in-flight ticket, so a
    /// response that arrives after a reset is discarded. Idempotent.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Idle;
        self.outcome = None;
        self.message.clear();
        self.epoch += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
