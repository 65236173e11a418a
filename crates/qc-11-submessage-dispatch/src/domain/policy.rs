//! # Reply Policy
//!
//! Decides, from the dispatch outcome and the declared [`ReplyOn`], whether
//! the originating contract is called back.
//!
//! | Outcome | Success | Never | Always | Error |
//! |---------|---------|-------|--------|-------|
//! | success | reply | skip | reply | skip |
//! | failure | abort batch | abort batch | reply | reply |
//!
//! `Success` replies on success: a contract that asks for success callbacks
//! gets them, and only `Never` or `Error` keep a successful dispatch silent.

use crate::domain::entities::ReplyOn;

/// What to do after a submessage was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyDecision {
    /// Continue with the next submessage.
    Skip,
    /// Call the contract's reply entry point.
    Reply,
    /// Stop the batch and return the dispatch error as-is.
    Abort,
}

/// Looks up the decision table.
#[must_use]
pub const fn decide(reply_on: ReplyOn, succeeded: bool) -> ReplyDecision {
    match (reply_on, succeeded) {
        (ReplyOn::Success | ReplyOn::Never, false) => ReplyDecision::Abort,
        (ReplyOn::Never | ReplyOn::Error, true) => ReplyDecision::Skip,
        (ReplyOn::Always, _) | (ReplyOn::Success, true) | (ReplyOn::Error, false) => {
            ReplyDecision::Reply
        }
    }
}

// =============================================================================
// SUBMESSAGE STATE MACHINE
// =============================================================================

/// Lifecycle of one submessage.
///
/// `Dispatching → {Committed, RolledBack} → {ReplySkipped, ReplyInvoked, Aborted}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubMsgState {
    /// Message handed to the messenger.
    Dispatching,
    /// Dispatch succeeded; overlay merged into the parent.
    Committed,
    /// Dispatch failed; overlay discarded.
    RolledBack,
    /// No reply for this submessage.
    ReplySkipped,
    /// Reply sent to the contract.
    ReplyInvoked,
    /// Batch aborted on this submessage.
    Aborted,
}

impl SubMsgState {
    /// Transition out of `Dispatching`.
    #[must_use]
    pub const fn dispatched(self, succeeded: bool) -> Self {
        match self {
            Self::Dispatching if succeeded => Self::Committed,
            Self::Dispatching => Self::RolledBack,
            other => other,
        }
    }

    /// Transition out of `Committed` / `RolledBack`.
    #[must_use]
    pub const fn resolve(self, decision: ReplyDecision) -> Self {
        match (self, decision) {
            (Self::Committed | Self::RolledBack, ReplyDecision::Skip) => Self::ReplySkipped,
            (Self::Committed | Self::RolledBack, ReplyDecision::Reply) => Self::ReplyInvoked,
            (Self::Committed | Self::RolledBack, ReplyDecision::Abort) => Self::Aborted,
            (other, _) => other,
        }
    }

    /// Returns true for the three final states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ReplySkipped | Self::ReplyInvoked | Self::Aborted)
    }
}

// =============================================================================
// TESTS
// =============================================================================
