//! Engine instrumentation hook.
//!
//! The engine reports operation lifecycle points to an injected observer
//! instead of logging from domain logic. [`TracingObserver`] is the default
//! wiring into `tracing`; tests inject recording implementations.

use passbook_core::{AccountId, LedgerError};

/// Hook the engine calls at defined lifecycle points.
///
/// All methods default to no-ops; implement the ones you care about.
pub trait LedgerObserver: Send + Sync {
    /// An operation began, before any read.
    fn operation_started(&self, _op: &'static str, _account_id: AccountId) {}

    /// An operation was rejected by validation; no state changed.
    fn operation_rejected(&self, _op: &'static str, _account_id: AccountId, _error: &LedgerError) {
    }

    /// A commit hit a revision conflict and the engine is about to retry.
    fn retrying(&self, _op: &'static str, _account_id: AccountId, _attempt: u32) {}

    /// A write committed, leaving the account at the given revision.
    fn committed(&self, _op: &'static str, _account_id: AccountId, _revision: u64) {}
}

/// Observer that emits structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LedgerObserver for TracingObserver {
    fn operation_started(&self, op: &'static str, account_id: AccountId) {
        tracing::debug!(op, account_id = %account_id, "ledger operation started");
    }

    fn operation_rejected(&self, op: &'static str, account_id: AccountId, error: &LedgerError) {
        tracing::warn!(op, account_id = %account_id, error = %error, "ledger operation rejected");
    }

    fn retrying(&self, op: &'static str, account_id: AccountId, attempt: u32) {
        tracing::debug!(op, account_id = %account_id, attempt, "commit conflicted, retrying");
    }

    fn committed(&self, op: &'static str, account_id: AccountId, revision: u64) {
        tracing::info!(op, account_id = %account_id, revision, "ledger operation committed");
    }
}
