//! Durable account + journal storage boundary.
//!
//! This module defines the capability set the engine needs from storage —
//! snapshot reads, revision-checked atomic commits, journal range queries —
//! without making any storage assumptions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use passbook_accounts::{Account, Transaction};
use passbook_core::{AccountId, TransactionId};

pub mod in_memory;

pub use in_memory::InMemoryLedgerStore;

/// Store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// ledger errors (validation, invariants). The engine maps them at its
/// boundary: `RevisionConflict` feeds the optimistic retry loop; everything
/// else surfaces as a storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed: the account changed since it was read.
    #[error("revision check failed for account {account_id}: expected {expected}, found {found}")]
    RevisionConflict {
        account_id: AccountId,
        expected: u64,
        found: u64,
    },

    /// Account id already present at insert.
    #[error("account {0} already exists")]
    AccountExists(AccountId),

    /// Commit targeted an account that was never inserted.
    #[error("account {0} does not exist")]
    AccountMissing(AccountId),

    /// Journal entry id already present (the journal is append-once).
    #[error("journal entry {0} already exists")]
    EntryExists(TransactionId),

    /// An entry and the account in the same write referenced different accounts.
    #[error("entry/account mismatch: {0}")]
    EntryAccountMismatch(String),

    /// Backend failure (IO, poisoned lock).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Account + journal storage with revision-checked atomic commits.
///
/// ## Commit semantics
///
/// `commit()` is the single atomic scope of the ledger. It must:
/// - verify the stored revision equals `expected_revision`, failing with
///   [`StoreError::RevisionConflict`] otherwise,
/// - write the account snapshot and (for money movements) append the journal
///   entry together, all or nothing,
/// - leave both untouched on any failure, so callers can re-read and retry.
///
/// Because every journal append rides on a revision bump, an unchanged
/// revision also pins the journal contents a caller derived its decision
/// from — daily withdrawal totals included.
///
/// ## Read semantics
///
/// Reads observe committed state only: never an account snapshot without its
/// entry or vice versa. `entries_between` bounds are inclusive and ordering
/// is stable within a single call.
pub trait LedgerStore: Send + Sync {
    /// Create an account and, in the same atomic scope, the optional opening
    /// journal entry. An existing id fails the whole insert.
    fn insert_account(
        &self,
        account: Account,
        opening_entry: Option<Transaction>,
    ) -> Result<(), StoreError>;

    /// Snapshot read; `Ok(None)` when the account does not exist.
    fn fetch_account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Revision-checked atomic write of the account snapshot plus an optional
    /// journal entry (present for money movements, absent for flag changes).
    fn commit(
        &self,
        account: Account,
        expected_revision: u64,
        entry: Option<Transaction>,
    ) -> Result<(), StoreError>;

    /// Journal entries for the account dated within `[from, to]`.
    fn entries_between(
        &self,
        account_id: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert_account(
        &self,
        account: Account,
        opening_entry: Option<Transaction>,
    ) -> Result<(), StoreError> {
        (**self).insert_account(account, opening_entry)
    }

    fn fetch_account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        (**self).fetch_account(account_id)
    }

    fn commit(
        &self,
        account: Account,
        expected_revision: u64,
        entry: Option<Transaction>,
    ) -> Result<(), StoreError> {
        (**self).commit(account, expected_revision, entry)
    }

    fn entries_between(
        &self,
        account_id: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        (**self).entries_between(account_id, from, to)
    }
}
