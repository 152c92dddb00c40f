//! Journal queries (pure projection over the store).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use passbook_accounts::Transaction;
use passbook_core::{AccountId, LedgerError, LedgerResult};

use crate::store::LedgerStore;

/// Read side of the movement journal.
///
/// Owns no state and never writes: entries are persisted by store commits,
/// this type only derives aggregates from them.
#[derive(Debug, Clone)]
pub struct TransactionJournal<S> {
    store: S,
}

impl<S> TransactionJournal<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> TransactionJournal<S>
where
    S: LedgerStore,
{
    /// Total magnitude of withdrawals dated at or after `since`.
    ///
    /// Zero when there are none. Deposits never count, whatever the window.
    /// A total past `Decimal` range is reported, not panicked on.
    pub fn sum_withdrawals_since(
        &self,
        account_id: AccountId,
        since: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        let entries = self
            .store
            .entries_between(account_id, since, DateTime::<Utc>::MAX_UTC)
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        entries
            .iter()
            .filter(|e| e.is_withdrawal())
            .try_fold(Decimal::ZERO, |total, e| {
                total
                    .checked_add(e.magnitude())
                    .ok_or(LedgerError::ArithmeticOverflow(account_id))
            })
    }

    /// Entries for the account dated within `[from, to]`, inclusive.
    pub fn entries_between(
        &self,
        account_id: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.store
            .entries_between(account_id, from, to)
            .map_err(|e| LedgerError::storage(e.to_string()))
    }
}
