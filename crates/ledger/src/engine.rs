//! Account ledger engine (application-level orchestration).
//!
//! The engine owns the account lifecycle and both money movements. Every
//! mutating operation runs the same pipeline:
//!
//! ```text
//! load account snapshot
//!   ↓
//! validate (exists → active → funds → daily limit)
//!   ↓
//! commit snapshot + journal entry atomically, conditional on the revision
//! read above; on conflict, re-run from the top (bounded)
//! ```
//!
//! The commit-time revision check is the authoritative re-validation: every
//! journal append rides on a revision bump, so an unchanged revision pins
//! both the balance and the daily withdrawal total the validation read.
//! Validation failures are detected before any durable write and leave no
//! partial effects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use passbook_accounts::{Account, NewAccount, Transaction};
use passbook_core::{AccountId, Clock, LedgerError, LedgerResult, SystemClock, day_start};
use passbook_persons::PersonDirectory;

use crate::config::EngineConfig;
use crate::journal::TransactionJournal;
use crate::observe::{LedgerObserver, TracingObserver};
use crate::store::{LedgerStore, StoreError};

/// The account ledger engine.
///
/// Holds no account state of its own: every operation re-reads from the
/// store, so one instance is safe to share across threads and never serves
/// stale balances.
pub struct LedgerEngine<S, P> {
    store: S,
    journal: TransactionJournal<S>,
    persons: P,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn LedgerObserver>,
    config: EngineConfig,
}

impl<S, P> LedgerEngine<S, P>
where
    S: LedgerStore + Clone,
    P: PersonDirectory,
{
    /// Engine over a store and a person directory, with the system clock,
    /// tracing instrumentation, and default configuration.
    pub fn new(store: S, persons: P) -> Self {
        Self {
            journal: TransactionJournal::new(store.clone()),
            store,
            persons,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            config: EngineConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LedgerObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Open an account for an existing person.
    ///
    /// Fails with [`LedgerError::PersonNotFound`] when the holder does not
    /// resolve, and with [`LedgerError::NegativeWithdrawalLimit`] on a bad
    /// draft. The opening balance is journaled only when
    /// [`EngineConfig::journal_opening_balance`] is set, in the same atomic
    /// scope as the account row.
    pub fn create_account(&self, draft: NewAccount) -> LedgerResult<Account> {
        let op = "create_account";
        let account_id = AccountId::new();
        self.observer.operation_started(op, account_id);

        let person = self
            .persons
            .find(draft.person_id)
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        if person.is_none() {
            return Err(self.reject(op, account_id, LedgerError::PersonNotFound(draft.person_id)));
        }

        let now = self.clock.now();
        let account =
            Account::open(account_id, draft, now).map_err(|e| self.reject(op, account_id, e))?;

        let opening_entry = if self.config.journal_opening_balance && !account.balance().is_zero() {
            Some(Transaction::movement(account_id, account.balance(), now))
        } else {
            None
        };

        self.store
            .insert_account(account.clone(), opening_entry)
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        self.observer.committed(op, account_id, account.revision());
        Ok(account)
    }

    /// Current balance.
    pub fn balance(&self, account_id: AccountId) -> LedgerResult<Decimal> {
        let op = "get_balance";
        self.observer.operation_started(op, account_id);
        Ok(self.load(op, account_id)?.balance())
    }

    /// Mark the account active.
    ///
    /// Idempotent: an already-active account is returned untouched, with no
    /// write and no revision bump.
    pub fn activate(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.set_active("activate", account_id, true)
    }

    /// Mark the account inactive. Symmetric to [`LedgerEngine::activate`].
    pub fn deactivate(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.set_active("deactivate", account_id, false)
    }

    /// Deposit a positive amount.
    ///
    /// The balance increase and the `+amount` journal entry commit
    /// atomically; the returned entry is the one persisted.
    pub fn deposit(&self, account_id: AccountId, amount: Decimal) -> LedgerResult<Transaction> {
        let op = "deposit";
        self.observer.operation_started(op, account_id);
        self.ensure_positive(op, account_id, amount)?;

        let mut attempt = 0;
        loop {
            let mut account = self.load(op, account_id)?;
            account
                .ensure_active()
                .map_err(|e| self.reject(op, account_id, e))?;

            let expected = account.revision();
            account
                .credit(amount)
                .map_err(|e| self.reject(op, account_id, e))?;
            let entry = Transaction::movement(account_id, amount, self.clock.now());

            match self.store.commit(account, expected, Some(entry.clone())) {
                Ok(()) => {
                    self.observer.committed(op, account_id, expected + 1);
                    return Ok(entry);
                }
                Err(StoreError::RevisionConflict { .. }) => {
                    attempt += 1;
                    self.check_retry_budget(op, account_id, attempt)?;
                }
                Err(e) => return Err(LedgerError::storage(e.to_string())),
            }
        }
    }

    /// Withdraw a positive amount.
    ///
    /// A non-positive amount fails before anything is read. Past that the
    /// validation order is part of the contract: exists, then active, then
    /// funds (taking exactly the full balance is allowed), then the daily
    /// ceiling; the first failure wins and leaves state untouched. The
    /// balance decrease and the `-amount` journal entry commit atomically.
    pub fn withdraw(&self, account_id: AccountId, amount: Decimal) -> LedgerResult<Transaction> {
        let op = "withdraw";
        self.observer.operation_started(op, account_id);
        self.ensure_positive(op, account_id, amount)?;

        let mut attempt = 0;
        loop {
            let mut account = self.load(op, account_id)?;
            account
                .ensure_active()
                .map_err(|e| self.reject(op, account_id, e))?;
            account
                .ensure_can_cover(amount)
                .map_err(|e| self.reject(op, account_id, e))?;

            let now = self.clock.now();
            let spent = self
                .journal
                .sum_withdrawals_since(account_id, day_start(now))?;
            let limit = account.daily_withdrawal_limit();
            let Some(projected) = spent.checked_add(amount) else {
                return Err(self.reject(
                    op,
                    account_id,
                    LedgerError::ArithmeticOverflow(account_id),
                ));
            };
            if projected > limit {
                return Err(self.reject(
                    op,
                    account_id,
                    LedgerError::daily_limit_exceeded(spent, limit, amount),
                ));
            }

            let expected = account.revision();
            account
                .debit(amount)
                .map_err(|e| self.reject(op, account_id, e))?;
            let entry = Transaction::movement(account_id, -amount, now);

            match self.store.commit(account, expected, Some(entry.clone())) {
                Ok(()) => {
                    self.observer.committed(op, account_id, expected + 1);
                    return Ok(entry);
                }
                Err(StoreError::RevisionConflict { .. }) => {
                    attempt += 1;
                    self.check_retry_budget(op, account_id, attempt)?;
                }
                Err(e) => return Err(LedgerError::storage(e.to_string())),
            }
        }
    }

    /// Journal entries for the account dated within `[from, to]`.
    ///
    /// Omitted bounds default to the epoch and now, respectively; both
    /// bounds are inclusive. Ordering is stable within a single call.
    pub fn transactions(
        &self,
        account_id: AccountId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> LedgerResult<Vec<Transaction>> {
        let op = "get_transactions";
        self.observer.operation_started(op, account_id);
        self.load(op, account_id)?;

        let from = from.unwrap_or(DateTime::UNIX_EPOCH);
        let to = to.unwrap_or_else(|| self.clock.now());
        self.journal.entries_between(account_id, from, to)
    }

    fn set_active(
        &self,
        op: &'static str,
        account_id: AccountId,
        active: bool,
    ) -> LedgerResult<Account> {
        self.observer.operation_started(op, account_id);

        let mut attempt = 0;
        loop {
            let mut account = self.load(op, account_id)?;
            if account.is_active() == active {
                // Idempotent: nothing to write.
                return Ok(account);
            }

            let expected = account.revision();
            if active {
                account.activated();
            } else {
                account.deactivated();
            }

            match self.store.commit(account.clone(), expected, None) {
                Ok(()) => {
                    self.observer.committed(op, account_id, account.revision());
                    return Ok(account);
                }
                Err(StoreError::RevisionConflict { .. }) => {
                    attempt += 1;
                    self.check_retry_budget(op, account_id, attempt)?;
                }
                Err(e) => return Err(LedgerError::storage(e.to_string())),
            }
        }
    }

    fn load(&self, op: &'static str, account_id: AccountId) -> LedgerResult<Account> {
        let fetched = self
            .store
            .fetch_account(account_id)
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        match fetched {
            Some(account) => Ok(account),
            None => Err(self.reject(op, account_id, LedgerError::AccountNotFound(account_id))),
        }
    }

    fn ensure_positive(
        &self,
        op: &'static str,
        account_id: AccountId,
        amount: Decimal,
    ) -> LedgerResult<()> {
        if amount > Decimal::ZERO {
            Ok(())
        } else {
            Err(self.reject(op, account_id, LedgerError::NonPositiveAmount(amount)))
        }
    }

    fn check_retry_budget(
        &self,
        op: &'static str,
        account_id: AccountId,
        attempt: u32,
    ) -> LedgerResult<()> {
        if attempt > self.config.max_commit_retries {
            Err(self.reject(op, account_id, LedgerError::ConcurrencyConflict(account_id)))
        } else {
            self.observer.retrying(op, account_id, attempt);
            Ok(())
        }
    }

    fn reject(&self, op: &'static str, account_id: AccountId, error: LedgerError) -> LedgerError {
        self.observer.operation_rejected(op, account_id, &error);
        error
    }
}
