//! Ledger error model.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::{AccountId, PersonId};

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Failed operations never leave partial effects: whichever variant comes
/// back, the account snapshot and its journal are as they were. `Storage`
/// wraps backend failures, `ConcurrencyConflict` reports an exhausted retry
/// budget, and everything else is a validation outcome decided before any
/// write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The referenced account does not exist.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// The referenced person does not exist (account creation).
    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    /// A money movement was attempted on a deactivated account.
    #[error("account {0} is not active")]
    AccountInactive(AccountId),

    /// A withdrawal asked for more than the current balance.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    /// A withdrawal would push the day's total past the account's ceiling.
    #[error("daily withdrawal limit exceeded: {spent} spent of {limit}, requested {requested}")]
    DailyLimitExceeded {
        spent: Decimal,
        limit: Decimal,
        requested: Decimal,
    },

    /// A deposit or withdrawal amount was zero or negative.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A daily withdrawal limit was negative at account creation.
    #[error("daily withdrawal limit must not be negative, got {0}")]
    NegativeWithdrawalLimit(Decimal),

    /// A balance or daily-total computation left the representable
    /// `Decimal` range. Nothing was written.
    #[error("amount arithmetic overflowed on account {0}")]
    ArithmeticOverflow(AccountId),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Optimistic writes kept conflicting until the retry budget ran out.
    #[error("concurrent updates on account {0} exhausted the retry budget")]
    ConcurrencyConflict(AccountId),

    /// Storage-layer failure; the account and its journal are unchanged.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn insufficient_funds(balance: Decimal, requested: Decimal) -> Self {
        Self::InsufficientFunds { balance, requested }
    }

    pub fn daily_limit_exceeded(spent: Decimal, limit: Decimal, requested: Decimal) -> Self {
        Self::DailyLimitExceeded {
            spent,
            limit,
            requested,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
