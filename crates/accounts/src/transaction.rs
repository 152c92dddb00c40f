use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use passbook_core::{AccountId, TransactionId};

/// An immutable journal entry: one signed monetary movement on one account.
///
/// Positive `value` is a deposit, negative is a withdrawal. Entries are
/// created once per committed movement and never mutated or deleted; the
/// account balance is derivable from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    transaction_id: TransactionId,
    account_id: AccountId,
    value: Decimal,
    transaction_date: DateTime<Utc>,
}

impl Transaction {
    /// Mint the entry for a movement. Persisted by the store commit that
    /// applies the matching balance change, never on its own.
    pub fn movement(account_id: AccountId, value: Decimal, at: DateTime<Utc>) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            account_id,
            value,
            transaction_date: at,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn transaction_date(&self) -> DateTime<Utc> {
        self.transaction_date
    }

    pub fn is_deposit(&self) -> bool {
        self.value > Decimal::ZERO
    }

    pub fn is_withdrawal(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Absolute value of the movement.
    pub fn magnitude(&self) -> Decimal {
        self.value.abs()
    }
}
