use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use passbook_core::{AccountId, LedgerError, LedgerResult, PersonId};

/// Account classification tag.
///
/// Stored and returned as-is; ledger logic never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Salary,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Checking
    }
}

/// Attributes of an account to be opened.
///
/// Defaults mirror the account-opening form: zero balance, zero daily
/// withdrawal ceiling, active, checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub person_id: PersonId,
    pub balance: Decimal,
    pub daily_withdrawal_limit: Decimal,
    pub active_flag: bool,
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            balance: Decimal::ZERO,
            daily_withdrawal_limit: Decimal::ZERO,
            active_flag: true,
            account_type: AccountType::default(),
        }
    }
}

/// A holder's monetary account.
///
/// The balance is only ever mutated through [`Account::credit`] and
/// [`Account::debit`]; the flag only through [`Account::activated`] and
/// [`Account::deactivated`]. Every mutation bumps `revision`, which backs the
/// store's optimistic concurrency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    account_id: AccountId,
    person_id: PersonId,
    balance: Decimal,
    daily_withdrawal_limit: Decimal,
    active_flag: bool,
    account_type: AccountType,
    create_date: DateTime<Utc>,
    revision: u64,
}

impl Account {
    /// Open a new account from a draft.
    ///
    /// Rejects a negative daily withdrawal limit. The opening balance is
    /// taken as-is; whether it is journaled is the engine's concern.
    pub fn open(account_id: AccountId, draft: NewAccount, at: DateTime<Utc>) -> LedgerResult<Self> {
        if draft.daily_withdrawal_limit < Decimal::ZERO {
            return Err(LedgerError::NegativeWithdrawalLimit(
                draft.daily_withdrawal_limit,
            ));
        }

        Ok(Self {
            account_id,
            person_id: draft.person_id,
            balance: draft.balance,
            daily_withdrawal_limit: draft.daily_withdrawal_limit,
            active_flag: draft.active_flag,
            account_type: draft.account_type,
            create_date: at,
            revision: 1,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn daily_withdrawal_limit(&self) -> Decimal {
        self.daily_withdrawal_limit
    }

    pub fn is_active(&self) -> bool {
        self.active_flag
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn create_date(&self) -> DateTime<Utc> {
        self.create_date
    }

    /// Monotonically increasing write counter (optimistic concurrency).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Invariant helper: money can only move on an active account.
    pub fn ensure_active(&self) -> LedgerResult<()> {
        if self.active_flag {
            Ok(())
        } else {
            Err(LedgerError::AccountInactive(self.account_id))
        }
    }

    /// Invariant helper: a withdrawal may take at most the full balance.
    pub fn ensure_can_cover(&self, amount: Decimal) -> LedgerResult<()> {
        if self.balance >= amount {
            Ok(())
        } else {
            Err(LedgerError::insufficient_funds(self.balance, amount))
        }
    }

    /// Apply a deposit. Callers validate first; this only evolves state.
    ///
    /// Fails when the new balance would leave `Decimal` range; a failed
    /// movement changes nothing.
    pub fn credit(&mut self, amount: Decimal) -> LedgerResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow(self.account_id))?;
        self.revision += 1;
        Ok(())
    }

    /// Apply a withdrawal. Callers validate first; this only evolves state.
    ///
    /// Same range contract as [`Account::credit`].
    pub fn debit(&mut self, amount: Decimal) -> LedgerResult<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow(self.account_id))?;
        self.revision += 1;
        Ok(())
    }

    pub fn activated(&mut self) {
        self.active_flag = true;
        self.revision += 1;
    }

    pub fn deactivated(&mut self) {
        self.active_flag = false;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_person_id() -> PersonId {
        PersonId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn test_account(balance: i64, limit: i64) -> Account {
        let draft = NewAccount {
            balance: Decimal::from(balance),
            daily_withdrawal_limit: Decimal::from(limit),
            ..NewAccount::new(test_person_id())
        };
        Account::open(AccountId::new(), draft, test_time()).unwrap()
    }

    #[test]
    fn open_applies_draft_defaults() {
        let person_id = test_person_id();
        let at = test_time();
        let account = Account::open(AccountId::new(), NewAccount::new(person_id), at).unwrap();

        assert_eq!(account.person_id(), person_id);
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.daily_withdrawal_limit(), Decimal::ZERO);
        assert!(account.is_active());
        assert_eq!(account.account_type(), AccountType::Checking);
        assert_eq!(account.create_date(), at);
        assert_eq!(account.revision(), 1);
    }

    #[test]
    fn open_rejects_negative_withdrawal_limit() {
        let draft = NewAccount {
            daily_withdrawal_limit: Decimal::from(-1),
            ..NewAccount::new(test_person_id())
        };
        let err = Account::open(AccountId::new(), draft, test_time()).unwrap_err();
        match err {
            LedgerError::NegativeWithdrawalLimit(_) => {}
            _ => panic!("Expected NegativeWithdrawalLimit, got: {err:?}"),
        }
    }

    #[test]
    fn credit_and_debit_move_balance_and_bump_revision() {
        let mut account = test_account(1000, 500);
        assert_eq!(account.revision(), 1);

        account.credit(Decimal::from(500)).unwrap();
        assert_eq!(account.balance(), Decimal::from(1500));
        assert_eq!(account.revision(), 2);

        account.debit(Decimal::from(300)).unwrap();
        assert_eq!(account.balance(), Decimal::from(1200));
        assert_eq!(account.revision(), 3);
    }

    #[test]
    fn movements_past_decimal_range_are_errors() {
        let mut account = test_account(0, 0);
        account.credit(Decimal::MAX).unwrap();

        let err = account.credit(Decimal::from(1)).unwrap_err();
        match err {
            LedgerError::ArithmeticOverflow(id) => assert_eq!(id, account.account_id()),
            _ => panic!("Expected ArithmeticOverflow, got: {err:?}"),
        }
        // The failed credit neither moved the balance nor bumped the revision.
        assert_eq!(account.balance(), Decimal::MAX);
        assert_eq!(account.revision(), 2);

        // The low end of the range is guarded the same way.
        let draft = NewAccount {
            balance: Decimal::MIN,
            ..NewAccount::new(test_person_id())
        };
        let mut drained = Account::open(AccountId::new(), draft, test_time()).unwrap();
        let err = drained.debit(Decimal::from(1)).unwrap_err();
        match err {
            LedgerError::ArithmeticOverflow(_) => {}
            _ => panic!("Expected ArithmeticOverflow, got: {err:?}"),
        }
        assert_eq!(drained.balance(), Decimal::MIN);
    }

    #[test]
    fn flag_mutators_flip_and_bump_revision() {
        let mut account = test_account(0, 0);
        assert!(account.is_active());

        account.deactivated();
        assert!(!account.is_active());
        assert_eq!(account.revision(), 2);

        account.activated();
        assert!(account.is_active());
        assert_eq!(account.revision(), 3);
    }

    #[test]
    fn ensure_active_rejects_deactivated_account() {
        let mut account = test_account(100, 100);
        account.deactivated();

        let err = account.ensure_active().unwrap_err();
        match err {
            LedgerError::AccountInactive(id) => assert_eq!(id, account.account_id()),
            _ => panic!("Expected AccountInactive, got: {err:?}"),
        }
    }

    #[test]
    fn ensure_can_cover_allows_exactly_the_full_balance() {
        let account = test_account(500, 1000);
        assert!(account.ensure_can_cover(Decimal::from(500)).is_ok());

        let err = account
            .ensure_can_cover(Decimal::new(50001, 2))
            .unwrap_err();
        match err {
            LedgerError::InsufficientFunds { balance, requested } => {
                assert_eq!(balance, Decimal::from(500));
                assert_eq!(requested, Decimal::new(50001, 2));
            }
            _ => panic!("Expected InsufficientFunds, got: {err:?}"),
        }
    }

    #[test]
    fn persisted_shape_uses_camel_case() {
        let account = test_account(1000, 500);
        let value = serde_json::to_value(&account).unwrap();

        assert_eq!(value["accountId"], serde_json::json!(account.account_id().to_string()));
        assert_eq!(value["balance"], serde_json::json!("1000"));
        assert_eq!(value["dailyWithdrawalLimit"], serde_json::json!("500"));
        assert_eq!(value["activeFlag"], serde_json::json!(true));
        assert_eq!(value["accountType"], serde_json::json!("checking"));
        assert!(value["createDate"].is_string());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: balance always equals the opening balance plus the sum of
        /// applied movements, and revision counts every mutation exactly once.
        #[test]
        fn balance_tracks_applied_movements(
            opening in 0i64..1_000_000i64,
            movements in prop::collection::vec((any::<bool>(), 1i64..1_000_000i64), 1..16)
        ) {
            let mut account = test_account(opening, 0);
            let mut expected = Decimal::from(opening);

            for (is_credit, amount) in &movements {
                let amount = Decimal::from(*amount);
                if *is_credit {
                    account.credit(amount).unwrap();
                    expected += amount;
                } else {
                    account.debit(amount).unwrap();
                    expected -= amount;
                }
            }

            prop_assert_eq!(account.balance(), expected);
            prop_assert_eq!(account.revision(), 1 + movements.len() as u64);
        }
    }
}
