use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use passbook_accounts::{Account, Transaction};
use passbook_core::AccountId;

use super::{LedgerStore, StoreError};

#[derive(Debug)]
struct AccountRecord {
    account: Account,
    entries: Vec<Transaction>,
}

/// In-memory account + journal store.
///
/// Intended for tests/dev and embedding. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    records: RwLock<HashMap<AccountId, AccountRecord>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

fn check_entry_target(entry: &Transaction, account_id: AccountId) -> Result<(), StoreError> {
    if entry.account_id() != account_id {
        return Err(StoreError::EntryAccountMismatch(format!(
            "entry {} targets account {}, write targets {}",
            entry.transaction_id(),
            entry.account_id(),
            account_id
        )));
    }
    Ok(())
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert_account(
        &self,
        account: Account,
        opening_entry: Option<Transaction>,
    ) -> Result<(), StoreError> {
        let account_id = account.account_id();
        if let Some(entry) = &opening_entry {
            check_entry_target(entry, account_id)?;
        }

        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(&account_id) {
            return Err(StoreError::AccountExists(account_id));
        }

        let entries = opening_entry.into_iter().collect();
        records.insert(account_id, AccountRecord { account, entries });
        Ok(())
    }

    fn fetch_account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&account_id).map(|r| r.account.clone()))
    }

    fn commit(
        &self,
        account: Account,
        expected_revision: u64,
        entry: Option<Transaction>,
    ) -> Result<(), StoreError> {
        let account_id = account.account_id();

        let mut records = self.records.write().map_err(|_| poisoned())?;
        let record = records
            .get_mut(&account_id)
            .ok_or(StoreError::AccountMissing(account_id))?;

        let found = record.account.revision();
        if found != expected_revision {
            return Err(StoreError::RevisionConflict {
                account_id,
                expected: expected_revision,
                found,
            });
        }

        // Validate everything before touching the record: commit is all or nothing.
        if let Some(entry) = &entry {
            check_entry_target(entry, account_id)?;
            if record
                .entries
                .iter()
                .any(|e| e.transaction_id() == entry.transaction_id())
            {
                return Err(StoreError::EntryExists(entry.transaction_id()));
            }
        }

        record.account = account;
        if let Some(entry) = entry {
            record.entries.push(entry);
        }
        Ok(())
    }

    fn entries_between(
        &self,
        account_id: AccountId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let Some(record) = records.get(&account_id) else {
            return Ok(vec![]);
        };

        Ok(record
            .entries
            .iter()
            .filter(|e| e.transaction_date() >= from && e.transaction_date() <= to)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use passbook_accounts::NewAccount;
    use passbook_core::PersonId;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap()
    }

    fn test_account(balance: i64) -> Account {
        let draft = NewAccount {
            balance: Decimal::from(balance),
            daily_withdrawal_limit: Decimal::from(1000),
            ..NewAccount::new(PersonId::new())
        };
        Account::open(AccountId::new(), draft, test_time()).unwrap()
    }

    #[test]
    fn insert_then_fetch_returns_the_snapshot() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(1000);
        store.insert_account(account.clone(), None).unwrap();

        let fetched = store.fetch_account(account.account_id()).unwrap();
        assert_eq!(fetched, Some(account));
    }

    #[test]
    fn fetch_unknown_account_returns_none() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(store.fetch_account(AccountId::new()).unwrap(), None);
    }

    #[test]
    fn insert_rejects_duplicate_account_id() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(0);
        store.insert_account(account.clone(), None).unwrap();

        let err = store.insert_account(account, None).unwrap_err();
        match err {
            StoreError::AccountExists(_) => {}
            _ => panic!("Expected AccountExists, got: {err:?}"),
        }
    }

    #[test]
    fn commit_rejects_stale_revision_and_changes_nothing() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(1000);
        let account_id = account.account_id();
        store.insert_account(account.clone(), None).unwrap();

        let mut updated = account.clone();
        updated.credit(Decimal::from(500)).unwrap();

        // Claim a revision that was never stored.
        let err = store.commit(updated, 7, None).unwrap_err();
        match err {
            StoreError::RevisionConflict {
                expected, found, ..
            } => {
                assert_eq!(expected, 7);
                assert_eq!(found, 1);
            }
            _ => panic!("Expected RevisionConflict, got: {err:?}"),
        }

        assert_eq!(store.fetch_account(account_id).unwrap(), Some(account));
    }

    #[test]
    fn commit_writes_snapshot_and_entry_together() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(1000);
        let account_id = account.account_id();
        store.insert_account(account.clone(), None).unwrap();

        let mut updated = account;
        updated.debit(Decimal::from(300)).unwrap();
        let entry = Transaction::movement(account_id, Decimal::from(-300), test_time());
        store.commit(updated.clone(), 1, Some(entry.clone())).unwrap();

        assert_eq!(store.fetch_account(account_id).unwrap(), Some(updated));
        let entries = store
            .entries_between(account_id, DateTime::UNIX_EPOCH, DateTime::<Utc>::MAX_UTC)
            .unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn commit_with_duplicate_entry_id_is_all_or_nothing() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(1000);
        let account_id = account.account_id();
        store.insert_account(account.clone(), None).unwrap();

        let mut first = account;
        first.debit(Decimal::from(100)).unwrap();
        let entry = Transaction::movement(account_id, Decimal::from(-100), test_time());
        store.commit(first.clone(), 1, Some(entry.clone())).unwrap();

        // Same entry id again: the snapshot write must not go through either.
        let mut second = first.clone();
        second.debit(Decimal::from(100)).unwrap();
        let err = store.commit(second, 2, Some(entry)).unwrap_err();
        match err {
            StoreError::EntryExists(_) => {}
            _ => panic!("Expected EntryExists, got: {err:?}"),
        }

        assert_eq!(store.fetch_account(account_id).unwrap(), Some(first));
        let entries = store
            .entries_between(account_id, DateTime::UNIX_EPOCH, DateTime::<Utc>::MAX_UTC)
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn commit_rejects_entry_for_another_account() {
        let store = InMemoryLedgerStore::new();
        let account = test_account(1000);
        let account_id = account.account_id();
        store.insert_account(account.clone(), None).unwrap();

        let mut updated = account.clone();
        updated.debit(Decimal::from(50)).unwrap();
        let foreign = Transaction::movement(AccountId::new(), Decimal::from(-50), test_time());

        let err = store.commit(updated, 1, Some(foreign)).unwrap_err();
        match err {
            StoreError::EntryAccountMismatch(_) => {}
            _ => panic!("Expected EntryAccountMismatch, got: {err:?}"),
        }

        // The rejected write changed neither the snapshot nor the journal.
        assert_eq!(store.fetch_account(account_id).unwrap(), Some(account));
        let entries = store
            .entries_between(account_id, DateTime::UNIX_EPOCH, DateTime::<Utc>::MAX_UTC)
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn entries_between_bounds_are_inclusive() {
        let store = InMemoryLedgerStore::new();
        let mut account = test_account(1000);
        let account_id = account.account_id();
        store.insert_account(account.clone(), None).unwrap();

        let t0 = test_time();
        let times = [t0, t0 + Duration::hours(1), t0 + Duration::hours(2)];
        for at in times {
            let revision = account.revision();
            account.credit(Decimal::from(10)).unwrap();
            let entry = Transaction::movement(account_id, Decimal::from(10), at);
            store.commit(account.clone(), revision, Some(entry)).unwrap();
        }

        let window = store.entries_between(account_id, times[0], times[1]).unwrap();
        assert_eq!(window.len(), 2);

        let single = store.entries_between(account_id, times[2], times[2]).unwrap();
        assert_eq!(single.len(), 1);

        let disjoint = store
            .entries_between(account_id, t0 - Duration::hours(3), t0 - Duration::hours(2))
            .unwrap();
        assert!(disjoint.is_empty());
    }
}
