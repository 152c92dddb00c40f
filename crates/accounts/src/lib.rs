//! Accounts domain module (balances, withdrawal policy, journal entries).
//!
//! Pure domain types only: no IO, no storage concerns. The ledger engine
//! drives every mutation; nothing here touches a clock or a store.

pub mod account;
pub mod transaction;

pub use account::{Account, AccountType, NewAccount};
pub use transaction::Transaction;
