//! `passbook-core` — ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the ledger error taxonomy, and the clock seam.

pub mod error;
pub mod id;
pub mod time;

pub use error::{LedgerError, LedgerResult};
pub use id::{AccountId, PersonId, TransactionId};
pub use time::{Clock, FixedClock, SystemClock, day_start};
