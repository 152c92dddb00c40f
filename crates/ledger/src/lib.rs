//! Account ledger engine: orchestration, storage boundary, journal queries.
//!
//! The domain rules live in `passbook-accounts`; this crate wires them to a
//! pluggable [`LedgerStore`] and drives every operation through a
//! load → validate → revision-checked-commit pipeline.

pub mod config;
pub mod engine;
pub mod journal;
pub mod observe;
pub mod store;


pub use config::EngineConfig;
pub use engine::LedgerEngine;
pub use journal::TransactionJournal;
pub use observe::{LedgerObserver, TracingObserver};
pub use store::{InMemoryLedgerStore, LedgerStore, StoreError};
