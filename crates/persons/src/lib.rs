//! Persons module (account-holder identities).
//!
//! Holds the identity record plus the lookup boundary the ledger consults
//! when opening accounts. Person management beyond that lives elsewhere.

pub mod directory;
pub mod person;

pub use directory::{DirectoryError, InMemoryPersonDirectory, PersonDirectory};
pub use person::Person;
