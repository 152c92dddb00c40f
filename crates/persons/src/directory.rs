use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use passbook_core::PersonId;

use crate::person::Person;

/// Person directory operation error.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory backend failure: {0}")]
    Backend(String),
}

/// Identity lookup boundary used at account creation.
///
/// Account opening only needs to know whether the person exists; the real
/// identity system sits behind this trait. `register` exists so tests and
/// embeddings can seed the directory.
pub trait PersonDirectory: Send + Sync {
    fn find(&self, person_id: PersonId) -> Result<Option<Person>, DirectoryError>;
    fn register(&self, person: Person) -> Result<(), DirectoryError>;
}

impl<D> PersonDirectory for Arc<D>
where
    D: PersonDirectory + ?Sized,
{
    fn find(&self, person_id: PersonId) -> Result<Option<Person>, DirectoryError> {
        (**self).find(person_id)
    }

    fn register(&self, person: Person) -> Result<(), DirectoryError> {
        (**self).register(person)
    }
}

/// In-memory person directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPersonDirectory {
    people: RwLock<HashMap<PersonId, Person>>,
}

impl InMemoryPersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersonDirectory for InMemoryPersonDirectory {
    fn find(&self, person_id: PersonId) -> Result<Option<Person>, DirectoryError> {
        let people = self
            .people
            .read()
            .map_err(|_| DirectoryError::Backend("lock poisoned".to_string()))?;
        Ok(people.get(&person_id).cloned())
    }

    fn register(&self, person: Person) -> Result<(), DirectoryError> {
        let mut people = self
            .people
            .write()
            .map_err(|_| DirectoryError::Backend("lock poisoned".to_string()))?;
        people.insert(person.person_id(), person);
        Ok(())
    }
}
