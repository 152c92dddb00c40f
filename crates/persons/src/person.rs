use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use passbook_core::PersonId;

/// An account holder's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    person_id: PersonId,
    name: String,
    document: String,
    birth_date: NaiveDate,
}

impl Person {
    pub fn new(
        person_id: PersonId,
        name: impl Into<String>,
        document: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            person_id,
            name: name.into(),
            document: document.into(),
            birth_date,
        }
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }
}
