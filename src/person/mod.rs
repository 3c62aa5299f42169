//! Person records
//!
//! A person is the only entity persondb manages: an immutable integer id
//! assigned by the store and a free-form name restricted to letters and
//! spaces.

mod validation;

pub use validation::is_valid_name;

use serde::{Deserialize, Serialize};

/// Identifier of a person record
pub type PersonId = i64;

/// A person record as held in memory, written to the log and returned over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    /// Create a new person record
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
