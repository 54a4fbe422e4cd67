//! Account model.
//!
//! Accounts are created once and never updated or deleted by the ledger.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// External identifier (e.g. national ID). Unique across accounts.
    pub document_number: String,
}

/// A validated account that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub document_number: String,
}

impl NewAccount {
    /// Validates the document number. Surrounding whitespace is dropped and
    /// an empty result is rejected.
    pub fn new(document_number: &str) -> Result<Self> {
        let document_number = document_number.trim();
        if document_number.is_empty() {
            return Err(LedgerError::InvalidDocumentNumber);
        }

        Ok(NewAccount {
            document_number: document_number.to_string(),
        })
    }
}
