//! Error types for the ledger.
//!
//! Store implementations report [`StoreError`]s with typed [`Constraint`]s;
//! the single `From<StoreError> for LedgerError` impl below is the only place
//! where storage failures are turned into ledger-level conditions.

use crate::account::AccountId;
use crate::money::Money;
use crate::transaction::TransactionId;
use std::fmt;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors surfaced by the ledger to its callers.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Operation type code outside the four known kinds
    #[error("invalid operation type: {0}")]
    InvalidOperationType(i32),

    /// Transaction magnitude was zero or negative
    #[error("invalid amount {0}: must be greater than zero")]
    InvalidAmount(Money),

    #[error("document number is required")]
    InvalidDocumentNumber,

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("account with document number {0} already exists")]
    AccountAlreadyExists(String),

    /// Any other persistence failure, passed through untouched
    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing input file argument. Usage: ledger-settlement <commands.csv>")]
    MissingArgument,
}

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; the caller can fix it and try again.
    Validation,
    NotFound,
    Conflict,
    /// Persistence failure. Not retried by the ledger.
    Storage,
    Cancelled,
    Io,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidOperationType(_)
            | LedgerError::InvalidAmount(_)
            | LedgerError::InvalidDocumentNumber
            | LedgerError::Config(_)
            | LedgerError::MissingArgument => ErrorKind::Validation,
            LedgerError::AccountNotFound(_) => ErrorKind::NotFound,
            LedgerError::AccountAlreadyExists(_) => ErrorKind::Conflict,
            LedgerError::Storage(_) => ErrorKind::Storage,
            LedgerError::Cancelled | LedgerError::DeadlineExceeded => ErrorKind::Cancelled,
            LedgerError::Io(_) | LedgerError::Csv(_) => ErrorKind::Io,
        }
    }
}

/// Integrity constraints a store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `document_number` is unique across accounts.
    AccountDocument,
    /// Every transaction references an existing account.
    TransactionAccount,
    /// Every transaction references a known operation type.
    TransactionOperationType,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::AccountDocument => "accounts_document_number_key",
            Constraint::TransactionAccount => "transactions_account_id_fkey",
            Constraint::TransactionOperationType => "transactions_operation_type_id_fkey",
        };
        f.write_str(name)
    }
}

/// Errors reported by [`AccountStore`](crate::store::AccountStore) and
/// [`TransactionStore`](crate::store::TransactionStore) implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("foreign key violation on {constraint} (value {value})")]
    ForeignKeyViolation { constraint: Constraint, value: i64 },

    #[error("unique violation on {constraint} (value {value})")]
    UniqueViolation { constraint: Constraint, value: String },

    #[error("transaction {0} does not exist")]
    RowNotFound(TransactionId),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ForeignKeyViolation {
                constraint: Constraint::TransactionAccount,
                value,
            } => LedgerError::AccountNotFound(AccountId(value as u64)),
            StoreError::ForeignKeyViolation {
                constraint: Constraint::TransactionOperationType,
                value,
            } => LedgerError::InvalidOperationType(value as i32),
            StoreError::UniqueViolation {
                constraint: Constraint::AccountDocument,
                value,
            } => LedgerError::AccountAlreadyExists(value),
            StoreError::Cancelled => LedgerError::Cancelled,
            StoreError::DeadlineExceeded => LedgerError::DeadlineExceeded,
            other => LedgerError::Storage(other),
        }
    }
}
