//! Storage interfaces consumed by the ledger.
//!
//! Implementations enforce the integrity rules themselves: a duplicate
//! document number is a [`Constraint::AccountDocument`] unique violation and
//! a transaction for an unknown account is a
//! [`Constraint::TransactionAccount`] foreign-key violation. The ledger never
//! pre-checks either condition.
//!
//! [`Constraint::AccountDocument`]: crate::error::Constraint::AccountDocument
//! [`Constraint::TransactionAccount`]: crate::error::Constraint::TransactionAccount

use crate::account::{Account, AccountId, NewAccount};
use crate::cancel::Cancellation;
use crate::error::StoreError;
use crate::money::Money;
use crate::transaction::{NewTransaction, Transaction, TransactionId};

pub trait AccountStore {
    fn create_account(&self, cancel: &Cancellation, account: NewAccount)
        -> Result<Account, StoreError>;

    fn find_account(
        &self,
        cancel: &Cancellation,
        account_id: AccountId,
    ) -> Result<Option<Account>, StoreError>;
}

pub trait TransactionStore {
    /// Inserts a row and returns it with its assigned id.
    fn insert_transaction(
        &self,
        cancel: &Cancellation,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError>;

    /// All rows of an account, oldest `event_date` first. Ties keep
    /// insertion order. An unknown account has no rows.
    fn list_by_account(
        &self,
        cancel: &Cancellation,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Overwrites the `balance` of one row and nothing else.
    fn update_balance(
        &self,
        cancel: &Cancellation,
        transaction_id: TransactionId,
        balance: Money,
    ) -> Result<(), StoreError>;

    /// Every row in id order.
    fn list_all(&self, cancel: &Cancellation) -> Result<Vec<Transaction>, StoreError>;
}
