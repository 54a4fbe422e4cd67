//! Account creation and lookup.

use crate::account::{Account, AccountId, NewAccount};
use crate::cancel::Cancellation;
use crate::error::{LedgerError, Result};
use crate::store::AccountStore;
use log::info;
use std::sync::Arc;

pub struct AccountService<S> {
    store: Arc<S>,
}

impl<S: AccountStore> AccountService<S> {
    pub fn new(store: Arc<S>) -> Self {
        AccountService { store }
    }

    /// Opens an account. A document number already in use fails with
    /// [`LedgerError::AccountAlreadyExists`].
    pub fn create(&self, cancel: &Cancellation, document_number: &str) -> Result<Account> {
        let account = NewAccount::new(document_number)?;
        let stored = self.store.create_account(cancel, account)?;
        info!("Opened account {}", stored.id);
        Ok(stored)
    }

    pub fn get(&self, cancel: &Cancellation, account_id: AccountId) -> Result<Account> {
        self.store
            .find_account(cancel, account_id)?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }
}
