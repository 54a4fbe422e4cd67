//! In-process store backed by `RwLock`-guarded tables.

use crate::account::{Account, AccountId, NewAccount};
use crate::cancel::Cancellation;
use crate::error::{Constraint, StoreError};
use crate::money::Money;
use crate::store::{AccountStore, TransactionStore};
use crate::transaction::{NewTransaction, Transaction, TransactionId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    documents: HashMap<String, AccountId>,
    transactions: BTreeMap<TransactionId, Transaction>,
    by_account: HashMap<AccountId, Vec<TransactionId>>,
    next_account_id: u64,
    next_transaction_id: u64,
}

/// Ids are sequential from 1 in each table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

impl AccountStore for MemoryStore {
    fn create_account(
        &self,
        cancel: &Cancellation,
        account: NewAccount,
    ) -> Result<Account, StoreError> {
        cancel.check()?;
        let mut tables = self.write()?;

        if tables.documents.contains_key(&account.document_number) {
            return Err(StoreError::UniqueViolation {
                constraint: Constraint::AccountDocument,
                value: account.document_number,
            });
        }

        tables.next_account_id += 1;
        let id = AccountId(tables.next_account_id);
        let stored = Account {
            id,
            document_number: account.document_number,
        };
        tables.documents.insert(stored.document_number.clone(), id);
        tables.accounts.insert(id, stored.clone());

        Ok(stored)
    }

    fn find_account(
        &self,
        cancel: &Cancellation,
        account_id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        cancel.check()?;
        Ok(self.read()?.accounts.get(&account_id).cloned())
    }
}

impl TransactionStore for MemoryStore {
    fn insert_transaction(
        &self,
        cancel: &Cancellation,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        cancel.check()?;
        let mut tables = self.write()?;

        if !tables.accounts.contains_key(&transaction.account_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: Constraint::TransactionAccount,
                value: transaction.account_id.0 as i64,
            });
        }

        tables.next_transaction_id += 1;
        let stored = transaction.into_stored(TransactionId(tables.next_transaction_id));
        tables
            .by_account
            .entry(stored.account_id)
            .or_default()
            .push(stored.id);
        tables.transactions.insert(stored.id, stored.clone());

        Ok(stored)
    }

    fn list_by_account(
        &self,
        cancel: &Cancellation,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, StoreError> {
        cancel.check()?;
        let tables = self.read()?;

        let mut rows: Vec<Transaction> = tables
            .by_account
            .get(&account_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.transactions.get(id).cloned())
            .collect();
        rows.sort_by_key(|t| (t.event_date, t.id));

        Ok(rows)
    }

    fn update_balance(
        &self,
        cancel: &Cancellation,
        transaction_id: TransactionId,
        balance: Money,
    ) -> Result<(), StoreError> {
        cancel.check()?;
        let mut tables = self.write()?;

        let row = tables
            .transactions
            .get_mut(&transaction_id)
            .ok_or(StoreError::RowNotFound(transaction_id))?;
        row.balance = balance;

        Ok(())
    }

    fn list_all(&self, cancel: &Cancellation) -> Result<Vec<Transaction>, StoreError> {
        cancel.check()?;
        Ok(self.read()?.transactions.values().cloned().collect())
    }
}
