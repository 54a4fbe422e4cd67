//! Ledger settlement engine.
//!
//! Records new transactions and, for payments, settles the incoming credit
//! against the account's unpaid debits in the order they were incurred.
//!
//! # Settlement
//!
//! For a payment of `m`:
//!
//! 1. `remaining = m`.
//! 2. Walk the account's rows oldest `event_date` first, skipping anything
//!    that is not a debit with a negative balance.
//! 3. If `remaining` covers the debt, the debit's balance becomes zero and
//!    `remaining` shrinks by the debt. Otherwise the debit absorbs all of
//!    `remaining` and the walk stops.
//! 4. Each changed debit balance is written immediately with a single
//!    balance update; the payment row is then inserted with
//!    `balance = remaining`.
//!
//! Leftover payment credit stays on the payment row. Nothing reads it back:
//! it does not offset later debits.
//!
//! # Consistency
//!
//! Calls for the same account run one at a time (see [`AccountLocks`]). The
//! balance updates of one run are not wrapped in a store transaction, so a
//! failure or cancellation part-way leaves earlier updates applied and the
//! payment row unwritten.

use crate::account::AccountId;
use crate::cancel::Cancellation;
use crate::error::Result;
use crate::locks::AccountLocks;
use crate::money::Money;
use crate::store::TransactionStore;
use crate::transaction::{NewTransaction, OperationType, Transaction};
use log::{debug, info};
use std::sync::Arc;

/// Creates transactions and settles payments against outstanding debits.
///
/// Shareable across threads behind an `Arc` when the store is `Sync`.
pub struct SettlementEngine<S> {
    store: Arc<S>,
    locks: AccountLocks,
}

impl<S: TransactionStore> SettlementEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        SettlementEngine {
            store,
            locks: AccountLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Records a transaction of `magnitude` with the given operation code.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidOperationType`] / [`LedgerError::InvalidAmount`]
    ///   before any storage access.
    /// - [`LedgerError::AccountNotFound`] when the store rejects the insert.
    /// - [`LedgerError::Cancelled`] / [`LedgerError::DeadlineExceeded`] when
    ///   `cancel` fires; no further balance updates are attempted.
    /// - [`LedgerError::Storage`] for any other store failure.
    ///
    /// [`LedgerError::InvalidOperationType`]: crate::LedgerError::InvalidOperationType
    /// [`LedgerError::InvalidAmount`]: crate::LedgerError::InvalidAmount
    /// [`LedgerError::AccountNotFound`]: crate::LedgerError::AccountNotFound
    /// [`LedgerError::Cancelled`]: crate::LedgerError::Cancelled
    /// [`LedgerError::DeadlineExceeded`]: crate::LedgerError::DeadlineExceeded
    /// [`LedgerError::Storage`]: crate::LedgerError::Storage
    pub fn execute(
        &self,
        cancel: &Cancellation,
        account_id: AccountId,
        operation_code: i32,
        magnitude: Money,
    ) -> Result<Transaction> {
        let operation_type = OperationType::try_from(operation_code)?;

        self.locks.with_account(account_id, || -> Result<Transaction> {
            // Stamped under the lock so event dates follow insertion order.
            let draft = NewTransaction::new(account_id, operation_type, magnitude)?;
            cancel.check()?;

            let draft = if operation_type.is_debit() {
                draft
            } else {
                let remaining = self.settle(cancel, account_id, magnitude)?;
                draft.with_balance(remaining)
            };

            let stored = self.store.insert_transaction(cancel, draft)?;
            info!(
                "Account {}: recorded {} {} as transaction {} (amount {}, balance {})",
                account_id,
                stored.operation_type,
                magnitude,
                stored.id,
                stored.amount,
                stored.balance
            );
            Ok(stored)
        })
    }

    /// Applies `credit` to the account's unpaid debits, oldest first, and
    /// returns the credit left over.
    fn settle(&self, cancel: &Cancellation, account_id: AccountId, credit: Money) -> Result<Money> {
        let mut remaining = credit;
        let prior = self.store.list_by_account(cancel, account_id)?;

        for debit in prior.iter().filter(|t| t.has_outstanding_debt()) {
            if !remaining.is_positive() {
                break;
            }
            cancel.check()?;

            let new_balance = if remaining >= debit.balance.abs() {
                remaining += debit.balance;
                Money::ZERO
            } else {
                let partial = debit.balance + remaining;
                remaining = Money::ZERO;
                partial
            };

            self.store.update_balance(cancel, debit.id, new_balance)?;
            debug!(
                "Account {}: transaction {} balance {} -> {}, credit left {}",
                account_id, debit.id, debit.balance, new_balance, remaining
            );
        }

        Ok(remaining)
    }
}
