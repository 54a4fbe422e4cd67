//! # Ledger Settlement
//!
//! An account ledger that records purchases, installment purchases,
//! withdrawals and payments, and settles each payment against the account's
//! unpaid debits, oldest debt first.
//!
//! ## Design Principles
//!
//! - **Fixed-point money**: 2 decimal places via `rust_decimal`
//! - **Signed amounts**: debits are stored negative, payments positive
//! - **FIFO settlement**: payments pay down debits in `event_date` order
//! - **Per-account serialization**: settlement runs for one account never interleave
//! - **Typed store errors**: integrity violations are translated in one place
//!
//! ## Example
//!
//! ```
//! use ledger_settlement::{AccountService, Cancellation, MemoryStore, Money, SettlementEngine};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let accounts = AccountService::new(Arc::clone(&store));
//! let engine = SettlementEngine::new(store);
//! let cancel = Cancellation::new();
//!
//! let account = accounts.create(&cancel, "12345678900").unwrap();
//! engine.execute(&cancel, account.id, 1, Money::from_units(30)).unwrap();
//! let payment = engine.execute(&cancel, account.id, 4, Money::from_units(50)).unwrap();
//! assert_eq!(payment.balance, Money::from_units(20));
//! ```

pub mod account;
pub mod accounts;
pub mod batch;
pub mod cancel;
pub mod config;
pub mod error;
pub mod locks;
pub mod memory;
pub mod money;
pub mod settlement;
pub mod store;
pub mod transaction;

pub use account::{Account, AccountId, NewAccount};
pub use accounts::AccountService;
pub use batch::{Command, CommandRecord, LedgerProcessor};
pub use cancel::Cancellation;
pub use config::Config;
pub use error::{Constraint, ErrorKind, LedgerError, Result, StoreError};
pub use locks::AccountLocks;
pub use memory::MemoryStore;
pub use money::{Money, ParseMoneyError};
pub use settlement::SettlementEngine;
pub use store::{AccountStore, TransactionStore};
pub use transaction::{NewTransaction, OperationType, Transaction, TransactionId};
