//! CSV command replay.
//!
//! Reads ledger commands row by row, applies them through the account
//! service and the settlement engine, and writes every stored transaction
//! back out as CSV. Rows that cannot be parsed or that the ledger rejects are
//! logged and skipped.
//!
//! Input columns: `command,account,document,operation,amount`
//!
//! ```text
//! command,account,document,operation,amount
//! open,,12345678900,,
//! transaction,1,,1,50.00
//! transaction,1,,4,60.00
//! ```

use crate::account::AccountId;
use crate::accounts::AccountService;
use crate::cancel::Cancellation;
use crate::config::Config;
use crate::error::Result;
use crate::memory::MemoryStore;
use crate::money::Money;
use crate::settlement::SettlementEngine;
use crate::store::{AccountStore, TransactionStore};
use crate::transaction::TransactionId;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::Arc;

/// Raw command row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// `open` or `transaction`
    pub command: String,

    pub account: Option<u64>,

    /// Document number, for `open` rows
    pub document: Option<String>,

    /// Operation type code, for `transaction` rows
    pub operation: Option<i32>,

    /// Positive magnitude, for `transaction` rows
    pub amount: Option<String>,
}

/// A parsed ledger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open {
        document: String,
    },
    Transaction {
        account_id: AccountId,
        operation_code: i32,
        magnitude: Money,
    },
}

impl CommandRecord {
    /// Returns `None` for an unknown command or missing transaction fields.
    ///
    /// Field values are not validated here; an empty document or a bad
    /// operation code is left for the ledger to reject.
    pub fn parse(&self) -> Option<Command> {
        match self.command.trim().to_lowercase().as_str() {
            "open" => Some(Command::Open {
                document: self.document.clone().unwrap_or_default(),
            }),
            "transaction" => Some(Command::Transaction {
                account_id: AccountId(self.account?),
                operation_code: self.operation?,
                magnitude: self.parse_amount()?,
            }),
            _ => None,
        }
    }

    fn parse_amount(&self) -> Option<Money> {
        let raw = self.amount.as_ref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Money::from_str(raw).ok()
    }
}

/// One output row per stored transaction.
#[derive(Debug, Serialize)]
struct TransactionRow {
    transaction: TransactionId,
    account: AccountId,
    operation: i32,
    amount: Money,
    balance: Money,
}

/// Replays CSV commands against a ledger store.
pub struct LedgerProcessor<S> {
    accounts: AccountService<S>,
    engine: SettlementEngine<S>,
    config: Config,
}

impl LedgerProcessor<MemoryStore> {
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}

impl<S: AccountStore + TransactionStore> LedgerProcessor<S> {
    pub fn new(store: Arc<S>, config: Config) -> Self {
        LedgerProcessor {
            accounts: AccountService::new(Arc::clone(&store)),
            engine: SettlementEngine::new(store),
            config,
        }
    }

    pub fn accounts(&self) -> &AccountService<S> {
        &self.accounts
    }

    pub fn engine(&self) -> &SettlementEngine<S> {
        &self.engine
    }

    /// Processes commands from a CSV reader in streaming fashion.
    ///
    /// Only I/O failures of the reader itself abort processing.
    pub fn process_csv<R: Read>(&self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, after the header row

            match result {
                Ok(record) => match record.parse() {
                    Some(command) => {
                        if let Err(e) = self.apply(command, row_num) {
                            warn!("Row {}: {}", row_num, e);
                        }
                    }
                    None => warn!("Row {}: Failed to parse command record", row_num),
                },
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    /// Applies one command with a fresh cancellation signal.
    pub fn apply(&self, command: Command, row: usize) -> Result<()> {
        let cancel = self.config.command_signal();

        match command {
            Command::Open { document } => {
                let account = self.accounts.create(&cancel, &document)?;
                debug!("Row {}: Opened account {}", row, account.id);
            }
            Command::Transaction {
                account_id,
                operation_code,
                magnitude,
            } => {
                let tx = self
                    .engine
                    .execute(&cancel, account_id, operation_code, magnitude)?;
                debug!(
                    "Row {}: Stored transaction {} for account {}",
                    row, tx.id, account_id
                );
            }
        }

        Ok(())
    }

    /// Writes every stored transaction as CSV, in id order.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        csv_writer.write_record(["transaction", "account", "operation", "amount", "balance"])?;

        let transactions = self.engine.store().list_all(&Cancellation::new())?;
        for tx in transactions {
            csv_writer.serialize(TransactionRow {
                transaction: tx.id,
                account: tx.account_id,
                operation: tx.operation_type.code(),
                amount: tx.amount,
                balance: tx.balance,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn process_csv_str(csv: &str) -> LedgerProcessor<MemoryStore> {
        let processor = LedgerProcessor::in_memory(Config::default());
        processor.process_csv(Cursor::new(csv)).unwrap();
        processor
    }

    fn output_of(processor: &LedgerProcessor<MemoryStore>) -> String {
        let mut output = Vec::new();
        processor.write_output(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_open() {
        let record = CommandRecord {
            command: "open".to_string(),
            account: None,
            document: Some("12345678900".to_string()),
            operation: None,
            amount: None,
        };

        assert_eq!(
            record.parse(),
            Some(Command::Open {
                document: "12345678900".to_string()
            })
        );
    }

    #[test]
    fn test_parse_transaction() {
        let record = CommandRecord {
            command: " Transaction ".to_string(),
            account: Some(1),
            document: None,
            operation: Some(4),
            amount: Some(" 10.5 ".to_string()),
        };

        assert_eq!(
            record.parse(),
            Some(Command::Transaction {
                account_id: AccountId(1),
                operation_code: 4,
                magnitude: Money::from_str("10.50").unwrap(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_incomplete_transaction() {
        let record = CommandRecord {
            command: "transaction".to_string(),
            account: Some(1),
            document: None,
            operation: Some(1),
            amount: None,
        };
        assert!(record.parse().is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let record = CommandRecord {
            command: "refund".to_string(),
            account: Some(1),
            document: None,
            operation: Some(1),
            amount: Some("1".to_string()),
        };
        assert!(record.parse().is_none());
    }

    #[test]
    fn test_settles_payments() {
        let csv = r#"command,account,document,operation,amount
open,,12345678900,,
transaction,1,,1,50.0
transaction,1,,4,60.0"#;

        let output = output_of(&process_csv_str(csv));

        assert!(output.starts_with("transaction,account,operation,amount,balance"));
        assert!(output.contains("1,1,1,-50.00,0.00"));
        assert!(output.contains("2,1,4,60.00,10.00"));
    }

    #[test]
    fn test_rejected_rows_are_skipped() {
        let csv = r#"command,account,document,operation,amount
open,,111,,
open,,111,,
transaction,1,,9,10.0
transaction,1,,1,-3
transaction,2,,1,10.0
transaction,1,,1,oops
bogus,1,,1,10.0
transaction,1,,2,20.0"#;

        let processor = process_csv_str(csv);
        let output = output_of(&processor);

        let rows: Vec<&str> = output.lines().skip(1).collect();
        assert_eq!(rows, vec!["1,1,2,-20.00,-20.00"]);
    }

    #[test]
    fn test_empty_ledger_still_writes_header() {
        let output = output_of(&process_csv_str("command,account,document,operation,amount\n"));
        assert_eq!(output.trim(), "transaction,account,operation,amount,balance");
    }
}
