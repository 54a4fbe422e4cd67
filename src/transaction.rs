//! Transaction model and the transaction factory.

use crate::account::AccountId;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four operation kinds, keyed by their wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OperationType {
    Purchase = 1,
    InstallmentPurchase = 2,
    Withdrawal = 3,
    Payment = 4,
}

impl OperationType {
    /// Purchases and withdrawals are debits: money owed by the account holder.
    pub fn is_debit(self) -> bool {
        matches!(
            self,
            OperationType::Purchase | OperationType::InstallmentPurchase | OperationType::Withdrawal
        )
    }

    /// Payment is the only credit kind.
    pub fn is_credit(self) -> bool {
        !self.is_debit()
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for OperationType {
    type Error = LedgerError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            1 => Ok(OperationType::Purchase),
            2 => Ok(OperationType::InstallmentPurchase),
            3 => Ok(OperationType::Withdrawal),
            4 => Ok(OperationType::Payment),
            other => Err(LedgerError::InvalidOperationType(other)),
        }
    }
}

impl From<OperationType> for i32 {
    fn from(op: OperationType) -> Self {
        op.code()
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationType::Purchase => "purchase",
            OperationType::InstallmentPurchase => "installment purchase",
            OperationType::Withdrawal => "withdrawal",
            OperationType::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// A persisted transaction row.
///
/// # Invariants
///
/// - Debit rows: `balance <= 0`, and its magnitude only shrinks over time.
/// - Credit rows: `balance >= 0`, fixed once the creating call returns.
/// - Only `balance` ever changes after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub operation_type: OperationType,

    /// Signed amount: negative for debits, positive for payments.
    pub amount: Money,

    /// Settlement ordering key.
    pub event_date: DateTime<Utc>,

    /// Outstanding debt (debits) or unallocated credit (payments).
    pub balance: Money,
}

impl Transaction {
    /// True for a debit that still carries unpaid debt.
    pub fn has_outstanding_debt(&self) -> bool {
        self.operation_type.is_debit() && self.balance.is_negative()
    }
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub operation_type: OperationType,
    pub amount: Money,
    pub event_date: DateTime<Utc>,
    pub balance: Money,
}

impl NewTransaction {
    /// Builds a transaction from a positive magnitude.
    ///
    /// Debits store the negated magnitude. The event date is the current
    /// wall-clock time. The balance starts equal to the signed amount;
    /// use [`with_balance`](Self::with_balance) to set the settled value.
    pub fn new(
        account_id: AccountId,
        operation_type: OperationType,
        magnitude: Money,
    ) -> Result<Self> {
        if !magnitude.is_positive() {
            return Err(LedgerError::InvalidAmount(magnitude));
        }

        let amount = if operation_type.is_debit() {
            -magnitude
        } else {
            magnitude
        };

        Ok(NewTransaction {
            account_id,
            operation_type,
            amount,
            event_date: Utc::now(),
            balance: amount,
        })
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Attaches the store-assigned id.
    pub fn into_stored(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            operation_type: self.operation_type,
            amount: self.amount,
            event_date: self.event_date,
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: AccountId = AccountId(1);

    #[test]
    fn test_known_codes_parse() {
        assert_eq!(OperationType::try_from(1).unwrap(), OperationType::Purchase);
        assert_eq!(
            OperationType::try_from(2).unwrap(),
            OperationType::InstallmentPurchase
        );
        assert_eq!(OperationType::try_from(3).unwrap(), OperationType::Withdrawal);
        assert_eq!(OperationType::try_from(4).unwrap(), OperationType::Payment);
    }

    #[test]
    fn test_unknown_codes_rejected() {
        for code in [0, 5, 100, -1] {
            assert!(matches!(
                OperationType::try_from(code),
                Err(LedgerError::InvalidOperationType(c)) if c == code
            ));
        }
    }

    #[test]
    fn test_debit_and_credit_kinds() {
        assert!(OperationType::Purchase.is_debit());
        assert!(OperationType::InstallmentPurchase.is_debit());
        assert!(OperationType::Withdrawal.is_debit());
        assert!(!OperationType::Payment.is_debit());
        assert!(OperationType::Payment.is_credit());
    }

    #[test]
    fn test_debits_are_negated() {
        for op in [
            OperationType::Purchase,
            OperationType::InstallmentPurchase,
            OperationType::Withdrawal,
        ] {
            let tx = NewTransaction::new(ACCOUNT, op, Money::from_units(50)).unwrap();
            assert_eq!(tx.amount, Money::from_units(-50));
            assert_eq!(tx.balance, Money::from_units(-50));
            assert_eq!(tx.account_id, ACCOUNT);
            assert_eq!(tx.operation_type, op);
        }
    }

    #[test]
    fn test_payment_keeps_sign() {
        let magnitude: Money = "123.45".parse().unwrap();
        let tx = NewTransaction::new(ACCOUNT, OperationType::Payment, magnitude).unwrap();
        assert_eq!(tx.amount, magnitude);
        assert_eq!(tx.balance, magnitude);
    }

    #[test]
    fn test_non_positive_magnitude_rejected() {
        for op in [OperationType::Purchase, OperationType::Payment] {
            assert!(matches!(
                NewTransaction::new(ACCOUNT, op, Money::ZERO),
                Err(LedgerError::InvalidAmount(_))
            ));
            assert!(matches!(
                NewTransaction::new(ACCOUNT, op, Money::from_units(-50)),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_event_date_is_stamped_now() {
        let before = Utc::now();
        let tx =
            NewTransaction::new(ACCOUNT, OperationType::Purchase, Money::from_units(1)).unwrap();
        let after = Utc::now();
        assert!(tx.event_date >= before && tx.event_date <= after);
    }

    #[test]
    fn test_with_balance_and_into_stored() {
        let tx = NewTransaction::new(ACCOUNT, OperationType::Payment, Money::from_units(50))
            .unwrap()
            .with_balance(Money::from_units(20));
        let stored = tx.clone().into_stored(TransactionId(7));

        assert_eq!(stored.id, TransactionId(7));
        assert_eq!(stored.amount, Money::from_units(50));
        assert_eq!(stored.balance, Money::from_units(20));
        assert_eq!(stored.event_date, tx.event_date);
        assert!(!stored.has_outstanding_debt());
    }

    #[test]
    fn test_outstanding_debt_only_for_unpaid_debits() {
        let debit = NewTransaction::new(ACCOUNT, OperationType::Withdrawal, Money::from_units(30))
            .unwrap()
            .into_stored(TransactionId(1));
        assert!(debit.has_outstanding_debt());

        let settled = Transaction {
            balance: Money::ZERO,
            ..debit
        };
        assert!(!settled.has_outstanding_debt());
    }
}
