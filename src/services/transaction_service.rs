//! Validation and edit helpers for ledger transactions.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::services::installment_service::MAX_INSTALLMENTS;
use crate::domain::{Account, Money, Transaction, TransactionKind, TransactionStatus};
use crate::errors::LedgerError;

use super::ServiceResult;

/// Fields that may change after creation. The owning account is not among
/// them; a transaction never moves between accounts.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<Uuid>>,
    /// `Some(None)` clears the responsible party.
    pub responsible_id: Option<Option<Uuid>>,
    pub description: Option<Option<String>>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
}

/// Provides validated helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates a transaction. `account` is the owning account when the
    /// caller has it; an unknown account skips the account-kind checks.
    pub fn validate(transaction: &Transaction, account: Option<&Account>) -> ServiceResult<()> {
        if !transaction.amount.is_positive() {
            return Err(LedgerError::validation(
                "amount",
                "must be greater than zero",
            ));
        }
        if let Some(total) = transaction.installment_total {
            if !(1..=MAX_INSTALLMENTS).contains(&total) {
                return Err(LedgerError::validation(
                    "installmentTotal",
                    format!("must be between 1 and {MAX_INSTALLMENTS}"),
                ));
            }
            if let Some(num) = transaction.installment_num {
                if !(1..=total).contains(&num) {
                    return Err(LedgerError::validation(
                        "installmentNum",
                        format!("{num} is outside 1..={total}"),
                    ));
                }
            }
        } else if transaction.installment_num.is_some() {
            return Err(LedgerError::validation(
                "installmentNum",
                "set without an installment total",
            ));
        }
        if let Some(account) = account {
            if account.id != transaction.account_id() {
                return Err(LedgerError::validation(
                    "accountId",
                    "transaction does not belong to the supplied account",
                ));
            }
            if !account.is_credit_line() {
                if transaction.is_installment() {
                    return Err(LedgerError::invariant(format!(
                        "installments require a credit line, `{}` is {}",
                        account.name,
                        account.kind.label()
                    )));
                }
                if transaction.statement_id.is_some() {
                    return Err(LedgerError::invariant(format!(
                        "statement link on non-credit account `{}`",
                        account.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Applies `changes` to a copy of `transaction` and validates the result.
    pub fn apply_edit(
        transaction: &Transaction,
        changes: TransactionChanges,
        account: Option<&Account>,
    ) -> ServiceResult<Transaction> {
        let mut updated = transaction.clone();
        if let Some(category_id) = changes.category_id {
            updated.category_id = category_id;
        }
        if let Some(responsible_id) = changes.responsible_id {
            updated.responsible_id = responsible_id;
        }
        if let Some(description) = changes.description {
            updated.description = description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty());
        }
        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }
        if let Some(date) = changes.date {
            updated.date = date;
        }
        if let Some(payment_date) = changes.payment_date {
            updated.payment_date = Some(payment_date);
        }
        if let Some(kind) = changes.kind {
            updated.kind = kind;
        }
        if let Some(status) = changes.status {
            updated.status = status;
        }
        Self::validate(&updated, account)?;
        debug!(transaction = %updated.id, "transaction edit validated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountKind;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn expense_on(account: &Account, cents: i64) -> Transaction {
        Transaction::new(
            account.owner_id,
            account.id,
            TransactionKind::Expense,
            Money::from_cents(cents),
            date(),
        )
    }

    #[test]
    fn zero_amount_is_rejected() {
        let account = Account::new(Uuid::new_v4(), "Checking", AccountKind::Checking);
        let err = TransactionService::validate(&expense_on(&account, 0), Some(&account))
            .expect_err("zero amount");
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn installments_on_checking_break_an_invariant() {
        let account = Account::new(Uuid::new_v4(), "Checking", AccountKind::Checking);
        let mut txn = expense_on(&account, 1_000);
        txn.installment_num = Some(1);
        txn.installment_total = Some(3);
        let err = TransactionService::validate(&txn, Some(&account)).expect_err("not a card");
        assert!(matches!(err, LedgerError::InvariantViolation(_)), "{err:?}");
        assert!(TransactionService::validate(&txn, None).is_ok());
    }

    #[test]
    fn installment_total_above_limit_is_rejected() {
        let card = Account::new(Uuid::new_v4(), "Card", AccountKind::CreditCard);
        let mut txn = expense_on(&card, 1_000);
        txn.installment_num = Some(1);
        txn.installment_total = Some(37);
        let err = TransactionService::validate(&txn, Some(&card)).expect_err("37 installments");
        assert_eq!(err.field(), Some("installmentTotal"));
    }

    #[test]
    fn edit_keeps_account_and_clears_blank_description() {
        let account = Account::new(Uuid::new_v4(), "Cash", AccountKind::Cash);
        let txn = expense_on(&account, 500).with_description("Lunch");
        let changes = TransactionChanges {
            amount: Some(Money::from_cents(650)),
            description: Some(Some("   ".into())),
            ..TransactionChanges::default()
        };
        let updated = TransactionService::apply_edit(&txn, changes, Some(&account)).unwrap();
        assert_eq!(updated.account_id(), account.id);
        assert_eq!(updated.amount, Money::from_cents(650));
        assert_eq!(updated.description, None);
    }
}
