use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{api_enum, Displayable, Identifiable};
use crate::domain::money::Money;
use crate::domain::wire;

/// Whether transfers and adjustments move an account's derived balance.
///
/// Balances currently fold in only incomes and expenses; flipping this makes
/// transfers debit and adjustments credit the owning account.
pub const COUNT_TRANSFERS_AND_ADJUSTMENTS: bool = false;

/// A single ledger entry. Always belongs to exactly one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    account_id: Uuid,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub responsible_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    /// Non-negative magnitude; direction comes from `kind`.
    pub amount: Money,
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    #[serde(default, with = "wire::option_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    #[serde(default)]
    pub statement_id: Option<Uuid>,
    #[serde(default)]
    pub installment_num: Option<u32>,
    #[serde(default)]
    pub installment_total: Option<u32>,
    #[serde(default)]
    pub parent_transaction_id: Option<Uuid>,
    #[serde(default)]
    pub recurrence_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        owner_id: Uuid,
        account_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            account_id,
            category_id: None,
            responsible_id: None,
            description: None,
            amount,
            date,
            payment_date: Some(date),
            kind,
            status: TransactionStatus::Confirmed,
            statement_id: None,
            installment_num: None,
            installment_total: None,
            parent_transaction_id: None,
            recurrence_id: None,
        }
    }

    /// Owning account. Fixed at creation; there is no setter.
    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_responsible(mut self, responsible_id: Uuid) -> Self {
        self.responsible_id = Some(responsible_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Signed contribution of this entry to its account's derived balance.
    pub fn signed_amount(&self) -> Money {
        match self.kind.balance_effect() {
            BalanceEffect::Credit => self.amount,
            BalanceEffect::Debit => -self.amount,
            BalanceEffect::Excluded => Money::ZERO,
        }
    }

    /// True for entries produced by splitting a purchase into installments.
    pub fn is_installment(&self) -> bool {
        self.installment_total.is_some_and(|total| total > 1)
    }

    /// Id shared by every member of this entry's installment group.
    pub fn installment_group_id(&self) -> Option<Uuid> {
        if !self.is_installment() {
            return None;
        }
        Some(self.parent_transaction_id.unwrap_or(self.id))
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        match (self.installment_num, self.installment_total) {
            (Some(num), Some(total)) if total > 1 => {
                format!("{} {} {} [{num}/{total}]", self.date, self.kind, self.amount)
            }
            _ => format!("{} {} {}", self.date, self.kind, self.amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Adjustment,
}

api_enum!(TransactionKind {
    Income => "INCOME",
    Expense => "EXPENSE",
    Transfer => "TRANSFER",
    Adjustment => "ADJUSTMENT",
});

/// How a transaction kind moves the balance of its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    Credit,
    Debit,
    Excluded,
}

impl TransactionKind {
    pub fn balance_effect(self) -> BalanceEffect {
        match self {
            TransactionKind::Income => BalanceEffect::Credit,
            TransactionKind::Expense => BalanceEffect::Debit,
            TransactionKind::Transfer if COUNT_TRANSFERS_AND_ADJUSTMENTS => BalanceEffect::Debit,
            TransactionKind::Adjustment if COUNT_TRANSFERS_AND_ADJUSTMENTS => {
                BalanceEffect::Credit
            }
            TransactionKind::Transfer | TransactionKind::Adjustment => BalanceEffect::Excluded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Reconciled,
}

api_enum!(TransactionStatus {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Reconciled => "RECONCILED",
});

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionKind) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            kind,
            Money::from_units(10),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn transfers_and_adjustments_do_not_move_balances() {
        assert!(!COUNT_TRANSFERS_AND_ADJUSTMENTS);
        assert_eq!(sample(TransactionKind::Transfer).signed_amount(), Money::ZERO);
        assert_eq!(sample(TransactionKind::Adjustment).signed_amount(), Money::ZERO);
        assert_eq!(
            sample(TransactionKind::Expense).signed_amount(),
            Money::from_units(-10)
        );
    }

    #[test]
    fn single_payment_has_no_installment_group() {
        let mut txn = sample(TransactionKind::Expense);
        txn.installment_num = Some(1);
        txn.installment_total = Some(1);
        assert!(!txn.is_installment());
        assert_eq!(txn.installment_group_id(), None);
    }

    #[test]
    fn label_includes_installment_position() {
        let mut txn = sample(TransactionKind::Expense);
        txn.installment_num = Some(2);
        txn.installment_total = Some(3);
        assert!(txn.display_label().ends_with("[2/3]"));
    }
}
