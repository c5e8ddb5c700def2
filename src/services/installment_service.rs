//! Splits credit-line purchases into dated installment transactions.

use tracing::debug;
use uuid::Uuid;

use crate::domain::common::shift_month;
use crate::domain::{Account, Transaction};
use crate::errors::LedgerError;

use super::ServiceResult;

/// Largest number of installments a purchase may be split into.
pub const MAX_INSTALLMENTS: u32 = 36;

/// Widest spacing, in months, between consecutive installments.
pub const MAX_CYCLE_MONTHS: u32 = 12;

/// A purchase awaiting expansion. `purchase` holds the full amount and the
/// date of the first installment.
#[derive(Debug, Clone)]
pub struct InstallmentPlan {
    pub purchase: Transaction,
    pub installment_total: u32,
    /// Months between consecutive installments.
    pub cycle_months: u32,
}

impl InstallmentPlan {
    pub fn new(purchase: Transaction, installment_total: u32) -> Self {
        Self {
            purchase,
            installment_total,
            cycle_months: 1,
        }
    }

    pub fn with_cycle_months(mut self, cycle_months: u32) -> Self {
        self.cycle_months = cycle_months;
        self
    }
}

pub struct InstallmentService;

impl InstallmentService {
    /// Expands the plan into `installment_total` sibling transactions.
    ///
    /// The first sibling keeps the purchase id and is the group's primary;
    /// the others point at it through `parent_transaction_id`. Amounts add
    /// back up to the purchase amount to the cent, with leftover cents on the
    /// leading installments. A total of one yields the purchase unchanged.
    pub fn expand(
        plan: &InstallmentPlan,
        account: Option<&Account>,
    ) -> ServiceResult<Vec<Transaction>> {
        let total = plan.installment_total;
        if !(1..=MAX_INSTALLMENTS).contains(&total) {
            return Err(LedgerError::validation(
                "installmentTotal",
                format!("{total} is outside 1..={MAX_INSTALLMENTS}"),
            ));
        }
        if !(1..=MAX_CYCLE_MONTHS).contains(&plan.cycle_months) {
            return Err(LedgerError::validation(
                "cycleMonths",
                format!("{} is outside 1..={MAX_CYCLE_MONTHS}", plan.cycle_months),
            ));
        }
        if !plan.purchase.amount.is_positive() {
            return Err(LedgerError::validation(
                "amount",
                "must be greater than zero",
            ));
        }

        let mut purchase = plan.purchase.clone();
        if total == 1 {
            purchase.installment_num = None;
            purchase.installment_total = None;
            purchase.parent_transaction_id = None;
            return Ok(vec![purchase]);
        }

        if let Some(account) = account {
            if !account.is_credit_line() {
                return Err(LedgerError::invariant(format!(
                    "cannot split a purchase on {} account `{}`",
                    account.kind.label(),
                    account.name
                )));
            }
        }

        let primary_id = purchase.id;
        let amounts = purchase.amount.split(total)?;
        let siblings = amounts
            .into_iter()
            .zip(0u32..)
            .map(|(amount, idx)| -> ServiceResult<Transaction> {
                let offset = idx
                    .checked_mul(plan.cycle_months)
                    .and_then(|months| i32::try_from(months).ok())
                    .ok_or_else(out_of_calendar)?;
                let mut sibling = purchase.clone();
                sibling.amount = amount;
                sibling.date = shift_month(purchase.date, offset).ok_or_else(out_of_calendar)?;
                sibling.payment_date = purchase
                    .payment_date
                    .map(|payment| shift_month(payment, offset).ok_or_else(out_of_calendar))
                    .transpose()?;
                sibling.installment_num = Some(idx + 1);
                sibling.installment_total = Some(total);
                if idx == 0 {
                    sibling.parent_transaction_id = None;
                } else {
                    sibling.id = Uuid::new_v4();
                    sibling.parent_transaction_id = Some(primary_id);
                    sibling.statement_id = None;
                }
                Ok(sibling)
            })
            .collect::<ServiceResult<Vec<Transaction>>>()?;

        debug!(
            purchase = %primary_id,
            installments = total,
            amount = %purchase.amount,
            "purchase split into installments"
        );
        Ok(siblings)
    }

    /// Every member of the installment group `transaction` belongs to,
    /// ordered by installment number. Empty for single-payment entries.
    pub fn group<'a>(transaction: &Transaction, all: &'a [Transaction]) -> Vec<&'a Transaction> {
        let Some(group_id) = transaction.installment_group_id() else {
            return Vec::new();
        };
        let mut members: Vec<&Transaction> = all
            .iter()
            .filter(|candidate| candidate.installment_group_id() == Some(group_id))
            .collect();
        members.sort_by_key(|member| member.installment_num.unwrap_or(0));
        members
    }

    /// Position label such as `2/3`, or `None` for single-payment entries.
    pub fn label(transaction: &Transaction) -> Option<String> {
        match (transaction.installment_num, transaction.installment_total) {
            (Some(num), Some(total)) if total > 1 => Some(format!("{num}/{total}")),
            _ => None,
        }
    }
}

fn out_of_calendar() -> LedgerError {
    LedgerError::validation("date", "installment date is out of the supported range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountKind, Money, TransactionKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card() -> Account {
        Account::new(Uuid::new_v4(), "Card", AccountKind::CreditCard).with_credit_terms(
            5,
            None,
            Money::from_units(5_000),
        )
    }

    fn purchase(account: &Account, cents: i64, on: NaiveDate) -> Transaction {
        Transaction::new(
            account.owner_id,
            account.id,
            TransactionKind::Expense,
            Money::from_cents(cents),
            on,
        )
    }

    #[test]
    fn splits_evenly_into_monthly_siblings() {
        let card = card();
        let plan = InstallmentPlan::new(purchase(&card, 9_000, date(2024, 1, 15)), 3);
        let siblings = InstallmentService::expand(&plan, Some(&card)).unwrap();

        let dates: Vec<NaiveDate> = siblings.iter().map(|txn| txn.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
        assert!(siblings
            .iter()
            .all(|txn| txn.amount == Money::from_units(30)));
        let numbers: Vec<Option<u32>> = siblings.iter().map(|txn| txn.installment_num).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn children_point_at_primary() {
        let card = card();
        let original = purchase(&card, 10_000, date(2024, 6, 1));
        let primary_id = original.id;
        let siblings = InstallmentService::expand(&InstallmentPlan::new(original, 4), None).unwrap();

        assert_eq!(siblings[0].id, primary_id);
        assert_eq!(siblings[0].parent_transaction_id, None);
        for child in &siblings[1..] {
            assert_ne!(child.id, primary_id);
            assert_eq!(child.parent_transaction_id, Some(primary_id));
        }
        let group = InstallmentService::group(&siblings[2], &siblings);
        assert_eq!(group.len(), 4);
        assert_eq!(group[0].id, primary_id);
    }

    #[test]
    fn end_of_month_purchase_does_not_drift() {
        let card = card();
        let plan = InstallmentPlan::new(purchase(&card, 3_000, date(2024, 1, 31)), 3);
        let siblings = InstallmentService::expand(&plan, Some(&card)).unwrap();
        let dates: Vec<NaiveDate> = siblings.iter().map(|txn| txn.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn single_installment_is_a_plain_transaction() {
        let card = card();
        let original = purchase(&card, 4_200, date(2024, 2, 2));
        let result = InstallmentService::expand(&InstallmentPlan::new(original.clone(), 1), None)
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, original.id);
        assert_eq!(result[0].installment_total, None);
        assert_eq!(InstallmentService::label(&result[0]), None);
    }

    #[test]
    fn out_of_range_totals_are_rejected() {
        let card = card();
        for total in [0, MAX_INSTALLMENTS + 1] {
            let plan = InstallmentPlan::new(purchase(&card, 100, date(2024, 2, 2)), total);
            let err = InstallmentService::expand(&plan, Some(&card)).expect_err("out of range");
            assert_eq!(err.field(), Some("installmentTotal"));
        }
    }

    #[test]
    fn cycle_outside_a_year_is_rejected() {
        let card = card();
        for cycle in [0, MAX_CYCLE_MONTHS + 1, 50_000_000, 3_000_000_000] {
            let plan = InstallmentPlan::new(purchase(&card, 900, date(2024, 1, 15)), 3)
                .with_cycle_months(cycle);
            let err = InstallmentService::expand(&plan, Some(&card)).expect_err("bad cycle");
            assert_eq!(err.field(), Some("cycleMonths"), "cycle {cycle}");
        }
    }

    #[test]
    fn yearly_cycle_lands_on_distinct_dates() {
        let card = card();
        let plan = InstallmentPlan::new(purchase(&card, 900, date(2024, 1, 15)), 3)
            .with_cycle_months(MAX_CYCLE_MONTHS);
        let siblings = InstallmentService::expand(&plan, Some(&card)).unwrap();
        let dates: Vec<NaiveDate> = siblings.iter().map(|txn| txn.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2025, 1, 15), date(2026, 1, 15)]
        );
    }

    #[test]
    fn splitting_on_checking_account_is_rejected() {
        let checking = Account::new(Uuid::new_v4(), "Checking", AccountKind::Checking);
        let plan = InstallmentPlan::new(purchase(&checking, 1_000, date(2024, 2, 2)), 2);
        let err = InstallmentService::expand(&plan, Some(&checking)).expect_err("not a card");
        assert!(matches!(err, LedgerError::InvariantViolation(_)), "{err:?}");
    }
}
