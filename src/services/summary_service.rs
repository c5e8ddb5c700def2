//! Grouping and totals for reporting views.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DateWindow, Money, Transaction, TransactionKind, TransactionStatus};

/// Income/expense totals for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodSummary {
    pub income: Money,
    pub expense: Money,
}

impl PeriodSummary {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Signed total of the transactions dated on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Money,
    pub count: usize,
}

/// Criteria used by the transaction list. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub account_id: Option<Uuid>,
    pub status: Option<TransactionStatus>,
    pub responsible_id: Option<Uuid>,
    pub window: Option<DateWindow>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self.account_id.map_or(true, |id| txn.account_id() == id)
            && self.status.map_or(true, |status| txn.status == status)
            && self
                .responsible_id
                .map_or(true, |id| txn.responsible_id == Some(id))
            && self.window.map_or(true, |window| window.contains(txn.date))
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| self.matches(txn)).collect()
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Sums amounts per key produced by `key_fn`.
    pub fn group_sum<'a, K, I, F>(transactions: I, key_fn: F) -> HashMap<K, Money>
    where
        K: Eq + Hash,
        I: IntoIterator<Item = &'a Transaction>,
        F: Fn(&Transaction) -> K,
    {
        let mut totals: HashMap<K, Money> = HashMap::new();
        for txn in transactions {
            *totals.entry(key_fn(txn)).or_default() += txn.amount;
        }
        totals
    }

    /// Expense totals per responsible party; `None` collects unattributed
    /// spending.
    pub fn spend_by_responsible(transactions: &[Transaction]) -> HashMap<Option<Uuid>, Money> {
        Self::group_sum(Self::expenses(transactions), |txn| txn.responsible_id)
    }

    /// The `limit` categories with the highest expense totals, largest first.
    /// Uncategorized spending is reported under `None`.
    pub fn spend_by_category_top(
        transactions: &[Transaction],
        limit: usize,
    ) -> Vec<(Option<Uuid>, Money)> {
        let mut ranked: Vec<(Option<Uuid>, Money)> =
            Self::group_sum(Self::expenses(transactions), |txn| txn.category_id)
                .into_iter()
                .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> PeriodSummary {
        let mut summary = PeriodSummary::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => summary.income += txn.amount,
                TransactionKind::Expense => summary.expense += txn.amount,
                TransactionKind::Transfer | TransactionKind::Adjustment => {}
            }
        }
        summary
    }

    /// Income and expense totals for entries dated inside `window`.
    pub fn monthly_summary(transactions: &[Transaction], window: DateWindow) -> PeriodSummary {
        Self::summarize(
            transactions
                .iter()
                .filter(|txn| window.contains(txn.date)),
        )
    }

    /// Per-day totals, newest day first. Incomes add, every other kind
    /// subtracts.
    pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
        let mut by_day: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
        for txn in transactions {
            let entry = by_day.entry(txn.date).or_insert_with(|| DailyTotal {
                date: txn.date,
                total: Money::ZERO,
                count: 0,
            });
            entry.count += 1;
            if txn.kind == TransactionKind::Income {
                entry.total += txn.amount;
            } else {
                entry.total -= txn.amount;
            }
        }
        by_day.into_values().rev().collect()
    }

    /// The `limit` newest transactions.
    pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(limit);
        sorted
    }

    fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::Expense)
    }
}
