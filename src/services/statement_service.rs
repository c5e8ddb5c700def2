//! Credit-card billing cycles: period membership, the statement lifecycle,
//! and limit/utilization figures.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::common::{clamped_date, shift_month};
use crate::domain::{
    Account, DateWindow, Money, Statement, StatementStatus, Transaction, TransactionKind,
    TransactionStatus,
};
use crate::errors::LedgerError;

use super::ServiceResult;

/// How the "used" side of the available-limit figure is chosen when more
/// than one cycle is still unpaid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnpaidStatementPolicy {
    /// Only the most recent open or closed statement counts.
    #[default]
    MostRecent,
    /// Every open or closed statement counts.
    SumUnpaid,
}

/// Payment settling a closed statement, drawn from another account.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementPayment {
    pub funding_account_id: Uuid,
    pub amount: Money,
    pub date: NaiveDate,
}

/// Dates of one billing cycle of a credit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingCycle {
    pub period: DateWindow,
    pub due_date: NaiveDate,
}

/// Expense/credit breakdown of the transactions inside a statement period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementTotals {
    pub expenses: Money,
    pub credits: Money,
    pub expense_count: usize,
    pub credit_count: usize,
}

impl StatementTotals {
    /// Amount owed for the cycle: purchases less refunds and credits.
    pub fn net(&self) -> Money {
        self.expenses - self.credits
    }
}

/// Limit figures for a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStats {
    pub limit: Money,
    pub current_statement: Money,
    pub available_limit: Money,
    pub next_due_date: Option<NaiveDate>,
}

/// Limit figures summed over every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortfolioStats {
    pub total_limit: Money,
    pub total_used: Money,
    pub total_available: Money,
}

/// A statement still awaiting full payment, paired with its card.
#[derive(Debug, Clone, Copy)]
pub struct UpcomingStatement<'a> {
    pub account: &'a Account,
    pub statement: &'a Statement,
}

pub struct StatementService;

impl StatementService {
    /// Transactions of the statement's account dated inside its period,
    /// both ends included.
    pub fn transactions_in<'a>(
        statement: &Statement,
        transactions: &'a [Transaction],
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.account_id() == statement.account_id && statement.covers(txn.date))
            .collect()
    }

    pub fn statement_totals(statement: &Statement, transactions: &[Transaction]) -> StatementTotals {
        let mut totals = StatementTotals::default();
        for txn in Self::transactions_in(statement, transactions) {
            match txn.kind {
                TransactionKind::Expense => {
                    totals.expenses += txn.amount;
                    totals.expense_count += 1;
                }
                TransactionKind::Income => {
                    totals.credits += txn.amount;
                    totals.credit_count += 1;
                }
                TransactionKind::Transfer | TransactionKind::Adjustment => {}
            }
        }
        totals
    }

    /// Copy of `statement` whose total reflects the supplied transactions.
    pub fn recompute_total(statement: &Statement, transactions: &[Transaction]) -> Statement {
        let mut updated = statement.clone();
        updated.total_amount = Self::statement_totals(statement, transactions).net();
        updated
    }

    /// The billing cycle of `account` that contains `reference`.
    ///
    /// A cycle ends on the closing day (clamped to short months) and starts
    /// the day after the previous closing. The due date is the first date
    /// after the close that falls on the due day of the account.
    pub fn billing_cycle(account: &Account, reference: NaiveDate) -> ServiceResult<BillingCycle> {
        if !account.is_credit_line() {
            return Err(LedgerError::invariant(format!(
                "{} account `{}` has no billing cycle",
                account.kind.label(),
                account.name
            )));
        }
        let closing_day = account
            .closing_day
            .filter(|day| (1..=31).contains(day))
            .ok_or_else(|| LedgerError::validation("closingDay", "credit line has no closing day"))?;
        let due_day = account
            .due_date
            .map(|due| due.day())
            .ok_or_else(|| LedgerError::validation("dueDay", "credit line has no due date"))?;

        let closing_in = |date: NaiveDate| clamped_date(date.year(), date.month(), closing_day);
        let this_close = closing_in(reference).ok_or_else(invalid_reference)?;
        let end = if reference <= this_close {
            this_close
        } else {
            shift_month(reference, 1)
                .and_then(closing_in)
                .ok_or_else(invalid_reference)?
        };
        let previous_close = shift_month(end, -1)
            .and_then(closing_in)
            .ok_or_else(invalid_reference)?;
        let start = previous_close + Duration::days(1);

        let mut due_date = clamped_date(end.year(), end.month(), due_day).ok_or_else(invalid_reference)?;
        if due_date <= end {
            let next = shift_month(end, 1).ok_or_else(invalid_reference)?;
            due_date = clamped_date(next.year(), next.month(), due_day).ok_or_else(invalid_reference)?;
        }

        Ok(BillingCycle {
            period: DateWindow { start, end },
            due_date,
        })
    }

    /// Draft open statement for the cycle containing `reference`, totalled
    /// from `transactions`.
    pub fn open_statement(
        account: &Account,
        reference: NaiveDate,
        transactions: &[Transaction],
    ) -> ServiceResult<Statement> {
        let cycle = Self::billing_cycle(account, reference)?;
        let statement = Statement::open(
            account.id,
            cycle.period.start,
            cycle.period.end,
            cycle.due_date,
        )?;
        Ok(Self::recompute_total(&statement, transactions))
    }

    /// Closes an open statement once its closing day has passed.
    pub fn refresh_status(statement: &Statement, today: NaiveDate) -> Statement {
        let mut updated = statement.clone();
        if statement.status == StatementStatus::Open && today > statement.end_date {
            updated.status = StatementStatus::Closed;
            info!(statement = %statement.id, "statement closed after cycle end");
        }
        updated
    }

    /// Moves a statement along `OPEN -> CLOSED -> {PAID, PARTIALLY_PAID}`.
    ///
    /// Settling transitions need a payment from another account: `PAID`
    /// covers at least the total, `PARTIALLY_PAID` covers less than it.
    pub fn transition(
        statement: &Statement,
        target: StatementStatus,
        payment: Option<&StatementPayment>,
    ) -> ServiceResult<Statement> {
        if !statement.status.can_transition_to(target) {
            return Err(LedgerError::invariant(format!(
                "statement cannot move from {} to {}",
                statement.status, target
            )));
        }
        if target.requires_payment() {
            let payment = payment.ok_or_else(|| {
                LedgerError::validation("paymentAccountId", "a funding account is required")
            })?;
            Self::validate_payment(statement, target, payment)?;
        }
        let mut updated = statement.clone();
        updated.status = target;
        info!(
            statement = %statement.id,
            from = %statement.status,
            to = %target,
            "statement status changed"
        );
        Ok(updated)
    }

    fn validate_payment(
        statement: &Statement,
        target: StatementStatus,
        payment: &StatementPayment,
    ) -> ServiceResult<()> {
        if payment.funding_account_id == statement.account_id {
            return Err(LedgerError::validation(
                "paymentAccountId",
                "a card cannot pay its own statement",
            ));
        }
        if !payment.amount.is_positive() {
            return Err(LedgerError::validation("amount", "must be greater than zero"));
        }
        match target {
            StatementStatus::Paid if payment.amount < statement.total_amount => {
                Err(LedgerError::validation(
                    "amount",
                    format!(
                        "{} does not cover the statement total {}",
                        payment.amount, statement.total_amount
                    ),
                ))
            }
            StatementStatus::PartiallyPaid if payment.amount >= statement.total_amount => {
                Err(LedgerError::validation(
                    "amount",
                    "a payment covering the total settles the statement as paid",
                ))
            }
            _ => Ok(()),
        }
    }

    /// Expense on the funding account that offsets a statement payment.
    /// Persisting it is left to the caller.
    pub fn payment_transaction(
        statement: &Statement,
        payment: &StatementPayment,
        owner_id: Uuid,
    ) -> Transaction {
        let mut txn = Transaction::new(
            owner_id,
            payment.funding_account_id,
            TransactionKind::Expense,
            payment.amount,
            payment.date,
        )
        .with_description(format!("Statement payment due {}", statement.due_date))
        .with_status(TransactionStatus::Confirmed);
        txn.payment_date = Some(payment.date);
        txn
    }

    /// Amount counted against the limit of `account_id`.
    pub fn used_amount(
        account_id: Uuid,
        statements: &[Statement],
        policy: UnpaidStatementPolicy,
    ) -> Money {
        let unpaid: Vec<&Statement> = statements
            .iter()
            .filter(|stmt| stmt.account_id == account_id && stmt.status.is_unpaid())
            .collect();
        match policy {
            UnpaidStatementPolicy::MostRecent => {
                if unpaid.len() > 1 {
                    warn!(
                        account = %account_id,
                        unpaid = unpaid.len(),
                        "several unpaid statements; only the most recent counts against the limit"
                    );
                }
                unpaid
                    .iter()
                    .max_by_key(|stmt| stmt.end_date)
                    .map(|stmt| stmt.total_amount)
                    .unwrap_or_default()
            }
            UnpaidStatementPolicy::SumUnpaid => unpaid.iter().map(|stmt| stmt.total_amount).sum(),
        }
    }

    /// `limit − used`.
    pub fn available_limit(account: &Account, used: Money) -> Money {
        account.credit_limit() - used
    }

    pub fn card_stats(
        account: &Account,
        statements: &[Statement],
        policy: UnpaidStatementPolicy,
    ) -> CardStats {
        let current_statement = Self::used_amount(account.id, statements, policy);
        let next_due_date = statements
            .iter()
            .filter(|stmt| stmt.account_id == account.id && stmt.status != StatementStatus::Paid)
            .map(|stmt| stmt.due_date)
            .min()
            .or(account.due_date);
        CardStats {
            limit: account.credit_limit(),
            current_statement,
            available_limit: Self::available_limit(account, current_statement),
            next_due_date,
        }
    }

    pub fn portfolio_stats(
        cards: &[Account],
        statements_by_account: &HashMap<Uuid, Vec<Statement>>,
        policy: UnpaidStatementPolicy,
    ) -> PortfolioStats {
        let mut stats = PortfolioStats::default();
        for card in cards.iter().filter(|account| account.is_credit_line()) {
            let statements = statements_by_account
                .get(&card.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            stats.total_limit += card.credit_limit();
            stats.total_used += Self::used_amount(card.id, statements, policy);
        }
        stats.total_available = stats.total_limit - stats.total_used;
        stats
    }

    /// Statements not yet fully paid across every card, earliest due first.
    pub fn upcoming_statements<'a>(
        cards: &'a [Account],
        statements_by_account: &'a HashMap<Uuid, Vec<Statement>>,
    ) -> Vec<UpcomingStatement<'a>> {
        let mut upcoming: Vec<UpcomingStatement<'a>> = cards
            .iter()
            .filter_map(|account| {
                statements_by_account
                    .get(&account.id)
                    .map(|statements| (account, statements))
            })
            .flat_map(|(account, statements)| {
                statements
                    .iter()
                    .filter(|stmt| stmt.status != StatementStatus::Paid)
                    .map(move |statement| UpcomingStatement { account, statement })
            })
            .collect();
        upcoming.sort_by_key(|entry| entry.statement.due_date);
        upcoming
    }
}

fn invalid_reference() -> LedgerError {
    LedgerError::validation("date", "reference date is out of the supported range")
}
