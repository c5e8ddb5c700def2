//! Billing-cycle snapshots for credit-line accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{api_enum, DateWindow, Displayable, Identifiable};
use crate::domain::money::Money;
use crate::domain::wire;
use crate::errors::{LedgerError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub id: Uuid,
    pub account_id: Uuid,
    #[serde(with = "wire::date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire::date")]
    pub end_date: NaiveDate,
    #[serde(with = "wire::date")]
    pub due_date: NaiveDate,
    pub status: StatementStatus,
    pub total_amount: Money,
}

impl Statement {
    /// Creates an open statement; requires `start <= end < due`.
    pub fn open(
        account_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self> {
        let statement = Self {
            id: Uuid::new_v4(),
            account_id,
            start_date,
            end_date,
            due_date,
            status: StatementStatus::Open,
            total_amount: Money::ZERO,
        };
        statement.validate_dates()?;
        Ok(statement)
    }

    pub fn validate_dates(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(LedgerError::validation(
                "endDate",
                "cycle end precedes cycle start",
            ));
        }
        if self.due_date <= self.end_date {
            return Err(LedgerError::validation(
                "dueDate",
                "due date must fall after the cycle closes",
            ));
        }
        Ok(())
    }

    pub fn period(&self) -> DateWindow {
        DateWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.period().contains(date)
    }
}

impl Identifiable for Statement {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Statement {
    fn display_label(&self) -> String {
        format!(
            "{}..{} due {} [{}] {}",
            self.start_date, self.end_date, self.due_date, self.status, self.total_amount
        )
    }
}

/// Lifecycle of a billing cycle: `OPEN -> CLOSED -> {PAID, PARTIALLY_PAID}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementStatus {
    Open,
    Closed,
    Paid,
    PartiallyPaid,
}

api_enum!(StatementStatus {
    Open => "OPEN",
    Closed => "CLOSED",
    Paid => "PAID",
    PartiallyPaid => "PARTIALLY_PAID",
});

impl StatementStatus {
    /// Open or closed but not yet settled.
    pub fn is_unpaid(self) -> bool {
        matches!(self, StatementStatus::Open | StatementStatus::Closed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StatementStatus::Paid | StatementStatus::PartiallyPaid)
    }

    pub fn can_transition_to(self, next: StatementStatus) -> bool {
        matches!(
            (self, next),
            (StatementStatus::Open, StatementStatus::Closed)
                | (StatementStatus::Closed, StatementStatus::Paid)
                | (StatementStatus::Closed, StatementStatus::PartiallyPaid)
        )
    }

    /// Whether moving into this status must be backed by a payment.
    pub fn requires_payment(self) -> bool {
        self.is_terminal()
    }
}
