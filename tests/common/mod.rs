#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;
use wallet_core::domain::{Account, AccountKind, Money, Statement, StatementStatus, Transaction, TransactionKind};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Accounts owned by a single user: a funded checking account, a cash
/// wallet and a credit card closing on the 5th and due on the 12th.
pub struct Household {
    pub owner: Uuid,
    pub checking: Account,
    pub wallet: Account,
    pub card: Account,
}

impl Household {
    pub fn new() -> Self {
        let owner = Uuid::new_v4();
        Self {
            owner,
            checking: Account::new(owner, "Checking", AccountKind::Checking)
                .with_initial_balance(Money::from_units(500)),
            wallet: Account::new(owner, "Wallet", AccountKind::Cash)
                .with_initial_balance(Money::from_units(40)),
            card: Account::new(owner, "Card", AccountKind::CreditCard).with_credit_terms(
                5,
                Some(date(2024, 1, 12)),
                Money::from_units(1_000),
            ),
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        vec![self.checking.clone(), self.wallet.clone(), self.card.clone()]
    }
}

pub fn entry(account: &Account, kind: TransactionKind, units: i64, on: NaiveDate) -> Transaction {
    Transaction::new(account.owner_id, account.id, kind, Money::from_units(units), on)
}

pub fn statement(
    account: &Account,
    start: NaiveDate,
    end: NaiveDate,
    status: StatementStatus,
    units: i64,
) -> Statement {
    let mut stmt = Statement::open(account.id, start, end, end + chrono::Duration::days(7))
        .expect("valid statement dates");
    stmt.status = status;
    stmt.total_amount = Money::from_units(units);
    stmt
}
