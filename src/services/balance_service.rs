//! Derived account balances.
//!
//! The server's stored balance is written once at account creation and never
//! updated, so every balance shown to the user is recomputed here from the
//! initial balance plus the transaction history.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Account, Money, Transaction};

pub struct BalanceService;

impl BalanceService {
    /// `initial_balance + Σ income − Σ expense` over the account's entries.
    pub fn compute_balance(account: &Account, transactions: &[Transaction]) -> Money {
        let movement: Money = transactions
            .iter()
            .filter(|txn| txn.account_id() == account.id)
            .map(Transaction::signed_amount)
            .sum();
        account.initial_balance + movement
    }

    /// Net ledger movement per account id, computed in a single pass.
    pub fn movements_by_account(transactions: &[Transaction]) -> HashMap<Uuid, Money> {
        let mut movements: HashMap<Uuid, Money> = HashMap::new();
        for txn in transactions {
            *movements.entry(txn.account_id()).or_default() += txn.signed_amount();
        }
        movements
    }

    /// Balance for every supplied account, keyed by account id.
    pub fn build_balance_map(
        accounts: &[Account],
        transactions: &[Transaction],
    ) -> HashMap<Uuid, Money> {
        let movements = Self::movements_by_account(transactions);
        accounts
            .iter()
            .map(|account| {
                let movement = movements.get(&account.id).copied().unwrap_or_default();
                (account.id, account.initial_balance + movement)
            })
            .collect()
    }

    /// Liquid balance: the sum over every account that is not a credit line.
    /// Credit-line balances are liabilities tracked through statements.
    pub fn compute_total_balance(accounts: &[Account], transactions: &[Transaction]) -> Money {
        let movements = Self::movements_by_account(transactions);
        accounts
            .iter()
            .filter(|account| !account.is_credit_line())
            .map(|account| {
                account.initial_balance + movements.get(&account.id).copied().unwrap_or_default()
            })
            .sum()
    }
}
