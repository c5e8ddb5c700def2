mod common;

use common::{date, entry, Household};
use wallet_core::domain::{Money, TransactionKind};
use wallet_core::services::BalanceService;

#[test]
fn checking_balance_folds_income_and_expense() {
    let home = Household::new();
    let ledger = vec![
        entry(&home.checking, TransactionKind::Income, 200, date(2024, 3, 1)),
        entry(&home.checking, TransactionKind::Expense, 50, date(2024, 3, 2)),
    ];
    assert_eq!(
        BalanceService::compute_balance(&home.checking, &ledger),
        Money::from_units(650)
    );
}

#[test]
fn transfers_and_adjustments_leave_balances_untouched() {
    let home = Household::new();
    let ledger = vec![
        entry(&home.checking, TransactionKind::Transfer, 100, date(2024, 3, 1)),
        entry(&home.checking, TransactionKind::Adjustment, 30, date(2024, 3, 1)),
    ];
    assert_eq!(
        BalanceService::compute_balance(&home.checking, &ledger),
        home.checking.initial_balance
    );
}

#[test]
fn balance_map_matches_per_account_computation() {
    let home = Household::new();
    let accounts = home.accounts();
    let ledger = vec![
        entry(&home.checking, TransactionKind::Income, 200, date(2024, 3, 1)),
        entry(&home.wallet, TransactionKind::Expense, 15, date(2024, 3, 2)),
        entry(&home.card, TransactionKind::Expense, 300, date(2024, 3, 3)),
    ];
    let map = BalanceService::build_balance_map(&accounts, &ledger);
    assert_eq!(map.len(), accounts.len());
    for account in &accounts {
        assert_eq!(map[&account.id], BalanceService::compute_balance(account, &ledger));
    }
    assert_eq!(map[&home.card.id], Money::from_units(-300));
}

#[test]
fn total_balance_ignores_credit_lines() {
    let home = Household::new();
    let accounts = home.accounts();
    let ledger = vec![
        entry(&home.checking, TransactionKind::Income, 200, date(2024, 3, 1)),
        entry(&home.checking, TransactionKind::Expense, 50, date(2024, 3, 2)),
        entry(&home.card, TransactionKind::Expense, 999, date(2024, 3, 3)),
    ];
    assert_eq!(
        BalanceService::compute_total_balance(&accounts, &ledger),
        Money::from_units(650 + 40)
    );
}

#[test]
fn account_without_history_keeps_initial_balance() {
    let home = Household::new();
    assert_eq!(
        BalanceService::compute_balance(&home.wallet, &[]),
        Money::from_units(40)
    );
}

#[test]
fn balance_is_independent_of_partition_order() {
    let home = Household::new();
    let ledger = vec![
        entry(&home.checking, TransactionKind::Income, 120, date(2024, 3, 1)),
        entry(&home.checking, TransactionKind::Expense, 35, date(2024, 3, 2)),
        entry(&home.checking, TransactionKind::Expense, 5, date(2024, 3, 3)),
        entry(&home.checking, TransactionKind::Income, 7, date(2024, 3, 4)),
    ];
    let mut reversed = ledger.clone();
    reversed.reverse();
    let (first, second) = ledger.split_at(2);
    let joined: Vec<_> = second.iter().chain(first).cloned().collect();

    let expected = Money::from_units(500 + 120 - 35 - 5 + 7);
    assert_eq!(BalanceService::compute_balance(&home.checking, &ledger), expected);
    assert_eq!(BalanceService::compute_balance(&home.checking, &reversed), expected);
    assert_eq!(BalanceService::compute_balance(&home.checking, &joined), expected);
}
