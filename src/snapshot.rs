//! In-memory view over the collections fetched for one user.
//!
//! Derived balances are computed lazily and cached until the next write.

use std::collections::HashMap;

use once_cell::unsync::OnceCell;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{find_by_id, Account, Category, Money, Responsible, Statement, Transaction};
use crate::errors::Result;
use crate::services::{BalanceService, StatementService, UnpaidStatementPolicy};

/// Balance as it should be rendered. `Unavailable` is shown instead of a
/// number when the figure cannot be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDisplay {
    Available(Money),
    Unavailable,
}

impl BalanceDisplay {
    pub fn amount(&self) -> Option<Money> {
        match self {
            BalanceDisplay::Available(amount) => Some(*amount),
            BalanceDisplay::Unavailable => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotDocument {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    responsibles: Vec<Responsible>,
    statements: Vec<Statement>,
    complete: Option<bool>,
}

#[derive(Debug, Default)]
pub struct LedgerSnapshot {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    responsibles: Vec<Responsible>,
    statements: HashMap<Uuid, Vec<Statement>>,
    complete: bool,
    balances: OnceCell<HashMap<Uuid, Money>>,
}

impl LedgerSnapshot {
    pub fn new(accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        Self {
            accounts,
            transactions,
            complete: true,
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_responsibles(mut self, responsibles: Vec<Responsible>) -> Self {
        self.responsibles = responsibles;
        self
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = group_statements(statements);
        self
    }

    /// Builds a snapshot from a JSON document with `accounts`,
    /// `transactions`, `categories`, `responsibles` and `statements` arrays.
    /// Missing arrays are treated as empty; `complete: false` marks a
    /// partial fetch.
    pub fn from_json(input: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(input)?;
        let snapshot = Self {
            accounts: document.accounts,
            transactions: document.transactions,
            categories: document.categories,
            responsibles: document.responsibles,
            statements: group_statements(document.statements),
            complete: document.complete.unwrap_or(true),
            balances: OnceCell::new(),
        };
        debug!(
            accounts = snapshot.accounts.len(),
            transactions = snapshot.transactions.len(),
            complete = snapshot.complete,
            "ledger snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Flags the snapshot as built from a failed or partial fetch. Balances
    /// then display as unavailable rather than as a misleading number.
    pub fn mark_incomplete(&mut self) {
        self.complete = false;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn responsibles(&self) -> &[Responsible] {
        &self.responsibles
    }

    pub fn statements_by_account(&self) -> &HashMap<Uuid, Vec<Statement>> {
        &self.statements
    }

    pub fn statements_for(&self, account_id: Uuid) -> &[Statement] {
        self.statements
            .get(&account_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_account(&self, id: Uuid) -> Option<&Account> {
        find_by_id(&self.accounts, id)
    }

    pub fn find_transaction(&self, id: Uuid) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    pub fn find_category(&self, id: Uuid) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn find_responsible(&self, id: Uuid) -> Option<&Responsible> {
        find_by_id(&self.responsibles, id)
    }

    /// Derived balance of every account, computed on first use.
    pub fn balances(&self) -> &HashMap<Uuid, Money> {
        self.balances
            .get_or_init(|| BalanceService::build_balance_map(&self.accounts, &self.transactions))
    }

    pub fn balance_display(&self, account_id: Uuid) -> BalanceDisplay {
        if !self.complete {
            return BalanceDisplay::Unavailable;
        }
        match self.balances().get(&account_id) {
            Some(balance) => BalanceDisplay::Available(*balance),
            None => BalanceDisplay::Unavailable,
        }
    }

    /// Liquid total across every non-credit account.
    pub fn total_balance(&self) -> BalanceDisplay {
        if !self.complete {
            return BalanceDisplay::Unavailable;
        }
        let balances = self.balances();
        let total = self
            .accounts
            .iter()
            .filter(|account| !account.is_credit_line())
            .filter_map(|account| balances.get(&account.id))
            .copied()
            .sum();
        BalanceDisplay::Available(total)
    }

    /// Stored balance minus the derived one. Non-zero means the server copy
    /// is stale.
    pub fn recorded_balance_drift(&self, account_id: Uuid) -> Option<Money> {
        let account = self.find_account(account_id)?;
        let derived = self.balances().get(&account_id)?;
        Some(account.recorded_balance - *derived)
    }

    /// Available limit of a credit line under `policy`.
    pub fn available_limit(&self, account_id: Uuid, policy: UnpaidStatementPolicy) -> Option<Money> {
        let account = self.find_account(account_id)?;
        if !account.is_credit_line() {
            return None;
        }
        let used = StatementService::used_amount(account_id, self.statements_for(account_id), policy);
        Some(StatementService::available_limit(account, used))
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
        self.invalidate("account added");
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
        self.invalidate("transaction added");
    }

    /// Swaps the stored transaction with the same id. Returns `false` when no
    /// such transaction exists.
    pub fn replace_transaction(&mut self, transaction: Transaction) -> bool {
        let Some(slot) = self
            .transactions
            .iter_mut()
            .find(|existing| existing.id == transaction.id)
        else {
            return false;
        };
        *slot = transaction;
        self.invalidate("transaction replaced");
        true
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.invalidate("transaction removed");
        Some(removed)
    }

    /// Inserts or replaces a statement, keyed by its id.
    pub fn upsert_statement(&mut self, statement: Statement) {
        let statements = self.statements.entry(statement.account_id).or_default();
        match statements.iter_mut().find(|existing| existing.id == statement.id) {
            Some(slot) => *slot = statement,
            None => statements.push(statement),
        }
    }

    fn invalidate(&mut self, reason: &'static str) {
        if self.balances.take().is_some() {
            debug!(reason, "balance cache invalidated");
        }
    }
}

fn group_statements(statements: Vec<Statement>) -> HashMap<Uuid, Vec<Statement>> {
    let mut grouped: HashMap<Uuid, Vec<Statement>> = HashMap::new();
    for statement in statements {
        grouped.entry(statement.account_id).or_default().push(statement);
    }
    grouped
}
