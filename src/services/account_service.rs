use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Account, Money};
use crate::errors::LedgerError;

use super::ServiceResult;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;

/// Edits an owner may apply to an existing account. Kind and owner are fixed.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub currency_code: Option<String>,
    pub closing_day: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub limit_amount: Option<Money>,
    pub is_active: Option<bool>,
}

pub struct AccountService;

impl AccountService {
    /// Checks field rules and the credit-line/kind pairing.
    pub fn validate(account: &Account) -> ServiceResult<()> {
        let name_len = account.name.trim().chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(LedgerError::validation(
                "name",
                format!("must have between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
            ));
        }
        let code = account.currency_code.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LedgerError::validation(
                "currencyCode",
                format!("`{code}` is not a 3-letter currency code"),
            ));
        }
        if account.initial_balance.is_negative() {
            return Err(LedgerError::validation(
                "initialBalance",
                "cannot be negative",
            ));
        }
        if account.is_credit_line() {
            if let Some(day) = account.closing_day {
                if !(1..=31).contains(&day) {
                    return Err(LedgerError::validation(
                        "closingDay",
                        format!("{day} is not a day of month"),
                    ));
                }
            }
            if account.credit_limit().is_negative() {
                return Err(LedgerError::validation("limitAmount", "cannot be negative"));
            }
        } else if account.has_credit_fields() {
            return Err(LedgerError::invariant(format!(
                "{} account `{}` cannot carry closing day, due date or limit",
                account.kind.label(),
                account.name
            )));
        }
        Ok(())
    }

    /// Returns a normalized, validated copy ready to be sent for creation.
    pub fn prepare(mut account: Account) -> ServiceResult<Account> {
        account.name = account.name.trim().to_string();
        account.currency_code = account.currency_code.trim().to_ascii_uppercase();
        Self::validate(&account)?;
        Ok(account)
    }

    /// Applies `changes` to a copy of `account` and validates the result.
    pub fn apply_edit(account: &Account, changes: AccountChanges) -> ServiceResult<Account> {
        let mut updated = account.clone();
        if let Some(name) = changes.name {
            updated.name = name;
        }
        if let Some(code) = changes.currency_code {
            updated.currency_code = code;
        }
        if changes.closing_day.is_some() {
            updated.closing_day = changes.closing_day;
        }
        if changes.due_date.is_some() {
            updated.due_date = changes.due_date;
        }
        if changes.limit_amount.is_some() {
            updated.limit_amount = changes.limit_amount;
        }
        if let Some(active) = changes.is_active {
            updated.is_active = active;
        }
        let updated = Self::prepare(updated)?;
        debug!(account = %updated.id, "account edit validated");
        Ok(updated)
    }

    /// Soft-deactivates the account; its history stays in the ledger.
    pub fn deactivate(account: &Account) -> Account {
        let mut updated = account.clone();
        updated.is_active = false;
        updated
    }
}
