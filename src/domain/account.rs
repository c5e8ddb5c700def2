use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::money::Money;
use crate::domain::wire;

/// A store of value or a credit line owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub initial_balance: Money,
    /// Balance stored by the server at creation time. Never updated
    /// afterwards, so it is advisory only; derive balances from the ledger.
    #[serde(rename = "currentBalance", default)]
    pub recorded_balance: Money,
    pub currency_code: String,
    #[serde(default, with = "wire::option_day")]
    pub closing_day: Option<u32>,
    #[serde(rename = "dueDay", default, with = "wire::option_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub limit_amount: Option<Money>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn new(owner_id: Uuid, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            kind,
            initial_balance: Money::ZERO,
            recorded_balance: Money::ZERO,
            currency_code: "BRL".into(),
            closing_day: None,
            due_date: None,
            limit_amount: None,
            is_active: true,
        }
    }

    pub fn with_initial_balance(mut self, amount: Money) -> Self {
        self.initial_balance = amount;
        self.recorded_balance = amount;
        self
    }

    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    /// Attaches the billing terms of a credit line.
    pub fn with_credit_terms(
        mut self,
        closing_day: u32,
        due_date: Option<NaiveDate>,
        limit: Money,
    ) -> Self {
        self.closing_day = Some(closing_day);
        self.due_date = due_date;
        self.limit_amount = Some(limit);
        self
    }

    pub fn is_credit_line(&self) -> bool {
        self.kind.is_credit_line()
    }

    /// Credit limit, treating an unset limit as zero.
    pub fn credit_limit(&self) -> Money {
        self.limit_amount.unwrap_or(Money::ZERO)
    }

    pub fn has_credit_fields(&self) -> bool {
        self.closing_day.is_some() || self.due_date.is_some() || self.limit_amount.is_some()
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Activatable for Account {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind.label())
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    /// Standard balance account (checking).
    Checking,
    CreditCard,
    Cash,
    Investment,
}

api_enum!(AccountKind {
    Checking => "CHECKING",
    CreditCard => "CREDIT_CARD",
    Cash => "CASH",
    Investment => "INVESTMENT",
});

impl AccountKind {
    pub fn is_credit_line(self) -> bool {
        matches!(self, AccountKind::CreditCard)
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::CreditCard => "Credit card",
            AccountKind::Cash => "Cash",
            AccountKind::Investment => "Investment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_shape() {
        let json = r#"{
            "id": "8c5a3c1e-8f0b-4a52-9d55-2d1c0f3b2f10",
            "userId": "0b0c7a52-3a0e-4d71-b1a6-6f8a9b8f3e21",
            "name": "Nubank",
            "type": "CREDIT_CARD  ",
            "initialBalance": 0,
            "currentBalance": "0.00",
            "currencyCode": "BRL",
            "closingDay": "5",
            "dueDay": "2024-02-12T00:00:00.000Z",
            "limitAmount": 1500.5,
            "isActive": true
        }"#;
        let account: Account = serde_json::from_str(json).expect("valid account");
        assert_eq!(account.kind, AccountKind::CreditCard);
        assert_eq!(account.closing_day, Some(5));
        assert_eq!(account.due_date, NaiveDate::from_ymd_opt(2024, 2, 12));
        assert_eq!(account.credit_limit(), Money::from_cents(150050));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = AccountKind::from_label("SAVINGS");
        assert!(err.is_none());
        assert_eq!(AccountKind::from_label(" cash "), Some(AccountKind::Cash));
    }
}
