//! Domain types representing transaction categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::transaction::TransactionKind;

/// Classifies the purpose of a transaction for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "parentCategoryId", default)]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(owner_id: Uuid, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            icon: None,
            color: None,
            parent_id: None,
            kind,
        }
    }

    /// Whether attaching this category to a `kind` transaction makes sense
    /// for reporting. Not enforced when storing.
    pub fn fits(&self, kind: TransactionKind) -> bool {
        self.kind == CategoryKind::for_transaction(kind)
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

api_enum!(CategoryKind {
    Income => "INCOME",
    Expense => "EXPENSE",
});

impl CategoryKind {
    /// Income categories label incomes; every other kind is offered expense
    /// categories.
    pub fn for_transaction(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => CategoryKind::Income,
            _ => CategoryKind::Expense,
        }
    }
}

/// Categories appropriate for a transaction of `kind`.
pub fn categories_for_kind(categories: &[Category], kind: TransactionKind) -> Vec<&Category> {
    let wanted = CategoryKind::for_transaction(kind);
    categories.iter().filter(|cat| cat.kind == wanted).collect()
}
