pub mod account;
pub mod category;
pub mod common;
pub mod money;
pub mod responsible;
pub mod statement;
pub mod transaction;
pub mod wire;

pub use account::{Account, AccountKind};
pub use category::{categories_for_kind, Category, CategoryKind};
pub use common::{
    active, find_by_id, Activatable, DateWindow, Displayable, Identifiable, NamedEntity,
};
pub use money::Money;
pub use responsible::Responsible;
pub use statement::{Statement, StatementStatus};
pub use transaction::{
    BalanceEffect, Transaction, TransactionKind, TransactionStatus,
    COUNT_TRANSFERS_AND_ADJUSTMENTS,
};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use uuid;
