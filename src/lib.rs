#![doc(test(attr(deny(warnings))))]

//! Wallet Core holds the client-side rules of a personal-finance app:
//! derived account balances, credit-card statements and limits, installment
//! splitting, and spending summaries. Fetching and persisting the ledger is
//! left to the host application.

pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod services;
pub mod snapshot;
pub mod utils;

pub use crate::errors::{LedgerError, Result};
pub use crate::snapshot::{BalanceDisplay, LedgerSnapshot};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Wallet Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
