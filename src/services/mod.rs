pub mod account_service;
pub mod balance_service;
pub mod installment_service;
pub mod statement_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::{AccountChanges, AccountService};
pub use balance_service::BalanceService;
pub use installment_service::{
    InstallmentPlan, InstallmentService, MAX_CYCLE_MONTHS, MAX_INSTALLMENTS,
};
pub use statement_service::{
    BillingCycle, CardStats, PortfolioStats, StatementPayment, StatementService, StatementTotals,
    UnpaidStatementPolicy, UpcomingStatement,
};
pub use summary_service::{DailyTotal, PeriodSummary, SummaryService, TransactionFilter};
pub use transaction_service::{TransactionChanges, TransactionService};

pub type ServiceResult<T> = crate::errors::Result<T>;
