//! Tenant-scoped personal-finance ledger.
//!
//! Every operation takes the id of the owning user and never reads or writes
//! rows belonging to anyone else. Balances and dashboard totals are derived
//! from `financials` on every call.

pub use accounts::{Account, AccountBalance};
pub use categories::Category;
pub use error::EngineError;
pub use financials::{Financial, FinancialKind, FinancialRow};
pub use ops::{
    CategoryExpense, DEFAULT_MAX_PAGE_SIZE, DEFAULT_OPERATION_TIMEOUT, Dashboard, Engine,
    EngineBuilder, FinancialListFilter, NewFinancial, Page, PageRequest, SortDirection, SortKey,
    WindowTotals,
};
pub use subcategories::Subcategory;
pub use users::User;

mod accounts;
mod categories;
mod error;
mod financials;
mod ops;
mod subcategories;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
