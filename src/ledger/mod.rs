//! Ledger domain module
//!
//! Holds the in-memory customer registry and the pure balance computation.
//! Nothing in here knows about HTTP; handlers translate requests into calls
//! on [`Registry`] and [`Customer`].

mod balance;
mod customer;
mod error;
mod registry;

pub use balance::{compute_balance, BalanceBreakdown};
pub use customer::{CalendarZone, Customer, StatementEntry};
pub use error::LedgerError;
pub use registry::Registry;
