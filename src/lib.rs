//! # Settlement Core
//!
//! Shared-expense ledgers for groups of participants, with net balances and
//! a minimal-transaction plan for settling them.
//!
//! ## Features
//!
//! - **Split validation**: positive totals, non-negative and unique shares that sum exactly to the total
//! - **Split distribution**: equal and percentage splits without rounding drift
//! - **Balance aggregation**: zero-sum net balances per group member over an optional time window
//! - **Settlement**: greedy largest-first matching, plus a naive baseline for comparison
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! All amounts are fixed-point [`BigDecimal`](bigdecimal::BigDecimal) values.
//!
//! ## Quick Start
//!
//! ```rust
//! use settlement_core::{settle, BalanceSheet, Strategy};
//! use bigdecimal::BigDecimal;
//!
//! let balances: BalanceSheet = vec![
//!     ("alice".to_string(), BigDecimal::from(10)),
//!     ("bob".to_string(), BigDecimal::from(-10)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let plan = settle(&balances, Strategy::Greedy);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].from, "bob");
//! ```

pub mod config;
pub mod ledger;
pub mod settlement;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use settlement::*;
pub use traits::*;
pub use types::*;
