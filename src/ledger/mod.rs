//! Ledger module containing expense entry handling and balance aggregation

pub mod balances;
pub mod core;
pub mod distribution;
pub mod expense;
pub mod validation;

pub use balances::*;
pub use self::core::*;
pub use distribution::*;
pub use expense::*;
pub use validation::*;
