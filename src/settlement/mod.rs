//! Settlement planning over balance sheets

pub mod comparison;
pub mod matcher;

pub use comparison::*;
pub use matcher::*;
