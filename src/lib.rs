//! Parsing of byte size and time duration literals, and the row
//! directives which aggregate them.

pub mod directive;
pub mod error;
pub mod row;
pub mod units;
