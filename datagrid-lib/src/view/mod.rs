//! Formatting, sorting and totals over formatted rows

mod aggregate;
mod format;
mod sort;

pub use aggregate::*;
pub use format::*;
pub use sort::*;
