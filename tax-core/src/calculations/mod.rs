//! Progressive tax calculation over normalized bracket tables.

pub mod common;
pub mod progressive;

pub use progressive::{compute_tax, effective_rate, tax_for_brackets};
