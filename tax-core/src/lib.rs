pub mod calculations;
pub mod error;
pub mod estimate;
pub mod loader;
pub mod models;

pub use calculations::{compute_tax, effective_rate, tax_for_brackets};
pub use error::TaxError;
pub use estimate::{EstimateSummary, JurisdictionEstimate};
pub use loader::normalize;
pub use models::*;
