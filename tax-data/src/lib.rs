//! Jurisdiction bracket data: the state table, the taxee JSON adapter and
//! the cache/remote sources that feed [`tax_core::BracketTable`].

pub mod error;
pub mod source;
pub mod states;
pub mod taxee;

pub use error::TaxDataError;
pub use source::{
    BracketSource, CachedSource, DEFAULT_BASE_URL, FileCache, RemoteSource, load_bracket_table,
};
pub use states::{Jurisdiction, STATES, StateInfo, lookup_state};
