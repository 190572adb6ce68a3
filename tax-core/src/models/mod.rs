mod bracket_table;
mod filing_status;
mod tax_bracket;

pub use bracket_table::{BracketTable, RawBracketSource};
pub use filing_status::FilingStatus;
pub use tax_bracket::{Bracket, RawBracket, RawRate};
