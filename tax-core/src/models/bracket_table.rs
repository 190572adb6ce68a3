use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Bracket, FilingStatus, RawBracket};

/// Raw bracket data for one jurisdiction, keyed by filing-status key
/// (`"single"`, `"married"`, ...). Lists must be in ascending boundary order.
pub type RawBracketSource = HashMap<String, Vec<RawBracket>>;

/// Normalized brackets for one jurisdiction, per filing status.
///
/// Built once by the loader and read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    tables: BTreeMap<FilingStatus, Vec<Bracket>>,
}

impl BracketTable {
    pub(crate) fn from_map(tables: BTreeMap<FilingStatus, Vec<Bracket>>) -> Self {
        Self { tables }
    }

    pub fn brackets(
        &self,
        status: FilingStatus,
    ) -> Option<&[Bracket]> {
        self.tables.get(&status).map(Vec::as_slice)
    }

    pub fn statuses(&self) -> impl Iterator<Item = FilingStatus> + '_ {
        self.tables.keys().copied()
    }

    pub fn contains(
        &self,
        status: FilingStatus,
    ) -> bool {
        self.tables.contains_key(&status)
    }
}
