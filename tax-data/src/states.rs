//! Static jurisdiction table: the 50 states plus the District of Columbia.

use std::fmt;

/// A state-level jurisdiction and the stem of its bracket data file.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct StateInfo {
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub file_stem: &'static str,
}

const fn state(
    abbreviation: &'static str,
    name: &'static str,
    file_stem: &'static str,
) -> StateInfo {
    StateInfo {
        abbreviation,
        name,
        file_stem,
    }
}

pub static STATES: [StateInfo; 51] = [
    state("AL", "Alabama", "alabama"),
    state("AK", "Alaska", "alaska"),
    state("AZ", "Arizona", "arizona"),
    state("AR", "Arkansas", "arkansas"),
    state("CA", "California", "california"),
    state("CO", "Colorado", "colorado"),
    state("CT", "Connecticut", "connecticut"),
    state("DE", "Delaware", "delaware"),
    state("DC", "District of Columbia", "district_of_columbia"),
    state("FL", "Florida", "florida"),
    state("GA", "Georgia", "georgia"),
    state("HI", "Hawaii", "hawaii"),
    state("ID", "Idaho", "idaho"),
    state("IL", "Illinois", "illinois"),
    state("IN", "Indiana", "indiana"),
    state("IA", "Iowa", "iowa"),
    state("KS", "Kansas", "kansas"),
    state("KY", "Kentucky", "kentucky"),
    state("LA", "Louisiana", "louisiana"),
    state("ME", "Maine", "maine"),
    state("MD", "Maryland", "maryland"),
    state("MA", "Massachusetts", "massachusetts"),
    state("MI", "Michigan", "michigan"),
    state("MN", "Minnesota", "minnesota"),
    state("MS", "Mississippi", "mississippi"),
    state("MO", "Missouri", "missouri"),
    state("MT", "Montana", "montana"),
    state("NE", "Nebraska", "nebraska"),
    state("NV", "Nevada", "nevada"),
    state("NH", "New Hampshire", "new_hampshire"),
    state("NJ", "New Jersey", "new_jersey"),
    state("NM", "New Mexico", "new_mexico"),
    state("NY", "New York", "new_york"),
    state("NC", "North Carolina", "north_carolina"),
    state("ND", "North Dakota", "north_dakota"),
    state("OH", "Ohio", "ohio"),
    state("OK", "Oklahoma", "oklahoma"),
    state("OR", "Oregon", "oregon"),
    state("PA", "Pennsylvania", "pennsylvania"),
    state("RI", "Rhode Island", "rhode_island"),
    state("SC", "South Carolina", "south_carolina"),
    state("SD", "South Dakota", "south_dakota"),
    state("TN", "Tennessee", "tennessee"),
    state("TX", "Texas", "texas"),
    state("UT", "Utah", "utah"),
    state("VT", "Vermont", "vermont"),
    state("VA", "Virginia", "virginia"),
    state("WA", "Washington", "washington"),
    state("WV", "West Virginia", "west_virginia"),
    state("WI", "Wisconsin", "wisconsin"),
    state("WY", "Wyoming", "wyoming"),
];

/// Looks up a state by its two-letter abbreviation, ignoring case and
/// surrounding whitespace.
pub fn lookup_state(abbreviation: &str) -> Option<&'static StateInfo> {
    let wanted = abbreviation.trim();
    STATES
        .iter()
        .find(|s| s.abbreviation.eq_ignore_ascii_case(wanted))
}

/// Where a bracket table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    Federal,
    State(&'static StateInfo),
}

impl Jurisdiction {
    /// Resolves a state abbreviation into a jurisdiction.
    pub fn state(abbreviation: &str) -> Option<Self> {
        lookup_state(abbreviation).map(Self::State)
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::State(info) => info.file_stem,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }

    /// Short label for summaries: "Federal" or the state abbreviation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Federal => "Federal",
            Self::State(info) => info.abbreviation,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Federal => f.write_str("Federal"),
            Self::State(info) => f.write_str(info.name),
        }
    }
}
