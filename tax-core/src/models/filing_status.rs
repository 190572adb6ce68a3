use std::fmt;

use serde::{Deserialize, Serialize};

/// Filing status selected once per run and used to index every bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedJoint,
        Self::MarriedSeparate,
        Self::HeadOfHousehold,
    ];

    /// Key used by raw bracket sources for this status.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married",
            Self::MarriedSeparate => "married_separately",
            Self::HeadOfHousehold => "head_of_household",
        }
    }

    pub fn parse_key(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married" => Some(Self::MarriedJoint),
            "married_separately" => Some(Self::MarriedSeparate),
            "head_of_household" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married, filing jointly",
            Self::MarriedSeparate => "Married, filing separately",
            Self::HeadOfHousehold => "Head of household",
        }
    }

    /// Position in the interactive menu, starting at 1.
    pub fn menu_number(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::MarriedJoint => 2,
            Self::MarriedSeparate => 3,
            Self::HeadOfHousehold => 4,
        }
    }

    pub fn from_menu_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.menu_number() == n)
    }

    /// Accepts a raw-source key or a menu number, ignoring case and
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::from_menu_number(n);
        }
        Self::parse_key(&trimmed)
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
