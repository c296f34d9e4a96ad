//! Expense categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ExpenseError;

/// The closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Flights, trains, taxis, fuel, parking.
    Transport,
    /// Hotels, hostels, homestays.
    Accommodation,
    /// Meals, snacks, drinks.
    Food,
    /// Tickets and admissions.
    Attraction,
    /// Souvenirs and purchases.
    Shopping,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Every category, in report order.
    pub const ALL: [Self; 6] = [
        Self::Transport,
        Self::Accommodation,
        Self::Food,
        Self::Attraction,
        Self::Shopping,
        Self::Other,
    ];

    /// Wire and storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Accommodation => "accommodation",
            Self::Food => "food",
            Self::Attraction => "attraction",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ExpenseError;

    /// Keys match exactly: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ExpenseError::UnknownCategory(s.to_string()))
    }
}

/// Category as read back from storage.
///
/// Rows written before the category set was enforced may carry arbitrary
/// strings; those are kept verbatim so they can be reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    /// One of the six categories.
    Known(ExpenseCategory),
    /// Anything else.
    Unrecognized(String),
}

impl CategoryKey {
    /// Classifies a raw key.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map_or_else(|_| Self::Unrecognized(raw.to_string()), Self::Known)
    }

    /// Returns the category when the key is recognized.
    #[must_use]
    pub const fn known(&self) -> Option<ExpenseCategory> {
        match self {
            Self::Known(c) => Some(*c),
            Self::Unrecognized(_) => None,
        }
    }

    /// Raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(c) => c.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<ExpenseCategory> for CategoryKey {
    fn from(category: ExpenseCategory) -> Self {
        Self::Known(category)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|raw| Self::parse(&raw))
    }
}
