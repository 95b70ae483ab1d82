//! Binary outcome tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::MarketError;

/// One of the two complementary contracts of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// Both outcomes, YES first.
    pub const ALL: [Self; 2] = [Self::Yes, Self::No];

    /// Lowercase label used for metric labels.
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

impl FromStr for Outcome {
    type Err = MarketError;

    /// Accepts `yes`/`no`, `y`/`n` and the French `oui`/`non` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "oui" => Ok(Self::Yes),
            "no" | "n" | "non" => Ok(Self::No),
            _ => Err(MarketError::InvalidOutcome(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("YES".parse::<Outcome>(), Ok(Outcome::Yes));
        assert_eq!(" no ".parse::<Outcome>(), Ok(Outcome::No));
        assert_eq!("y".parse::<Outcome>(), Ok(Outcome::Yes));
    }

    #[test]
    fn test_unknown_tag_is_invalid_outcome() {
        let err = "MAYBE".parse::<Outcome>().unwrap_err();
        assert_eq!(err, MarketError::InvalidOutcome("MAYBE".to_string()));
    }

    #[test]
    fn test_parse_french_tags() {
        assert_eq!("OUI".parse::<Outcome>(), Ok(Outcome::Yes));
        assert_eq!("Non".parse::<Outcome>(), Ok(Outcome::No));
        assert!("ou".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_serializes_uppercase() {
        let json = serde_json::to_string(&Outcome::Yes).unwrap();
        assert_eq!(json, "\"YES\"");
    }
}
