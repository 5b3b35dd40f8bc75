use crate::error::{Result, VocabularyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical treatment of a printed card.
///
/// An early integration also knew an "Etched Foil" treatment. It never made it
/// into the card data providers and is intentionally not a member here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Nonfoil,
    Foil,
    Etched,
}

impl Finish {
    /// Returns the provider name of the finish (e.g., "nonfoil", "foil")
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Nonfoil => "nonfoil",
            Finish::Foil => "foil",
            Finish::Etched => "etched",
        }
    }

    /// Returns the human readable label (e.g., "Normal", "Foil")
    pub fn label(&self) -> &'static str {
        match self {
            Finish::Nonfoil => "Normal",
            Finish::Foil => "Foil",
            Finish::Etched => "Etched",
        }
    }

    /// Parse a provider finish name. Only exact provider names match.
    pub fn from_provider(name: &str) -> Option<Self> {
        match name {
            "nonfoil" => Some(Finish::Nonfoil),
            "foil" => Some(Finish::Foil),
            "etched" => Some(Finish::Etched),
            _ => None,
        }
    }

    /// Returns all finishes in policy order
    pub fn all() -> &'static [Finish] {
        &[Finish::Nonfoil, Finish::Foil, Finish::Etched]
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Finish {
    type Err = VocabularyError;

    /// Accepts provider names and labels, case-insensitive ("normal" is nonfoil)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nonfoil" | "normal" => Ok(Finish::Nonfoil),
            "foil" => Ok(Finish::Foil),
            "etched" => Ok(Finish::Etched),
            _ => Err(VocabularyError::UnknownFinish(s.to_string())),
        }
    }
}

/// Currency a deck is priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            _ => Err(VocabularyError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Set code of the Secret Lair promotional product line
pub const SECRET_LAIR_SET_CODE: &str = "sld";

/// Printings removed from the eligible pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exclusion {
    /// Serial-numbered printings
    Serialized,
    /// Anything from the Secret Lair set
    SecretLair,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::Serialized => "serialized",
            Exclusion::SecretLair => "secret-lair",
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exclusion {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "serialized" => Ok(Exclusion::Serialized),
            "secret-lair" | "secretlair" | "sld" => Ok(Exclusion::SecretLair),
            _ => Err(VocabularyError::UnknownExclusion(s.to_string())),
        }
    }
}
