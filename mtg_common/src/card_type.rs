//! Coarse card type classification
//!
//! Decklists are grouped by a single main type per card. The canonical
//! strategy looks for the first matching type word in the full type line.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardType {
    Planeswalker,
    Battle,
    Land,
    Creature,
    Artifact,
    Enchantment,
    Sorcery,
    Instant,
    #[default]
    Unknown,
}

/// Substring rules, first match wins
const TYPE_RULES: &[(&str, CardType)] = &[
    ("Planeswalker", CardType::Planeswalker),
    ("Battle", CardType::Battle),
    ("Land", CardType::Land),
    ("Creature", CardType::Creature),
    ("Artifact", CardType::Artifact),
    ("Enchantment", CardType::Enchantment),
    ("Sorcery", CardType::Sorcery),
    ("Instant", CardType::Instant),
];

/// Compound type strings of the older lookup-table strategy
const TYPE_TABLE: &[(&str, CardType)] = &[
    ("Artifact Creature", CardType::Creature),
    ("Artifact Land", CardType::Land),
    ("Basic Land", CardType::Land),
    ("Basic Snow Land", CardType::Land),
    ("Enchantment Creature", CardType::Creature),
    ("Enchantment Land", CardType::Land),
    ("Land Creature", CardType::Land),
    ("Legendary Land", CardType::Land),
    ("Legendary Artifact", CardType::Artifact),
    ("Legendary Enchantment", CardType::Enchantment),
    ("Legendary Artifact Creature", CardType::Creature),
    ("Legendary Creature", CardType::Creature),
    ("Legendary Planeswalker", CardType::Planeswalker),
];

impl CardType {
    /// Classify a free-text type line (e.g. "Legendary Creature — Elf Druid")
    pub fn from_type_line(type_line: &str) -> Self {
        TYPE_RULES
            .iter()
            .find(|(needle, _)| type_line.contains(needle))
            .map(|(_, card_type)| *card_type)
            .unwrap_or(CardType::Unknown)
    }

    /// Classify using the compound-type lookup table.
    ///
    /// Only the front face and the part before the subtype dash are looked at.
    /// Types missing from the table are matched by their plain name.
    pub fn from_type_table(type_line: &str) -> Self {
        let main_type = type_line
            .split(" // ")
            .next()
            .unwrap_or(type_line)
            .split(" — ")
            .next()
            .unwrap_or(type_line)
            .trim();

        TYPE_TABLE
            .iter()
            .find(|(compound, _)| *compound == main_type)
            .map(|(_, card_type)| *card_type)
            .or_else(|| Self::from_name(main_type))
            .unwrap_or_else(|| {
                log::debug!("No card type for '{}'", type_line);
                CardType::Unknown
            })
    }

    /// Parse a plain type name as reported by structured providers ("Creature")
    pub fn from_name(name: &str) -> Option<Self> {
        TYPE_RULES
            .iter()
            .find(|(type_name, _)| type_name.eq_ignore_ascii_case(name.trim()))
            .map(|(_, card_type)| *card_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Planeswalker => "Planeswalker",
            CardType::Battle => "Battle",
            CardType::Land => "Land",
            CardType::Creature => "Creature",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Sorcery => "Sorcery",
            CardType::Instant => "Instant",
            CardType::Unknown => "Unknown",
        }
    }

    /// Position of the type when a deck is displayed grouped by type
    pub fn display_order(&self) -> u8 {
        match self {
            CardType::Battle => 0,
            CardType::Planeswalker => 1,
            CardType::Creature => 2,
            CardType::Instant => 3,
            CardType::Sorcery => 4,
            CardType::Artifact => 5,
            CardType::Enchantment => 6,
            CardType::Land => 7,
            CardType::Unknown => 8,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
