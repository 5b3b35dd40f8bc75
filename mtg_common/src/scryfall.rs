//! Scryfall record shapes shared by the pricing tools

use serde::{Deserialize, Serialize};

/// Scryfall card response (one printing)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub prices: ScryfallPrices,
    /// Provider finish names ("nonfoil", "foil", "etched")
    #[serde(default)]
    pub finishes: Vec<String>,
    /// Promotion markers such as "serialized"
    #[serde(default)]
    pub promo_types: Vec<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

/// Prices as decimal strings, null when Scryfall has no figure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ScryfallPrices {
    #[serde(default)]
    pub usd: Option<String>,
    #[serde(default)]
    pub usd_foil: Option<String>,
    #[serde(default)]
    pub usd_etched: Option<String>,
    #[serde(default)]
    pub eur: Option<String>,
    #[serde(default)]
    pub eur_foil: Option<String>,
    #[serde(default)]
    pub eur_etched: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

impl ScryfallCard {
    /// Get the primary image URL (normal size)
    pub fn image_url(&self) -> Option<&str> {
        // Try direct image_uris first
        if let Some(uri) = self.image_uris.as_ref().and_then(|u| u.normal.as_deref()) {
            return Some(uri);
        }
        // For double-faced cards, get front face image
        self.face_image(0)
    }

    /// Back face image of a double-faced card
    pub fn back_image_url(&self) -> Option<&str> {
        self.face_image(1)
    }

    fn face_image(&self, index: usize) -> Option<&str> {
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.get(index))
            .and_then(|face| face.image_uris.as_ref())
            .and_then(|uris| uris.normal.as_deref())
    }

    pub fn is_serialized(&self) -> bool {
        self.promo_types.iter().any(|p| p == "serialized")
    }

    /// Type line of the card, falling back to the front face
    pub fn type_line(&self) -> Option<&str> {
        self.type_line.as_deref().or_else(|| {
            self.card_faces
                .as_ref()
                .and_then(|faces| faces.first())
                .and_then(|face| face.type_line.as_deref())
        })
    }
}

/// Paginated list envelope of /cards/search
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScryfallList {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<u64>,
}

/// Catalog envelope of /cards/autocomplete
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScryfallAutocomplete {
    #[serde(default)]
    pub total_values: u64,
    #[serde(default)]
    pub data: Vec<String>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScryfallError {
    pub status: u16,
    pub code: String,
    pub details: String,
}
