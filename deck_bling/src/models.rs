use crate::error::{BlingError, Result};
use crate::formatters::format_price;
use mtg_common::{CardType, Currency, Exclusion, Finish};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One decklist line after parsing and merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
}

impl LineItem {
    /// Unpinned line matching any printing
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            set: None,
            collector_number: None,
        }
    }

    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    pub fn with_collector_number(mut self, collector_number: impl Into<String>) -> Self {
        self.collector_number = Some(collector_number.into());
        self
    }

    /// Merge key: name, pinned set and collector number
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.name,
            self.set.as_deref().unwrap_or(""),
            self.collector_number.as_deref().unwrap_or("")
        )
    }
}

/// Provider prices of one printing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintingPrices {
    pub usd: Option<Decimal>,
    pub usd_foil: Option<Decimal>,
    pub usd_etched: Option<Decimal>,
    pub eur: Option<Decimal>,
    pub eur_foil: Option<Decimal>,
    pub eur_etched: Option<Decimal>,
}

/// Provider-independent printing of a card, as returned by every data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printing {
    pub id: String,
    pub card_name: String,
    pub card_type: CardType,
    pub set_name: String,
    pub set_code: String,
    pub collector_number: String,
    pub image: Option<String>,
    pub back_image: Option<String>,
    /// Finishes the provider reports for this printing
    pub finishes: Vec<Finish>,
    /// Serial-numbered promo, false when the provider cannot tell
    #[serde(default)]
    pub serialized: bool,
    pub prices: PrintingPrices,
}

/// Price and availability of one finish of a printing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPrice {
    pub name: Finish,
    pub price: Option<Decimal>,
    pub available: bool,
}

impl TreatmentPrice {
    /// Purchasable with a known price
    pub fn is_priced(&self) -> bool {
        self.available && self.price.is_some()
    }
}

/// One printing of a requested card, priced under the active policy.
///
/// `treatments` has exactly one entry per allowed finish, in policy order,
/// whether or not that finish exists on the printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOption {
    pub id: String,
    pub card_name: String,
    pub card_type: CardType,
    pub set_name: String,
    pub set_code: String,
    pub collector_number: String,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_image: Option<String>,
    pub quantity: u32,
    pub requested_set: Option<String>,
    pub requested_collector_number: Option<String>,
    pub selected: bool,
    pub treatments: Vec<TreatmentPrice>,
    pub selected_treatment: Option<Finish>,
}

impl CardOption {
    pub fn treatment(&self, finish: Finish) -> Option<&TreatmentPrice> {
        self.treatments.iter().find(|t| t.name == finish)
    }

    /// First finish that exists on this printing
    pub fn first_available(&self) -> Option<Finish> {
        self.treatments.iter().find(|t| t.available).map(|t| t.name)
    }

    /// Price of the selected treatment, None when unselected or unpriced
    pub fn selected_price(&self) -> Option<Decimal> {
        self.selected_treatment
            .and_then(|finish| self.treatment(finish))
            .and_then(|t| t.price)
    }

    pub fn formatted_price(&self) -> String {
        format_price(self.selected_price())
    }
}

/// A pricing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub decklist: Vec<LineItem>,
    /// Allowed finishes, never empty
    pub treatments: Vec<Finish>,
    pub local_currency: Currency,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl Submission {
    pub fn new(
        decklist: Vec<LineItem>,
        treatments: Vec<Finish>,
        local_currency: Currency,
        exclusions: Vec<Exclusion>,
    ) -> Result<Self> {
        let submission = Self {
            decklist,
            treatments,
            local_currency,
            exclusions,
        };
        submission.validate()?;
        Ok(submission)
    }

    pub fn validate(&self) -> Result<()> {
        if self.treatments.is_empty() {
            return Err(BlingError::InvalidSubmission(
                "at least one finish must be allowed".to_string(),
            ));
        }
        if let Some(item) = self.decklist.iter().find(|item| item.quantity == 0) {
            return Err(BlingError::InvalidSubmission(format!(
                "quantity of '{}' must be positive",
                item.name
            )));
        }
        Ok(())
    }

    /// Requested names in decklist order, without repeats
    pub fn card_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.decklist.len());
        for item in &self.decklist {
            if !names.contains(&item.name) {
                names.push(item.name.clone());
            }
        }
        names
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: u32,
    pub unique_cards: usize,
    pub selected_cards: usize,
    pub missing_cards: Vec<String>,
    pub num_missing_cards: usize,
}

/// Priced deck snapshot handed to the presentation layer.
///
/// Map iteration order is alphabetical and unrelated to decklist order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPricingResult {
    pub bling: BTreeMap<String, CardOption>,
    pub cards: BTreeMap<String, Vec<CardOption>>,
    pub total_price: Decimal,
    pub missing_prices: bool,
    pub stats: DeckStats,
}
