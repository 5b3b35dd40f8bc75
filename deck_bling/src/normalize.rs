//! Mapping of provider records into [`Printing`] and [`CardOption`]
//!
//! Each provider has exactly one entry point here. Everything downstream only
//! sees the canonical shapes.

use crate::models::{CardOption, LineItem, Printing, PrintingPrices, TreatmentPrice};
use crate::providers::manaql::ManaqlCard;
use mtg_common::{CardType, Currency, Finish, ScryfallCard};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// EUR etched estimate relative to the USD etched price
const EUR_ETCHED_FACTOR: Decimal = dec!(0.9);

/// Currency and estimation rules applied when pricing a printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PricePolicy {
    pub currency: Currency,
    /// Fill a missing EUR etched price from the USD etched price
    pub approximate_eur_etched: bool,
}

/// Parse a provider price string, None for missing or malformed values
pub fn parse_price(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(price) => Some(price),
        Err(e) => {
            log::warn!("Ignoring malformed price '{}': {}", raw, e);
            None
        }
    }
}

/// Deserialize a GraphQL Decimal scalar sent either as string or number
pub(crate) fn de_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Text(text)) => parse_price(Some(&text)),
        Some(RawPrice::Number(number)) => parse_price(Some(&number.to_string())),
        None => None,
    })
}

fn parse_finishes<'a>(names: impl IntoIterator<Item = &'a String>) -> Vec<Finish> {
    names
        .into_iter()
        .filter_map(|name| {
            let finish = Finish::from_provider(name);
            if finish.is_none() {
                log::debug!("Ignoring unknown finish '{}'", name);
            }
            finish
        })
        .collect()
}

/// One Scryfall search hit is one printing
pub fn from_scryfall(card: &ScryfallCard) -> Printing {
    let prices = &card.prices;
    Printing {
        id: card.id.clone(),
        card_name: card.name.clone(),
        card_type: card
            .type_line()
            .map(CardType::from_type_line)
            .unwrap_or_default(),
        set_name: card.set_name.clone(),
        set_code: card.set.clone(),
        collector_number: card.collector_number.clone(),
        image: card.image_url().map(str::to_string),
        back_image: card.back_image_url().map(str::to_string),
        finishes: parse_finishes(&card.finishes),
        serialized: card.is_serialized(),
        prices: PrintingPrices {
            usd: parse_price(prices.usd.as_deref()),
            usd_foil: parse_price(prices.usd_foil.as_deref()),
            usd_etched: parse_price(prices.usd_etched.as_deref()),
            eur: parse_price(prices.eur.as_deref()),
            eur_foil: parse_price(prices.eur_foil.as_deref()),
            eur_etched: parse_price(prices.eur_etched.as_deref()),
        },
    }
}

/// A ManaQL card node carries all of its printings
pub fn from_manaql(card: &ManaqlCard) -> Vec<Printing> {
    let card_name = card.name.clone().unwrap_or_default();
    let card_type = card
        .main_type
        .as_deref()
        .and_then(CardType::from_name)
        .unwrap_or_default();

    card.printing_nodes()
        .map(|printing| Printing {
            id: printing.id.clone(),
            card_name: card_name.clone(),
            card_type,
            set_name: printing.set_name.clone().unwrap_or_default(),
            set_code: printing.set.clone().unwrap_or_default(),
            collector_number: printing.collector_number.clone().unwrap_or_default(),
            image: printing.image_uri.clone(),
            back_image: printing.back_image_uri.clone(),
            finishes: parse_finishes(printing.finishes.iter().flatten()),
            serialized: false,
            prices: PrintingPrices {
                usd: printing.price_usd,
                usd_foil: printing.price_usd_foil,
                usd_etched: printing.price_usd_etched,
                eur: printing.price_eur,
                eur_foil: printing.price_eur_foil,
                eur_etched: printing.price_eur_etched,
            },
        })
        .collect()
}

/// Price of one finish of a printing in the policy currency
pub fn price_for(printing: &Printing, finish: Finish, policy: &PricePolicy) -> Option<Decimal> {
    let prices = &printing.prices;
    match (policy.currency, finish) {
        (Currency::Usd, Finish::Nonfoil) => prices.usd,
        (Currency::Usd, Finish::Foil) => prices.usd_foil,
        (Currency::Usd, Finish::Etched) => prices.usd_etched,
        (Currency::Eur, Finish::Nonfoil) => prices.eur,
        (Currency::Eur, Finish::Foil) => prices.eur_foil,
        (Currency::Eur, Finish::Etched) => prices.eur_etched.or_else(|| {
            if policy.approximate_eur_etched {
                prices
                    .usd_etched
                    .map(|usd| (usd * EUR_ETCHED_FACTOR).round_dp(2))
            } else {
                None
            }
        }),
    }
}

/// Build the option shown for one printing of a requested card
pub fn to_card_option(
    printing: &Printing,
    item: &LineItem,
    quantity: u32,
    treatments: &[Finish],
    policy: &PricePolicy,
) -> CardOption {
    CardOption {
        id: printing.id.clone(),
        card_name: printing.card_name.clone(),
        card_type: printing.card_type,
        set_name: printing.set_name.clone(),
        set_code: printing.set_code.clone(),
        collector_number: printing.collector_number.clone(),
        image: printing.image.clone(),
        back_image: printing.back_image.clone(),
        quantity,
        requested_set: item.set.clone(),
        requested_collector_number: item.collector_number.clone(),
        selected: false,
        treatments: treatments
            .iter()
            .map(|&finish| TreatmentPrice {
                name: finish,
                price: price_for(printing, finish, policy),
                available: printing.finishes.contains(&finish),
            })
            .collect(),
        selected_treatment: None,
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
