//! Totals and statistics of a priced deck

use crate::models::{CardOption, DeckPricingResult, DeckStats, LineItem};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sum of price x quantity over the selected options; unpriced count as zero.
///
/// Saturates at `Decimal::MAX` instead of overflowing.
pub fn bling_total(bling: &BTreeMap<String, CardOption>) -> Decimal {
    bling.values().fold(Decimal::ZERO, |total, option| {
        let line = option
            .selected_price()
            .unwrap_or_default()
            .checked_mul(Decimal::from(option.quantity));
        match line.and_then(|line| total.checked_add(line)) {
            Some(total) => total,
            None => {
                log::warn!("Deck total overflowed at {}", option.card_name);
                Decimal::MAX
            }
        }
    })
}

/// Whether any selected option lacks a price
pub fn has_missing_prices(bling: &BTreeMap<String, CardOption>) -> bool {
    bling.values().any(|option| option.selected_price().is_none())
}

/// Decklist names without a bling entry, in decklist order
pub fn missing_cards(decklist: &[LineItem], bling: &BTreeMap<String, CardOption>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for item in decklist {
        if !bling.contains_key(&item.name) && !missing.contains(&item.name) {
            missing.push(item.name.clone());
        }
    }
    missing
}

fn stats(
    cards: &BTreeMap<String, Vec<CardOption>>,
    bling: &BTreeMap<String, CardOption>,
    missing_cards: Vec<String>,
) -> DeckStats {
    DeckStats {
        total_cards: bling
            .values()
            .fold(0u32, |total, option| total.saturating_add(option.quantity)),
        unique_cards: cards.len(),
        selected_cards: bling.values().filter(|option| option.selected).count(),
        num_missing_cards: missing_cards.len(),
        missing_cards,
    }
}

/// Build the result snapshot for a decklist
pub fn aggregate(
    decklist: &[LineItem],
    cards: BTreeMap<String, Vec<CardOption>>,
    bling: BTreeMap<String, CardOption>,
) -> DeckPricingResult {
    let missing = missing_cards(decklist, &bling);
    DeckPricingResult {
        total_price: bling_total(&bling),
        missing_prices: has_missing_prices(&bling),
        stats: stats(&cards, &bling, missing),
        cards,
        bling,
    }
}

/// Recompute totals and stats after the bling map changed.
///
/// Missing cards keep their previous order, minus the ones now selected.
pub fn recompute(result: &mut DeckPricingResult) {
    let mut missing = std::mem::take(&mut result.stats.missing_cards);
    missing.retain(|name| !result.bling.contains_key(name));

    result.total_price = bling_total(&result.bling);
    result.missing_prices = has_missing_prices(&result.bling);
    result.stats = stats(&result.cards, &result.bling, missing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreatmentPrice;
    use mtg_common::{CardType, Finish};
    use rust_decimal_macros::dec;

    fn selected(name: &str, quantity: u32, price: Option<Decimal>) -> CardOption {
        CardOption {
            id: format!("{name}-id"),
            card_name: name.to_string(),
            card_type: CardType::Instant,
            set_name: "Test Set".to_string(),
            set_code: "tst".to_string(),
            collector_number: "1".to_string(),
            image: None,
            back_image: None,
            quantity,
            requested_set: None,
            requested_collector_number: None,
            selected: true,
            treatments: vec![TreatmentPrice {
                name: Finish::Foil,
                price,
                available: true,
            }],
            selected_treatment: Some(Finish::Foil),
        }
    }

    fn bling_of(options: Vec<CardOption>) -> BTreeMap<String, CardOption> {
        options
            .into_iter()
            .map(|option| (option.card_name.clone(), option))
            .collect()
    }

    #[test]
    fn total_is_price_times_quantity() {
        let bling = bling_of(vec![
            selected("Lightning Bolt", 4, Some(dec!(3.25))),
            selected("Opt", 2, Some(dec!(0.10))),
        ]);
        assert_eq!(bling_total(&bling), dec!(13.20));
        assert!(!has_missing_prices(&bling));
    }

    #[test]
    fn unpriced_selection_counts_zero_and_is_flagged() {
        let bling = bling_of(vec![
            selected("Lightning Bolt", 4, Some(dec!(3.25))),
            selected("Opt", 2, None),
        ]);
        assert_eq!(bling_total(&bling), dec!(13.00));
        assert!(has_missing_prices(&bling));
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let bling = bling_of(vec![
            selected("Lightning Bolt", u32::MAX, Some(Decimal::MAX)),
            selected("Opt", 2, Some(dec!(0.10))),
        ]);
        assert_eq!(bling_total(&bling), Decimal::MAX);
    }

    #[test]
    fn stats_count_bling_and_missing_cards() {
        let decklist = vec![
            LineItem::new("Nonexistent Card", 1),
            LineItem::new("Lightning Bolt", 4),
            LineItem::new("Opt", 2),
        ];
        let bling = bling_of(vec![selected("Lightning Bolt", 4, Some(dec!(1)))]);
        let mut cards = BTreeMap::new();
        cards.insert("Lightning Bolt".to_string(), vec![bling["Lightning Bolt"].clone()]);
        cards.insert("Opt".to_string(), vec![]);

        let result = aggregate(&decklist, cards, bling);
        assert_eq!(result.total_price, dec!(4));
        assert_eq!(result.stats.total_cards, 4);
        assert_eq!(result.stats.unique_cards, 2);
        assert_eq!(result.stats.selected_cards, 1);
        assert_eq!(result.stats.missing_cards, vec!["Nonexistent Card", "Opt"]);
        assert_eq!(result.stats.num_missing_cards, 2);
    }

    #[test]
    fn recompute_matches_independent_sum() {
        let mut result = DeckPricingResult::default();
        result.bling = bling_of(vec![
            selected("A", 3, Some(dec!(1.11))),
            selected("B", 1, None),
            selected("C", 7, Some(dec!(0.05))),
        ]);
        result.stats.missing_cards = vec!["D".to_string(), "B".to_string()];
        recompute(&mut result);

        let expected: Decimal = result
            .bling
            .values()
            .map(|o| o.selected_price().unwrap_or(Decimal::ZERO) * Decimal::from(o.quantity))
            .sum();
        assert_eq!(result.total_price, expected);
        assert_eq!(result.total_price, dec!(3.68));
        assert!(result.missing_prices);
        assert_eq!(result.stats.missing_cards, vec!["D"]);
        assert_eq!(result.stats.total_cards, 11);
    }
}
