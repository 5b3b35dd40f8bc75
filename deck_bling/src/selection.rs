//! Printing filters and "most expensive eligible" selection
//!
//! Everything here is a pure function of its inputs so a selection can be
//! recomputed after a manual override.

use crate::models::{CardOption, LineItem, Printing};
use mtg_common::finish::SECRET_LAIR_SET_CODE;
use mtg_common::{Exclusion, Finish};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Whether a printing satisfies the pinned set and collector number of a line.
///
/// The pinned set matches either the set name or the set code, ignoring case.
pub fn matches_pin(printing: &Printing, item: &LineItem) -> bool {
    if let Some(set) = &item.set {
        let set_matches = printing.set_name.eq_ignore_ascii_case(set)
            || printing.set_code.eq_ignore_ascii_case(set);
        if !set_matches {
            return false;
        }
    }
    if let Some(number) = &item.collector_number {
        if printing.collector_number != *number {
            return false;
        }
    }
    true
}

/// Whether any exclusion rule rejects a printing
pub fn is_excluded(printing: &Printing, exclusions: &[Exclusion]) -> bool {
    exclusions.iter().any(|exclusion| match exclusion {
        Exclusion::Serialized => printing.serialized,
        Exclusion::SecretLair => printing.set_code.eq_ignore_ascii_case(SECRET_LAIR_SET_CODE),
    })
}

/// Printings eligible for a line item, in provider order
pub fn filter_printings<'a>(
    printings: &'a [Printing],
    item: &LineItem,
    exclusions: &[Exclusion],
) -> Vec<&'a Printing> {
    printings
        .iter()
        .filter(|printing| matches_pin(printing, item) && !is_excluded(printing, exclusions))
        .collect()
}

/// Most expensive eligible (option, finish) pair of one card.
///
/// A pair is eligible when the finish is allowed, exists on the printing and
/// has a price. Scan order is option order, then treatment order, and only a
/// strictly higher price replaces the current winner.
pub fn select_most_expensive(
    options: &[CardOption],
    treatments: &[Finish],
) -> Option<CardOption> {
    let mut best: Option<(usize, Finish, Decimal)> = None;

    for (index, option) in options.iter().enumerate() {
        for treatment in &option.treatments {
            if !treatments.contains(&treatment.name) || !treatment.available {
                continue;
            }
            let Some(price) = treatment.price else {
                continue;
            };
            if best.map_or(true, |(_, _, max)| price > max) {
                best = Some((index, treatment.name, price));
            }
        }
    }

    best.map(|(index, finish, _)| {
        let mut winner = options[index].clone();
        winner.selected = true;
        winner.selected_treatment = Some(finish);
        winner
    })
}

/// Winning option per card; cards without an eligible pair are absent
pub fn select_bling(
    cards: &BTreeMap<String, Vec<CardOption>>,
    treatments: &[Finish],
) -> BTreeMap<String, CardOption> {
    cards
        .iter()
        .filter_map(|(name, options)| {
            select_most_expensive(options, treatments).map(|winner| (name.clone(), winner))
        })
        .collect()
}

/// Mark one option of a card as selected with `finish` and clear the others
pub fn mark_selection(options: &mut [CardOption], id: &str, finish: Finish) {
    for option in options.iter_mut() {
        if option.id == id {
            option.selected = true;
            option.selected_treatment = Some(finish);
        } else {
            option.selected = false;
            option.selected_treatment = None;
        }
    }
}
