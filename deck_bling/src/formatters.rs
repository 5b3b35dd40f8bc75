use crate::models::{CardOption, DeckPricingResult, LineItem};
use mtg_common::{CardType, Currency, Finish};
use rust_decimal::Decimal;

/// Two-decimal price, "N/A" when unknown
pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(price) => format!("{:.2}", price.round_dp(2)),
        None => "N/A".to_string(),
    }
}

/// Human readable bling report, grouped by card type in display order.
///
/// Within a group cards follow decklist order; cards without an eligible
/// printing are listed at the end.
pub fn format_report(
    result: &DeckPricingResult,
    decklist: &[LineItem],
    currency: Currency,
) -> String {
    let mut output = String::new();
    let mut seen: Vec<&str> = Vec::new();
    let mut rows: Vec<(CardType, &CardOption)> = Vec::new();

    for item in decklist {
        if seen.contains(&item.name.as_str()) {
            continue;
        }
        seen.push(&item.name);
        if let Some(option) = result.bling.get(&item.name) {
            rows.push((option.card_type, option));
        }
    }
    // stable sort keeps decklist order inside a group
    rows.sort_by_key(|(card_type, _)| card_type.display_order());

    let mut current: Option<CardType> = None;
    for (card_type, option) in rows {
        if current != Some(card_type) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}:\n", card_type));
            current = Some(card_type);
        }
        let finish_info = match option.selected_treatment {
            Some(Finish::Nonfoil) | None => String::new(),
            Some(finish) => format!(" [{}]", finish),
        };
        output.push_str(&format!(
            "    {} x {} - {} ({}) #{}{} - {} {}\n",
            option.quantity,
            option.card_name,
            option.set_name,
            option.set_code.to_uppercase(),
            option.collector_number,
            finish_info,
            option.formatted_price(),
            currency.symbol(),
        ));
    }

    if !result.stats.missing_cards.is_empty() {
        output.push_str(&format!(
            "\nNo eligible printing ({}):\n",
            result.stats.num_missing_cards
        ));
        for name in &result.stats.missing_cards {
            output.push_str(&format!("    {}\n", name));
        }
    }

    output.push_str(&format!(
        "\nTotal: {} {} for {} cards ({} unique)\n",
        format_price(Some(result.total_price)),
        currency.symbol(),
        result.stats.total_cards,
        result.stats.unique_cards,
    ));
    if result.missing_prices {
        output.push_str("Some selected printings have no price; the total is incomplete.\n");
    }

    output
}

#[cfg(test)]
#[path = "formatters_tests.rs"]
mod tests;
