//! Decklist text parsing and export
//!
//! Accepts the common "quantity name" format, optionally pinned to a printing
//! with `(SET) 123` or to a set with `[SET]`.

use crate::error::Result;
use crate::models::{CardOption, DeckPricingResult, LineItem};
use lazy_static::lazy_static;
use mtg_common::Finish;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

lazy_static! {
    static ref CARD_LINE: Regex =
        Regex::new(r"^(\d+)\s+(.+?)(?:\s+\(([A-Z0-9]+)\)\s+(\d+))?(?:\s+\[([A-Z0-9]+)\])?$")
            .expect("card line pattern is valid");
}

/// Parser output including the lines that did not match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDecklist {
    pub items: Vec<LineItem>,
    /// Non-blank input lines that were dropped, trimmed
    pub rejected: Vec<String>,
}

fn parse_card_line(line: &str) -> Option<LineItem> {
    let caps = CARD_LINE.captures(line)?;
    let quantity: u32 = caps.get(1)?.as_str().parse().ok()?;
    if quantity == 0 {
        return None;
    }
    let name = caps.get(2)?.as_str().to_string();
    let set = caps.get(3).or_else(|| caps.get(5)).map(|m| m.as_str().to_string());
    let collector_number = caps.get(4).map(|m| m.as_str().to_string());

    Some(LineItem {
        name,
        quantity,
        set,
        collector_number,
    })
}

/// Parse a decklist, merging lines that pin the same printing.
///
/// Lines that do not match are dropped. Output follows the first occurrence of
/// each distinct (name, set, collector number) key.
pub fn parse_decklist(input: &str) -> Vec<LineItem> {
    parse_decklist_report(input).items
}

/// Same as [`parse_decklist`], but also reports the dropped lines
pub fn parse_decklist_report(input: &str) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();
    let mut keys: Vec<String> = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(item) = parse_card_line(line) else {
            log::debug!("Skipping unrecognised decklist line: {}", line);
            parsed.rejected.push(line.to_string());
            continue;
        };

        let key = item.key();
        match keys.iter().position(|k| *k == key) {
            Some(index) => {
                let existing = &mut parsed.items[index];
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => {
                keys.push(key);
                parsed.items.push(item);
            }
        }
    }

    parsed
}

/// Read and parse a decklist file
pub fn read_decklist<P: AsRef<Path>>(path: P) -> Result<Vec<LineItem>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut text = String::new();

    for line in reader.lines() {
        text.push_str(&line?);
        text.push('\n');
    }

    let items = parse_decklist(&text);
    log::info!(
        "Read {} decklist entries from {}",
        items.len(),
        path.as_ref().display()
    );
    Ok(items)
}

/// Moxfield-style export of the selected options, one line each
pub fn export_decklist(options: &[CardOption]) -> String {
    options
        .iter()
        .filter(|option| option.selected)
        .map(|option| {
            let foil = if option.selected_treatment == Some(Finish::Foil) {
                " *f*"
            } else {
                ""
            };
            format!(
                "{} {} ({}) {}{}",
                option.quantity,
                option.card_name,
                option.set_code.to_uppercase(),
                option.collector_number,
                foil
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Export the bling selection of a result in decklist order
pub fn export_result(result: &DeckPricingResult, decklist: &[LineItem]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for item in decklist {
        if !names.contains(&item.name.as_str()) {
            names.push(&item.name);
        }
    }
    let options: Vec<CardOption> = names
        .into_iter()
        .filter_map(|name| result.bling.get(name).cloned())
        .collect();
    export_decklist(&options)
}

#[cfg(test)]
#[path = "decklist_tests.rs"]
mod tests;
