//! Tests for decklist parsing and export

use super::*;
use mtg_common::CardType;

fn names_and_quantities(items: &[LineItem]) -> Vec<(String, u32)> {
    items
        .iter()
        .map(|item| (item.name.clone(), item.quantity))
        .collect()
}

// ── parse_decklist ───────────────────────────────────────────────────

#[test]
fn merges_duplicate_lines() {
    let items = parse_decklist("2 Lightning Bolt\n1 Lightning Bolt\n4 Brainstorm");
    assert_eq!(
        names_and_quantities(&items),
        vec![
            ("Lightning Bolt".to_string(), 3),
            ("Brainstorm".to_string(), 4)
        ]
    );
    assert!(items.iter().all(|i| i.set.is_none() && i.collector_number.is_none()));
}

#[test]
fn line_order_only_changes_output_order() {
    let mut forward = parse_decklist("2 Lightning Bolt\n4 Brainstorm\n1 Lightning Bolt");
    let mut backward = parse_decklist("1 Lightning Bolt\n4 Brainstorm\n2 Lightning Bolt");
    forward.sort_by(|a, b| a.key().cmp(&b.key()));
    backward.sort_by(|a, b| a.key().cmp(&b.key()));
    assert_eq!(forward, backward);
}

#[test]
fn parses_set_and_collector_number() {
    let items = parse_decklist("1 Lightning Bolt (LEA) 162");
    assert_eq!(
        items,
        vec![LineItem {
            name: "Lightning Bolt".to_string(),
            quantity: 1,
            set: Some("LEA".to_string()),
            collector_number: Some("162".to_string()),
        }]
    );
}

#[test]
fn parses_alternate_set() {
    let items = parse_decklist("3 Counterspell [MH2]");
    assert_eq!(items[0].name, "Counterspell");
    assert_eq!(items[0].set.as_deref(), Some("MH2"));
    assert_eq!(items[0].collector_number, None);
}

#[test]
fn pinned_set_wins_over_alternate_set() {
    let items = parse_decklist("1 Opt (XLN) 65 [DOM]");
    assert_eq!(items[0].set.as_deref(), Some("XLN"));
    assert_eq!(items[0].collector_number.as_deref(), Some("65"));
}

#[test]
fn different_pins_do_not_merge() {
    let items = parse_decklist("1 Opt\n1 Opt (XLN) 65\n2 Opt [XLN]\n1 Opt (XLN) 65");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[1].quantity, 2);
    assert_eq!(items[1].collector_number.as_deref(), Some("65"));
    assert_eq!(items[2].quantity, 2);
    assert_eq!(items[2].collector_number, None);
}

#[test]
fn lowercase_set_stays_in_name() {
    // set codes must be upper case, anything else is part of the name
    let items = parse_decklist("1 Opt (xln) 65");
    assert_eq!(items[0].name, "Opt (xln) 65");
    assert_eq!(items[0].set, None);
}

#[test]
fn drops_malformed_lines_silently() {
    let items = parse_decklist("Deck\n\n   \nLightning Bolt\n4 Brainstorm\n0 Opt\nx2 Ponder");
    assert_eq!(names_and_quantities(&items), vec![("Brainstorm".to_string(), 4)]);
}

#[test]
fn trims_surrounding_whitespace() {
    let items = parse_decklist("   4   Brainstorm   \r\n");
    assert_eq!(names_and_quantities(&items), vec![("Brainstorm".to_string(), 4)]);
}

#[test]
fn report_lists_rejected_lines() {
    let parsed = parse_decklist_report("Deck\n1 Opt\n\nSideboard\n");
    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.rejected, vec!["Deck", "Sideboard"]);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(parse_decklist("").is_empty());
}

// ── read_decklist ────────────────────────────────────────────────────

#[test]
fn read_decklist_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Deck").unwrap();
    writeln!(file, "1 Sol Ring (CMM) 400").unwrap();
    writeln!(file, "1 Sol Ring (CMM) 400").unwrap();

    let items = read_decklist(file.path()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

#[test]
fn read_decklist_missing_file_is_io_error() {
    let result = read_decklist("/this/path/definitely/does/not/exist/deck.txt");
    assert!(matches!(result, Err(crate::error::BlingError::Io(_))));
}

// ── export_decklist ──────────────────────────────────────────────────

fn option(name: &str, set_code: &str, number: &str, finish: Option<Finish>) -> CardOption {
    CardOption {
        id: format!("{name}-{set_code}"),
        card_name: name.to_string(),
        card_type: CardType::Instant,
        set_name: "Some Set".to_string(),
        set_code: set_code.to_string(),
        collector_number: number.to_string(),
        image: None,
        back_image: None,
        quantity: 2,
        requested_set: None,
        requested_collector_number: None,
        selected: finish.is_some(),
        treatments: vec![],
        selected_treatment: finish,
    }
}

#[test]
fn export_marks_foils_and_uppercases_sets() {
    let options = vec![
        option("Lightning Bolt", "2xm", "129", Some(Finish::Foil)),
        option("Brainstorm", "ice", "61", Some(Finish::Nonfoil)),
        option("Opt", "xln", "65", None),
        option("Sol Ring", "cmm", "400", Some(Finish::Etched)),
    ];
    assert_eq!(
        export_decklist(&options),
        "2 Lightning Bolt (2XM) 129 *f*\n2 Brainstorm (ICE) 61\n2 Sol Ring (CMM) 400"
    );
}

#[test]
fn export_of_nothing_selected_is_empty() {
    assert_eq!(export_decklist(&[option("Opt", "xln", "65", None)]), "");
}

#[test]
fn export_result_follows_decklist_order() {
    let mut result = DeckPricingResult::default();
    result.bling.insert(
        "Brainstorm".to_string(),
        option("Brainstorm", "ice", "61", Some(Finish::Nonfoil)),
    );
    result.bling.insert(
        "Opt".to_string(),
        option("Opt", "xln", "65", Some(Finish::Foil)),
    );
    let decklist = vec![LineItem::new("Opt", 2), LineItem::new("Brainstorm", 2)];
    assert_eq!(
        export_result(&result, &decklist),
        "2 Opt (XLN) 65 *f*\n2 Brainstorm (ICE) 61"
    );
}
