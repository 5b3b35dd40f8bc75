//! In-memory card data source shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use deck_bling::{
    BlingError, CardDataSource, CardFailure, FetchedPrintings, Printing, PrintingPrices, Result,
};
use mtg_common::{CardType, Exclusion, Finish};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct StubSource {
    printings: HashMap<String, Vec<Printing>>,
    failing: Vec<String>,
    unreachable: bool,
    fetch_calls: AtomicUsize,
    autocomplete_calls: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, name: &str, printings: Vec<Printing>) -> Self {
        self.printings.insert(name.to_string(), printings);
        self
    }

    /// Lookups of `name` fail like an exhausted retry
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    /// Every fetch call returns an error
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn autocomplete_calls(&self) -> usize {
        self.autocomplete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardDataSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch_printings(
        &self,
        names: &[String],
        _finishes: &[Finish],
        _exclusions: &[Exclusion],
    ) -> Result<FetchedPrintings> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(BlingError::GraphQl("service unavailable".to_string()));
        }

        let mut fetched = FetchedPrintings::default();
        for name in names {
            if self.failing.contains(name) {
                fetched.failures.push(CardFailure {
                    name: name.clone(),
                    error: "retries exhausted".to_string(),
                });
            } else if let Some(printings) = self.printings.get(name) {
                fetched.printings.insert(name.clone(), printings.clone());
            }
        }
        Ok(fetched)
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>> {
        self.autocomplete_calls.fetch_add(1, Ordering::SeqCst);
        let mut names: Vec<String> = self
            .printings
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Printing with a single finish and its USD price
pub fn printing(
    id: &str,
    name: &str,
    set_code: &str,
    finish: Finish,
    usd: Option<Decimal>,
) -> Printing {
    let mut prices = PrintingPrices::default();
    match finish {
        Finish::Nonfoil => prices.usd = usd,
        Finish::Foil => prices.usd_foil = usd,
        Finish::Etched => prices.usd_etched = usd,
    }
    Printing {
        id: id.to_string(),
        card_name: name.to_string(),
        card_type: CardType::Instant,
        set_name: format!("Set {}", set_code.to_uppercase()),
        set_code: set_code.to_string(),
        collector_number: "1".to_string(),
        image: None,
        back_image: None,
        finishes: vec![finish],
        serialized: false,
        prices,
    }
}
