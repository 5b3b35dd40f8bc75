//! Pricing service: decklist in, priced bling selection out

use crate::aggregate;
use crate::cache::CardCache;
use crate::config::PricingConfig;
use crate::error::{BlingError, Result};
use crate::models::{CardOption, DeckPricingResult, LineItem, Submission};
use crate::normalize::{self, PricePolicy};
use crate::providers::{self, CardDataSource};
use crate::selection;
use mtg_common::Finish;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Facade over a card data source and its session cache
pub struct PricingService {
    source: Arc<dyn CardDataSource>,
    cache: CardCache,
    approximate_eur_etched: bool,
}

impl PricingService {
    pub fn new(source: Arc<dyn CardDataSource>, config: &PricingConfig) -> Self {
        Self {
            source,
            cache: CardCache::new(config.batch_size),
            approximate_eur_etched: config.approximate_eur_etched,
        }
    }

    /// Service backed by the provider named in the config
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        let source = providers::create_data_source(config)?;
        Ok(Self::new(source, config))
    }

    pub fn cache(&self) -> &CardCache {
        &self.cache
    }

    /// Price a submission.
    ///
    /// Cards whose lookup failed are reported as missing. If every card failed
    /// outright the provider is considered unavailable and the call fails;
    /// degraded batches never fail the call.
    pub async fn process_decklist(&self, submission: &Submission) -> Result<DeckPricingResult> {
        submission.validate()?;
        let names = submission.card_names();
        log::info!(
            "Pricing {} cards ({} lines) in {}",
            names.len(),
            submission.decklist.len(),
            submission.local_currency
        );

        let fetched = self
            .cache
            .get_or_fetch_printings(
                self.source.as_ref(),
                &names,
                &submission.treatments,
                &submission.exclusions,
            )
            .await?;

        if !names.is_empty() && fetched.failures.len() >= names.len() {
            let reason = fetched
                .failures
                .first()
                .map(|failure| failure.error.clone())
                .unwrap_or_default();
            return Err(BlingError::ProviderUnavailable(format!(
                "all {} cards failed to load from {}, first error: {}",
                names.len(),
                self.source.name(),
                reason
            )));
        }
        for failure in fetched.failures.iter().chain(&fetched.degraded) {
            log::warn!("No data for {}: {}", failure.name, failure.error);
        }

        let policy = PricePolicy {
            currency: submission.local_currency,
            approximate_eur_etched: self.approximate_eur_etched,
        };
        let mut cards: BTreeMap<String, Vec<CardOption>> = BTreeMap::new();
        for name in &names {
            let Some(printings) = fetched.printings.get(name) else {
                continue;
            };
            let item = merged_item(&submission.decklist, name);
            let options = selection::filter_printings(printings, &item, &submission.exclusions)
                .into_iter()
                .map(|printing| {
                    normalize::to_card_option(
                        printing,
                        &item,
                        item.quantity,
                        &submission.treatments,
                        &policy,
                    )
                })
                .collect();
            cards.insert(name.clone(), options);
        }

        let bling = selection::select_bling(&cards, &submission.treatments);
        for (name, winner) in &bling {
            let Some(finish) = winner.selected_treatment else {
                continue;
            };
            if let Some(options) = cards.get_mut(name) {
                selection::mark_selection(options, &winner.id, finish);
            }
        }

        let result = aggregate::aggregate(&submission.decklist, cards, bling);
        log::info!(
            "Selected {} of {} cards, total {}",
            result.stats.selected_cards,
            names.len(),
            result.total_price
        );
        Ok(result)
    }

    /// Manually pick a printing and finish for one card.
    ///
    /// An unavailable finish falls back to the first available one. The total
    /// is recomputed over the whole selection. Applying the same override twice
    /// gives the same result.
    pub fn update_selection(
        &self,
        result: &DeckPricingResult,
        card_name: &str,
        printing_id: &str,
        finish: Option<Finish>,
    ) -> Result<DeckPricingResult> {
        let options = result
            .cards
            .get(card_name)
            .ok_or_else(|| BlingError::NotFound(format!("card '{}'", card_name)))?;
        let target = options
            .iter()
            .find(|option| option.id == printing_id)
            .ok_or_else(|| {
                BlingError::NotFound(format!("printing '{}' of '{}'", printing_id, card_name))
            })?;

        let available = finish.filter(|f| target.treatment(*f).is_some_and(|t| t.available));
        let finish = available
            .or_else(|| target.first_available())
            .or(finish)
            .or_else(|| target.treatments.first().map(|t| t.name))
            .ok_or_else(|| {
                BlingError::NotFound(format!("finish for printing '{}'", printing_id))
            })?;
        if available.is_none() {
            log::debug!("Falling back to {} for {} ({})", finish, card_name, printing_id);
        }

        let mut updated = result.clone();
        if let Some(options) = updated.cards.get_mut(card_name) {
            selection::mark_selection(options, printing_id, finish);
            if let Some(selected) = options.iter().find(|option| option.id == printing_id) {
                updated.bling.insert(card_name.to_string(), selected.clone());
            }
        }
        aggregate::recompute(&mut updated);
        Ok(updated)
    }

    /// Total recomputed from the bling selection, independent of `total_price`
    pub fn price_of(result: &DeckPricingResult) -> Decimal {
        aggregate::bling_total(&result.bling)
    }

    /// Up to ten card names starting with `prefix`
    pub async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        self.cache
            .get_or_fetch_autocomplete(prefix, || self.source.autocomplete(prefix))
            .await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

/// Constraints of the first line naming `name`, with the summed quantity of all
/// lines naming it
fn merged_item(decklist: &[LineItem], name: &str) -> LineItem {
    let mut lines = decklist.iter().filter(|item| item.name == name);
    let mut merged = lines
        .next()
        .cloned()
        .unwrap_or_else(|| LineItem::new(name, 0));
    for item in lines {
        merged.quantity = merged.quantity.saturating_add(item.quantity);
    }
    merged
}
