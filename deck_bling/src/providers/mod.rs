//! Card data sources
//!
//! A data source turns card names into normalized printings. The provider is
//! chosen once, from [`PricingConfig`], and is opaque to everything above it.

pub mod manaql;
pub mod scryfall;
pub mod throttle;

use crate::config::{PricingConfig, ProviderKind};
use crate::error::Result;
use crate::models::Printing;
use async_trait::async_trait;
use mtg_common::{Exclusion, Finish};
use std::collections::HashMap;
use std::sync::Arc;

pub use manaql::ManaqlClient;
pub use scryfall::ScryfallClient;

/// A card whose lookup failed after the provider's own retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    pub name: String,
    pub error: String,
}

/// Result of a lookup. A name is either in `printings` (possibly with an
/// empty list), in `failures` or in `degraded`.
///
/// `failures` are lookups that count against the provider being reachable.
/// `degraded` names belong to a batch the provider gave up on; they are
/// reported as missing but never make a submission fail.
#[derive(Debug, Clone, Default)]
pub struct FetchedPrintings {
    pub printings: HashMap<String, Vec<Printing>>,
    pub failures: Vec<CardFailure>,
    pub degraded: Vec<CardFailure>,
}

impl FetchedPrintings {
    /// Names without a lookup result, failed or degraded
    pub fn failed_names(&self) -> impl Iterator<Item = &str> {
        self.failures
            .iter()
            .chain(&self.degraded)
            .map(|failure| failure.name.as_str())
    }

    pub fn is_failed(&self, name: &str) -> bool {
        self.failed_names().any(|failed| failed == name)
    }
}

#[async_trait]
pub trait CardDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Printings of each named card.
    ///
    /// `finishes` and `exclusions` may be used to narrow the query; callers
    /// still filter the returned printings themselves.
    async fn fetch_printings(
        &self,
        names: &[String],
        finishes: &[Finish],
        exclusions: &[Exclusion],
    ) -> Result<FetchedPrintings>;

    /// Card names starting with `prefix`
    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Build the configured data source
pub fn create_data_source(config: &PricingConfig) -> Result<Arc<dyn CardDataSource>> {
    log::info!("Using {} card data source", config.provider);
    Ok(match config.provider {
        ProviderKind::Manaql => Arc::new(ManaqlClient::new(config)?),
        ProviderKind::Scryfall => Arc::new(ScryfallClient::new(config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_follows_configured_provider() {
        let config = PricingConfig::default();
        assert_eq!(create_data_source(&config).unwrap().name(), "manaql");

        let config = PricingConfig {
            provider: ProviderKind::Scryfall,
            ..PricingConfig::default()
        };
        assert_eq!(create_data_source(&config).unwrap().name(), "scryfall");
    }

    #[test]
    fn failed_names_lists_failures_and_degraded() {
        let fetched = FetchedPrintings {
            printings: HashMap::new(),
            failures: vec![CardFailure {
                name: "Opt".to_string(),
                error: "timeout".to_string(),
            }],
            degraded: vec![CardFailure {
                name: "Ponder".to_string(),
                error: "HTTP error: 502".to_string(),
            }],
        };
        assert_eq!(fetched.failed_names().collect::<Vec<_>>(), vec!["Opt", "Ponder"]);
        assert!(fetched.is_failed("Ponder"));
        assert!(!fetched.is_failed("Brainstorm"));
    }
}
