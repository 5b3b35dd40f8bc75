//! Engine configuration
//!
//! Defaults match the public Scryfall etiquette and the ManaQL query limits.
//! `PricingConfig::from_env` overlays `DECK_BLING_*` environment variables.

use crate::error::{BlingError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const SCRYFALL_BASE_URL: &str = "https://api.scryfall.com";
pub const MANAQL_URL: &str = "https://api.manaql.com";
pub const USER_AGENT: &str = "D2D-Automations-DeckBling/1.0";

/// Which card data provider backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Batched GraphQL queries against ManaQL
    #[default]
    Manaql,
    /// Per-card paginated searches against the Scryfall REST API
    Scryfall,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Manaql => f.write_str("manaql"),
            ProviderKind::Scryfall => f.write_str("scryfall"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = BlingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "manaql" => Ok(ProviderKind::Manaql),
            "scryfall" => Ok(ProviderKind::Scryfall),
            other => Err(BlingError::Config(format!("unknown provider '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub provider: ProviderKind,
    pub scryfall_base_url: String,
    pub manaql_url: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    /// Minimum spacing between two outbound Scryfall requests
    pub min_request_interval: Duration,
    /// Attempts per Scryfall request on transient failures
    pub max_attempts: u32,
    /// Backoff unit; attempt n waits n * retry_backoff
    pub retry_backoff: Duration,
    /// Wait after a 429 without a Retry-After header
    pub rate_limit_wait: Duration,
    /// 429 responses tolerated per request before giving up
    pub max_rate_limit_retries: u32,
    /// Card names per batched query (and per cache sub-batch)
    pub batch_size: usize,
    pub printings_per_card: usize,
    pub autocomplete_limit: usize,
    /// Fill a missing EUR etched price with 0.9 x the USD etched price
    pub approximate_eur_etched: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            scryfall_base_url: SCRYFALL_BASE_URL.to_string(),
            manaql_url: MANAQL_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_millis(75),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(1000),
            rate_limit_wait: Duration::from_millis(1000),
            max_rate_limit_retries: 10,
            batch_size: 100,
            printings_per_card: 750,
            autocomplete_limit: 10,
            approximate_eur_etched: false,
        }
    }
}

impl PricingConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_vars(std::env::vars())
    }

    /// Overlay `DECK_BLING_*` variables from any source
    pub fn with_vars<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "DECK_BLING_PROVIDER" => self.provider = value.parse()?,
                "DECK_BLING_USE_SCRYFALL" => {
                    if parse_flag(&key, &value)? {
                        self.provider = ProviderKind::Scryfall;
                    }
                }
                "DECK_BLING_SCRYFALL_URL" => {
                    self.scryfall_base_url = value.trim_end_matches('/').to_string()
                }
                "DECK_BLING_MANAQL_URL" => self.manaql_url = value,
                "DECK_BLING_APPROXIMATE_EUR_ETCHED" => {
                    self.approximate_eur_etched = parse_flag(&key, &value)?
                }
                _ => {}
            }
        }
        log::debug!("Pricing config: provider={}", self.provider);
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BlingError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
