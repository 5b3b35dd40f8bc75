//! ManaQL GraphQL client
//!
//! Card names are looked up in batches; finish and set exclusion filters are
//! part of the query so the server only returns eligible printings.

use super::{CardDataSource, CardFailure, FetchedPrintings};
use crate::config::PricingConfig;
use crate::error::{BlingError, Result};
use crate::normalize;
use async_trait::async_trait;
use mtg_common::finish::SECRET_LAIR_SET_CODE;
use mtg_common::{Exclusion, Finish};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const CARDS_QUERY: &str = r#"
query Cards($first: Int, $filter: CardFilter, $printingsFirst: Int, $printingFilters: [PrintingFilter!]) {
  cards(first: $first, filter: $filter) {
    edges {
      node {
        id
        name
        mainType
        printings(first: $printingsFirst, filters: $printingFilters) {
          edges {
            node {
              id
              set
              setName
              collectorNumber
              finishes
              imageUri
              backImageUri
              priceUsd
              priceUsdFoil
              priceUsdEtched
              priceEur
              priceEurFoil
              priceEurEtched
            }
          }
        }
      }
    }
  }
}
"#;

const AUTOCOMPLETE_QUERY: &str = r#"
query Autocomplete($filter: CardFilter!, $first: Int) {
  cards(filter: $filter, first: $first) {
    edges {
      node {
        name
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CardsData {
    cards: Option<Connection<ManaqlCard>>,
}

/// Relay-style connection; every level may be null
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Option<Vec<Option<Edge<T>>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges
            .iter()
            .flatten()
            .flatten()
            .filter_map(|edge| edge.node.as_ref())
    }
}

/// ManaQL card node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManaqlCard {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    /// Single main type such as "Creature"
    pub main_type: Option<String>,
    pub printings: Option<Connection<ManaqlPrinting>>,
}

impl ManaqlCard {
    pub fn printing_nodes(&self) -> impl Iterator<Item = &ManaqlPrinting> {
        self.printings.iter().flat_map(|connection| connection.nodes())
    }
}

/// ManaQL printing node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManaqlPrinting {
    pub id: String,
    pub set: Option<String>,
    pub set_name: Option<String>,
    pub collector_number: Option<String>,
    pub finishes: Option<Vec<String>>,
    pub image_uri: Option<String>,
    pub back_image_uri: Option<String>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_usd: Option<Decimal>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_usd_foil: Option<Decimal>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_usd_etched: Option<Decimal>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_eur: Option<Decimal>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_eur_foil: Option<Decimal>,
    #[serde(default, deserialize_with = "normalize::de_price")]
    pub price_eur_etched: Option<Decimal>,
}

/// Printing filters for the finish policy and exclusions.
///
/// The schema has no serialized marker, so `Exclusion::Serialized` cannot be
/// expressed here.
pub fn printing_filters(finishes: &[Finish], exclusions: &[Exclusion]) -> Vec<Value> {
    let mut filters = Vec::new();
    if !finishes.is_empty() {
        filters.push(json!({
            "fields": ["finishes"],
            "operator": "eq",
            "query": finishes.iter().map(Finish::as_str).collect::<Vec<_>>(),
        }));
    }
    if exclusions.contains(&Exclusion::SecretLair) {
        filters.push(json!({
            "fields": ["set"],
            "operator": "ne",
            "query": [SECRET_LAIR_SET_CODE],
        }));
    }
    filters
}

pub struct ManaqlClient {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
    batch_size: usize,
    printings_per_card: usize,
    autocomplete_limit: usize,
}

impl ManaqlClient {
    pub fn new(config: &PricingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        log::info!("Creating ManaQL client for {}", config.manaql_url);
        Ok(Self {
            client,
            endpoint: config.manaql_url.clone(),
            user_agent: config.user_agent.clone(),
            batch_size: config.batch_size.max(1),
            printings_per_card: config.printings_per_card,
            autocomplete_limit: config.autocomplete_limit,
        })
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", &self.user_agent)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlingError::HttpStatus(response.status()));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            if body.data.is_none() {
                return Err(BlingError::GraphQl(messages.join("; ")));
            }
            log::warn!("ManaQL returned partial data: {}", messages.join("; "));
        }
        body.data
            .ok_or_else(|| BlingError::GraphQl("response without data".to_string()))
    }

    /// One query for up to `batch_size` exact card names
    pub async fn cards_batch(
        &self,
        names: &[String],
        finishes: &[Finish],
        exclusions: &[Exclusion],
    ) -> Result<Vec<ManaqlCard>> {
        log::debug!("Querying ManaQL for {} cards", names.len());
        let variables = json!({
            "first": self.batch_size,
            "filter": { "fields": ["name"], "operator": "eq", "query": names },
            "printingsFirst": self.printings_per_card,
            "printingFilters": printing_filters(finishes, exclusions),
        });

        let data: CardsData = self.query(CARDS_QUERY, variables).await?;
        Ok(data
            .cards
            .map(|connection| connection.nodes().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CardDataSource for ManaqlClient {
    fn name(&self) -> &'static str {
        "manaql"
    }

    async fn fetch_printings(
        &self,
        names: &[String],
        finishes: &[Finish],
        exclusions: &[Exclusion],
    ) -> Result<FetchedPrintings> {
        let mut fetched = FetchedPrintings::default();

        for batch in names.chunks(self.batch_size) {
            match self.cards_batch(batch, finishes, exclusions).await {
                Ok(cards) => {
                    let mut by_name: HashMap<String, Vec<_>> = HashMap::new();
                    for card in &cards {
                        let Some(name) = card.name.as_ref() else {
                            continue;
                        };
                        by_name
                            .entry(name.clone())
                            .or_default()
                            .extend(normalize::from_manaql(card));
                    }
                    for name in batch {
                        let printings = by_name.remove(name).unwrap_or_default();
                        fetched.printings.insert(name.clone(), printings);
                    }
                }
                Err(e) => {
                    log::warn!("ManaQL batch of {} cards failed: {}", batch.len(), e);
                    fetched.degraded.extend(batch.iter().map(|name| CardFailure {
                        name: name.clone(),
                        error: e.to_string(),
                    }));
                }
            }
        }

        Ok(fetched)
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>> {
        let variables = json!({
            "first": self.autocomplete_limit,
            "filter": { "fields": ["name"], "operator": "sw", "query": [prefix] },
        });
        let data: CardsData = self.query(AUTOCOMPLETE_QUERY, variables).await?;
        Ok(data
            .cards
            .map(|connection| {
                connection
                    .nodes()
                    .filter_map(|card| card.name.clone())
                    .take(self.autocomplete_limit)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "manaql_tests.rs"]
mod tests;
