//! Scryfall REST client
//!
//! One paginated `/cards/search` per card name. Every outbound request goes
//! through a shared [`Throttle`]; rate-limit responses are waited out and
//! transient failures are retried with linear backoff.

use super::throttle::Throttle;
use super::{CardDataSource, CardFailure, FetchedPrintings};
use crate::config::PricingConfig;
use crate::error::{BlingError, Result};
use crate::normalize;
use async_trait::async_trait;
use futures::future::join_all;
use mtg_common::finish::SECRET_LAIR_SET_CODE;
use mtg_common::{
    Exclusion, Finish, ScryfallAutocomplete, ScryfallCard, ScryfallError, ScryfallList,
};
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;

/// Search query for all printings of one exact card name
pub fn search_query(name: &str, exclusions: &[Exclusion]) -> String {
    let mut query = format!("!\"{}\"", name);
    for exclusion in exclusions {
        match exclusion {
            Exclusion::Serialized => query.push_str(" -is:serialized"),
            Exclusion::SecretLair => {
                query.push_str(" -s:");
                query.push_str(SECRET_LAIR_SET_CODE);
            }
        }
    }
    query
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

pub struct ScryfallClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    throttle: Throttle,
    max_attempts: u32,
    retry_backoff: Duration,
    rate_limit_wait: Duration,
    max_rate_limit_retries: u32,
    autocomplete_limit: usize,
}

impl ScryfallClient {
    pub fn new(config: &PricingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        log::info!("Creating Scryfall client for {}", config.scryfall_base_url);
        Ok(Self {
            client,
            base_url: config.scryfall_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            throttle: Throttle::new(config.min_request_interval),
            max_attempts: config.max_attempts.max(1),
            retry_backoff: config.retry_backoff,
            rate_limit_wait: config.rate_limit_wait,
            max_rate_limit_retries: config.max_rate_limit_retries,
            autocomplete_limit: config.autocomplete_limit,
        })
    }

    /// GET a JSON document, None when Scryfall answers 404
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let mut attempt = 0;
        let mut rate_limited = 0;

        loop {
            self.throttle.acquire().await;
            log::debug!("GET {}", url);

            let last_error = match self
                .client
                .get(url)
                .header("User-Agent", &self.user_agent)
                .header("Accept", "application/json")
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        rate_limited += 1;
                        if rate_limited > self.max_rate_limit_retries {
                            return Err(BlingError::RateLimited {
                                url: url.to_string(),
                            });
                        }
                        let wait = retry_after(&response).unwrap_or(self.rate_limit_wait);
                        log::warn!("Rate limited by Scryfall, waiting {:?}", wait);
                        sleep(wait).await;
                        continue;
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status.is_success() {
                        let body = response.text().await?;
                        return Ok(Some(serde_json::from_str(&body)?));
                    }
                    if !status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(match serde_json::from_str::<ScryfallError>(&body) {
                            Ok(error) => BlingError::ApiResponse {
                                code: error.code,
                                details: error.details,
                            },
                            Err(_) => BlingError::HttpStatus(status),
                        });
                    }
                    BlingError::HttpStatus(status)
                }
                Err(e) => BlingError::Network(e),
            };

            attempt += 1;
            if attempt >= self.max_attempts {
                return Err(BlingError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last_error: last_error.to_string(),
                });
            }
            let backoff = self.retry_backoff * attempt;
            log::warn!(
                "Scryfall request failed ({}), retry {}/{} in {:?}",
                last_error,
                attempt,
                self.max_attempts - 1,
                backoff
            );
            sleep(backoff).await;
        }
    }

    /// All printings of one card, following pagination
    pub async fn search_printings(
        &self,
        name: &str,
        exclusions: &[Exclusion],
    ) -> Result<Vec<ScryfallCard>> {
        let mut next = Some(format!(
            "{}/cards/search?q={}&unique=prints&order=usd",
            self.base_url,
            urlencoding::encode(&search_query(name, exclusions))
        ));
        let mut cards = Vec::new();

        while let Some(url) = next.take() {
            let Some(page) = self.get_json::<ScryfallList>(&url).await? else {
                break;
            };
            cards.extend(page.data);
            next = page.next_page;
        }

        log::debug!("Found {} printings of {}", cards.len(), name);
        Ok(cards)
    }
}

#[async_trait]
impl CardDataSource for ScryfallClient {
    fn name(&self) -> &'static str {
        "scryfall"
    }

    async fn fetch_printings(
        &self,
        names: &[String],
        _finishes: &[Finish],
        exclusions: &[Exclusion],
    ) -> Result<FetchedPrintings> {
        let results = join_all(
            names
                .iter()
                .map(|name| async move { (name, self.search_printings(name, exclusions).await) }),
        )
        .await;

        let mut fetched = FetchedPrintings::default();
        for (name, result) in results {
            match result {
                Ok(cards) => {
                    let printings = cards.iter().map(normalize::from_scryfall).collect();
                    fetched.printings.insert(name.clone(), printings);
                }
                Err(e) => {
                    log::warn!("Failed to fetch printings of {}: {}", name, e);
                    fetched.failures.push(CardFailure {
                        name: name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(fetched)
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/cards/autocomplete?q={}",
            self.base_url,
            urlencoding::encode(prefix)
        );
        let suggestions = self
            .get_json::<ScryfallAutocomplete>(&url)
            .await?
            .map(|catalog| catalog.data)
            .unwrap_or_default();
        Ok(suggestions.into_iter().take(self.autocomplete_limit).collect())
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
