//! Session cache for card lookups and autocomplete suggestions
//!
//! Entries never expire; `clear` drops everything at once. Printings are keyed
//! by card name together with the finish and exclusion policy they were fetched
//! under, since a batched provider filters on the server.

use crate::error::Result;
use crate::models::Printing;
use crate::providers::{CardDataSource, FetchedPrintings};
use mtg_common::{Exclusion, Finish};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;

pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug)]
pub struct CardCache {
    printings: RwLock<HashMap<String, Vec<Printing>>>,
    autocomplete: RwLock<HashMap<String, Vec<String>>>,
    batch_size: usize,
}

impl Default for CardCache {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

/// Cache key prefix of a fetch policy, independent of argument order
fn policy_key(finishes: &[Finish], exclusions: &[Exclusion]) -> String {
    let mut finishes: Vec<&str> = finishes.iter().map(Finish::as_str).collect();
    finishes.sort_unstable();
    finishes.dedup();
    let mut exclusions: Vec<&str> = exclusions.iter().map(Exclusion::as_str).collect();
    exclusions.sort_unstable();
    exclusions.dedup();
    format!("{}|{}", finishes.join(","), exclusions.join(","))
}

fn entry_key(policy: &str, name: &str) -> String {
    format!("{}|{}", policy, name)
}

impl CardCache {
    pub fn new(batch_size: usize) -> Self {
        Self {
            printings: RwLock::new(HashMap::new()),
            autocomplete: RwLock::new(HashMap::new()),
            batch_size: batch_size.max(1),
        }
    }

    /// Printings for every name, fetching only the uncached ones.
    ///
    /// Names the source resolved, even to nothing, are cached and returned.
    /// Failed and degraded names are passed through and are not cached.
    pub async fn get_or_fetch_printings(
        &self,
        source: &dyn CardDataSource,
        names: &[String],
        finishes: &[Finish],
        exclusions: &[Exclusion],
    ) -> Result<FetchedPrintings> {
        let policy = policy_key(finishes, exclusions);
        let mut result = FetchedPrintings::default();
        let mut missing: Vec<String> = Vec::new();

        {
            let cached = self.printings.read().await;
            for name in names {
                if result.printings.contains_key(name) || missing.contains(name) {
                    continue;
                }
                match cached.get(&entry_key(&policy, name)) {
                    Some(printings) => {
                        result.printings.insert(name.clone(), printings.clone());
                    }
                    None => missing.push(name.clone()),
                }
            }
        }

        if missing.is_empty() {
            log::info!("Cache hit for all {} cards", result.printings.len());
            return Ok(result);
        }
        log::info!(
            "Cache miss for {} of {} cards, fetching from {}",
            missing.len(),
            missing.len() + result.printings.len(),
            source.name()
        );

        for batch in missing.chunks(self.batch_size) {
            let mut fetched = source.fetch_printings(batch, finishes, exclusions).await?;
            let mut cached = self.printings.write().await;

            for name in batch {
                if fetched.is_failed(name) {
                    continue;
                }
                let printings = fetched.printings.remove(name).unwrap_or_default();
                cached.insert(entry_key(&policy, name), printings.clone());
                result.printings.insert(name.clone(), printings);
            }
            result.failures.append(&mut fetched.failures);
            result.degraded.append(&mut fetched.degraded);
        }

        Ok(result)
    }

    /// Suggestions for a query, calling `fetch` only on a miss
    pub async fn get_or_fetch_autocomplete<F, Fut>(
        &self,
        query: &str,
        fetch: F,
    ) -> Result<Vec<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        if let Some(suggestions) = self.autocomplete.read().await.get(query) {
            log::debug!("Cache hit for autocomplete '{}'", query);
            return Ok(suggestions.clone());
        }

        log::debug!("Cache miss for autocomplete '{}'", query);
        let suggestions = fetch().await?;
        self.autocomplete
            .write()
            .await
            .insert(query.to_string(), suggestions.clone());
        Ok(suggestions)
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.printings.write().await.clear();
        self.autocomplete.write().await.clear();
        log::info!("Card cache cleared");
    }

    /// Number of cached (policy, card) entries
    pub async fn len(&self) -> usize {
        self.printings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.printings.read().await.is_empty() && self.autocomplete.read().await.is_empty()
    }

    pub async fn autocomplete_len(&self) -> usize {
        self.autocomplete.read().await.len()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
