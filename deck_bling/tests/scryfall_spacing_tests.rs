//! Outbound request spacing of the Scryfall client, measured on the server side

use deck_bling::providers::ScryfallClient;
use deck_bling::{CardDataSource, PricingConfig, ProviderKind};
use mtg_common::Finish;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers every search with an empty page and records when it arrived
#[derive(Clone, Default)]
struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for ArrivalRecorder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "has_more": false,
            "data": []
        }))
    }
}

#[tokio::test]
async fn test_concurrent_searches_respect_minimum_interval() {
    let server = MockServer::start().await;
    let recorder = ArrivalRecorder::default();

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(recorder.clone())
        .expect(6)
        .mount(&server)
        .await;

    let interval = Duration::from_millis(50);
    let config = PricingConfig {
        provider: ProviderKind::Scryfall,
        scryfall_base_url: server.uri(),
        min_request_interval: interval,
        ..PricingConfig::default()
    };
    let client = ScryfallClient::new(&config).unwrap();
    let names: Vec<String> = (0..6).map(|i| format!("Card {i}")).collect();

    let fetched = client
        .fetch_printings(&names, &[Finish::Nonfoil], &[])
        .await
        .unwrap();
    assert_eq!(fetched.printings.len(), 6);
    assert!(fetched.failures.is_empty());

    let mut arrivals = recorder.arrivals.lock().unwrap().clone();
    arrivals.sort();
    // allow for scheduling jitter between client release and server receipt
    let tolerance = Duration::from_millis(15);
    for pair in arrivals.windows(2) {
        assert!(
            pair[1] - pair[0] >= interval - tolerance,
            "requests only {:?} apart",
            pair[1] - pair[0]
        );
    }
}
