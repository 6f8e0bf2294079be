use std::sync::Arc;

use cinedrop_core::{PipelineError, Quality, RecordLocator, TorrentIndexer};
use cinedrop_sources::{RealDebridSearch, SourceAggregator, YtsIndexer};
use cinedrop_test_support::fixtures;
use httpmock::prelude::*;
use reqwest::Client;

const TRACKER: &str = "udp://tracker.example:80/announce";

#[tokio::test]
async fn real_debrid_search_sends_bearer_token() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/torrents/search/inception")
            .header("authorization", "Bearer rd-token");
        then.status(200).json_body(fixtures::rd_search_inception());
    });

    let backend = RealDebridSearch::new(Client::new(), &server.base_url(), "rd-token");
    let records = backend.search("inception").await?;
    mock.assert();

    assert_eq!(records.len(), 3);
    assert!(matches!(
        &records[0].locator,
        RecordLocator::Magnet(uri) if uri.contains(fixtures::INCEPTION_HASH_1080)
    ));
    assert!(records.iter().all(|record| record.quality.is_none()));
    Ok(())
}

#[tokio::test]
async fn real_debrid_search_surfaces_error_field() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/torrents/search/inception");
        then.status(401)
            .json_body(serde_json::json!({"error": "bad_token", "error_code": 8}));
    });

    let backend = RealDebridSearch::new(Client::new(), &server.base_url(), "expired");
    let err = backend.search("inception").await.expect_err("bad token");
    assert!(matches!(
        err,
        PipelineError::Upstream { status: 401, ref message, .. } if message == "bad_token"
    ));
}

#[tokio::test]
async fn yts_listing_flattens_torrents() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path("/list_movies.json")
            .query_param("query_term", "Inception");
        then.status(200).json_body(fixtures::yts_list_inception());
    });

    let backend = YtsIndexer::new(Client::new(), &server.base_url());
    let records = backend.search("Inception").await?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_title, "Inception (2010)");
    assert_eq!(records[0].quality.as_deref(), Some("720p"));
    Ok(())
}

#[tokio::test]
async fn yts_error_status_is_upstream_failure() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/list_movies.json");
        then.status(200).json_body(serde_json::json!({
            "status": "error",
            "status_message": "Invalid query"
        }));
    });

    let backend = YtsIndexer::new(Client::new(), &server.base_url());
    let err = backend.search("Inception").await.expect_err("error status");
    assert!(matches!(
        err,
        PipelineError::Upstream { service: "yts", ref message, .. } if message == "Invalid query"
    ));
}

#[tokio::test]
async fn aggregator_merges_live_backends() -> anyhow::Result<()> {
    let rd = MockServer::start_async().await;
    rd.mock(|when, then| {
        when.method(GET).path("/torrents/search/Inception");
        then.status(200).json_body(fixtures::rd_search_inception());
    });
    let yts = MockServer::start_async().await;
    yts.mock(|when, then| {
        when.method(GET).path("/list_movies.json");
        then.status(200).json_body(fixtures::yts_list_inception());
    });

    let client = Client::new();
    let aggregator = SourceAggregator::new(
        vec![
            Arc::new(YtsIndexer::new(client.clone(), &yts.base_url())),
            Arc::new(RealDebridSearch::new(client, &rd.base_url(), "rd-token")),
        ],
        vec![TRACKER.to_string()],
    );

    let outcome = aggregator.find_candidates("Inception").await?;
    assert!(!outcome.degraded());

    // yts: 720p + 1080p; real-debrid: 1080p duplicate, a 2160p, and one without a hash.
    let hashes: Vec<&str> = outcome
        .candidates
        .iter()
        .map(|candidate| candidate.info_hash().as_str())
        .collect();
    assert_eq!(
        hashes,
        vec![
            fixtures::INCEPTION_HASH_720,
            fixtures::INCEPTION_HASH_1080,
            "ffffeeeeddddccccbbbbaaaa9999888877776666",
        ]
    );
    for candidate in &outcome.candidates {
        assert!(candidate.magnet_uri().starts_with("magnet:?xt=urn:btih:"));
    }
    let tied = &outcome.candidates[1];
    assert_eq!(tied.quality(), Quality::Hd1080);
    assert_eq!(tied.source_provider_id(), Some("yts"));
    assert!(tied.magnet_uri().contains("&tr=udp%3A%2F%2Ftracker.example%3A80%2Fannounce"));
    assert_eq!(outcome.candidates[2].quality(), Quality::Uhd2160);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_reported() -> anyhow::Result<()> {
    let yts = MockServer::start_async().await;
    yts.mock(|when, then| {
        when.method(GET).path("/list_movies.json");
        then.status(200).json_body(fixtures::yts_list_inception());
    });

    let aggregator = SourceAggregator::new(
        vec![
            Arc::new(RealDebridSearch::new(Client::new(), "http://127.0.0.1:9", "t")),
            Arc::new(YtsIndexer::new(Client::new(), &yts.base_url())),
        ],
        Vec::new(),
    );
    let outcome = aggregator.find_candidates("Inception").await?;
    assert!(outcome.degraded());
    assert_eq!(outcome.failed_backends, vec!["real_debrid".to_string()]);
    assert_eq!(outcome.candidates.len(), 2);
    Ok(())
}
