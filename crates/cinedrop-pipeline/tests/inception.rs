use std::sync::Arc;
use std::time::Duration;

use cinedrop_config::{IndexerKind, PipelineConfig, Secret};
use cinedrop_core::{
    CancelSignal, ErrorKind, IndexerRecord, MovieId, Quality, RecordLocator, RemoteJobStatus,
    RemotePhase, SubmissionId,
};
use cinedrop_debrid::ResolutionEngine;
use cinedrop_pipeline::{Pipeline, PollPolicy, ResolveOutcome};
use cinedrop_sources::SourceAggregator;
use cinedrop_test_support::fixtures;
use cinedrop_test_support::mocks::{ScriptedDebrid, StubIndexer, StubMetadata};
use httpmock::prelude::*;

const LINK: &str = "https://real-debrid.com/d/INCEPTION1080";
const DIRECT: &str = "https://fra1.download.real-debrid.com/d/INCEPTION1080/Inception.mkv";
const MAGNET_PREFIX: &str = "magnet:?xt=urn:btih:";

fn record(hash: &str, quality: &str) -> IndexerRecord {
    IndexerRecord {
        source_title: "Inception (2010)".to_string(),
        quality: Some(quality.to_string()),
        locator: RecordLocator::InfoHash(hash.to_string()),
    }
}

fn stub_pipeline(debrid: Arc<ScriptedDebrid>) -> Pipeline {
    let indexer = StubIndexer::new(
        "yts",
        vec![
            record(fixtures::INCEPTION_HASH_1080, "720p"),
            record(fixtures::INCEPTION_HASH_720, "720p"),
            record(fixtures::INCEPTION_HASH_1080, "1080p"),
        ],
    );
    Pipeline::new(
        Arc::new(StubMetadata::new(vec![
            fixtures::inception(),
            fixtures::inception_documentary(),
        ])),
        SourceAggregator::new(vec![Arc::new(indexer)], Vec::new()),
        ResolutionEngine::new(debrid, 1, Duration::from_millis(200)),
        PollPolicy {
            poll_interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(60),
        },
    )
}

#[tokio::test(start_paused = true)]
async fn inception_end_to_end_with_stub_services() -> anyhow::Result<()> {
    let debrid = Arc::new(ScriptedDebrid::with_statuses(
        "JOB1",
        [
            RemoteJobStatus::of(RemotePhase::Processing),
            RemoteJobStatus::completed([LINK]),
        ],
    ));
    let pipeline = stub_pipeline(Arc::clone(&debrid));

    let movies = pipeline.search_movies("inception").await?;
    let ids: Vec<u64> = movies.iter().map(|movie| movie.id.0).collect();
    assert_eq!(ids, [27_205, 64_956]);

    let listing = pipeline.list_candidates(&movies[0]).await?;
    assert!(!listing.degraded);
    assert_eq!(listing.candidates.len(), 2);
    assert!(
        listing
            .candidates
            .iter()
            .all(|candidate| candidate.magnet_uri().starts_with(MAGNET_PREFIX))
    );
    let best = &listing.candidates[0];
    assert_eq!(best.info_hash().as_str(), fixtures::INCEPTION_HASH_1080);
    assert_eq!(best.quality(), Quality::Hd1080);

    let outcome = pipeline.resolve(best, CancelSignal::never()).await?;
    let ResolveOutcome::Links(links) = outcome else {
        anyhow::bail!("expected links");
    };
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].host_label, "real-debrid.com");
    assert_eq!(debrid.submissions(), 1);
    assert_eq!(debrid.polls(), 2);
    Ok(())
}

#[tokio::test]
async fn metadata_errors_pass_through_unchanged() {
    let pipeline = stub_pipeline(Arc::new(ScriptedDebrid::new("JOB", Vec::new())));

    let empty = pipeline.search_movies("   ").await.expect_err("blank query");
    assert_eq!(empty.kind(), ErrorKind::InvalidInput);

    let missing = pipeline
        .movie_detail(MovieId(1))
        .await
        .expect_err("unknown movie");
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[tokio::test(start_paused = true)]
async fn spawned_resolution_stops_when_cancelled() -> anyhow::Result<()> {
    let debrid = Arc::new(ScriptedDebrid::new("JOB9", Vec::new()));
    let pipeline = stub_pipeline(Arc::clone(&debrid));
    let movie = fixtures::inception();
    let listing = pipeline.list_candidates(&movie).await?;

    let handle = pipeline.spawn_resolve(listing.candidates[0].clone());
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    handle.cancel();
    let outcome = handle.join().await?;

    assert_eq!(
        outcome,
        ResolveOutcome::Cancelled {
            submission_id: SubmissionId::new("JOB9")
        }
    );
    assert_eq!(debrid.polls(), 3);
    Ok(())
}

#[tokio::test]
async fn configured_pipeline_resolves_over_http() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path("/3/search/movie")
            .query_param("query", "inception")
            .query_param("api_key", "tmdb-key");
        then.status(200)
            .json_body(fixtures::tmdb_search_inception());
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/rd/torrents/search/Inception")
            .header("authorization", "Bearer rd-token");
        then.status(200).json_body(fixtures::rd_search_inception());
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/yts/list_movies.json")
            .query_param("query_term", "Inception");
        then.status(200).json_body(fixtures::yts_list_inception());
    });
    let add = server.mock(|when, then| {
        when.method(POST).path("/rd/torrents/addMagnet");
        then.status(201)
            .json_body(serde_json::json!({"id": "JOB42"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rd/torrents/info/JOB42");
        then.status(200)
            .json_body(fixtures::rd_torrent_info("JOB42", "downloaded", &[LINK]));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/rd/unrestrict/link")
            .form_urlencoded_tuple("link", LINK);
        then.status(200)
            .json_body(fixtures::rd_unrestrict(LINK, DIRECT));
    });

    let mut config = PipelineConfig::default();
    config.tmdb.base_url = server.url("/3");
    config.tmdb.api_key = Some(Secret::new("tmdb-key"));
    config.debrid.base_url = server.url("/rd");
    config.debrid.token = Some(Secret::new("rd-token"));
    config.indexers.enabled = vec![IndexerKind::RealDebrid, IndexerKind::Yts];
    config.indexers.yts_base_url = server.url("/yts");
    config.resolution.poll_interval_ms = 10;
    config.resolution.max_wait_secs = 5;
    let pipeline = Pipeline::from_config(&config)?;

    let movies = pipeline.search_movies("inception").await?;
    assert_eq!(movies[0], fixtures::inception());

    let listing = pipeline.list_candidates(&movies[0]).await?;
    assert!(!listing.degraded);
    assert_eq!(listing.candidates.len(), 3);
    let first = &listing.candidates[0];
    assert_eq!(first.info_hash().as_str(), fixtures::INCEPTION_HASH_1080);
    assert_eq!(first.source_provider_id(), Some("real_debrid"));

    let outcome = pipeline.resolve(first, CancelSignal::never()).await?;
    add.assert();
    match outcome {
        ResolveOutcome::Links(links) => {
            assert_eq!(links[0].url, DIRECT);
            assert_eq!(links[0].host_label, "fra1.download.real-debrid.com");
        }
        ResolveOutcome::Cancelled { .. } => anyhow::bail!("unexpected cancellation"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_indexer_degrades_listing() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/yts/list_movies.json");
        then.status(200).json_body(fixtures::yts_list_inception());
    });

    let mut config = PipelineConfig::default();
    config.tmdb.api_key = Some(Secret::new("tmdb-key"));
    config.debrid.base_url = "http://127.0.0.1:9".to_string();
    config.debrid.token = Some(Secret::new("rd-token"));
    config.indexers.yts_base_url = server.url("/yts");
    config.http.timeout_secs = 2;
    let pipeline = Pipeline::from_config(&config)?;

    let listing = pipeline.list_candidates(&fixtures::inception()).await?;
    assert!(listing.degraded);
    assert_eq!(listing.unreachable, ["real_debrid"]);
    assert_eq!(listing.candidates.len(), 2);
    Ok(())
}
