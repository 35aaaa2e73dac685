//! Replaying recorded replies from disk.

use std::path::PathBuf;

use chat_ox::{ChatOxError, Config, FixtureTransport, Mode, run, transport_for};
use chat_ox_common::StatusCode;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn replays_event_stream() {
    let config = Config::builder().fixture(fixture("skyscraper.sse")).build();
    let transport = transport_for(&config);
    let mut out = Vec::new();

    let report = run(&config, transport.as_ref(), &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The Sky Spire\nComplete: The Sky Spire\n\n"
    );
    assert_eq!(report.mode, Mode::Streaming);
    assert_eq!(report.chunks, Some(4));
}

#[tokio::test]
async fn replays_whole_body() {
    let config = Config::builder()
        .stream(false)
        .fixture(fixture("completion.json"))
        .build();
    let transport = FixtureTransport::new(fixture("completion.json"));
    let mut out = Vec::new();

    let report = run(&config, &transport, &mut out).await.unwrap();

    let printed: Value = serde_json::from_str(String::from_utf8(out).unwrap().trim_end()).unwrap();
    assert_eq!(printed["choices"][0]["message"]["content"], "The Sky Spire");
    assert_eq!(report.status, Some(StatusCode::OK));
}

#[tokio::test]
async fn missing_fixture_is_reported_with_its_path() {
    let missing = fixture("does-not-exist.sse");
    let config = Config::builder().fixture(missing.clone()).build();
    let transport = FixtureTransport::new(&missing);
    let mut out = Vec::new();

    let err = run(&config, &transport, &mut out).await.unwrap_err();

    match err {
        ChatOxError::Fixture { path, .. } => assert_eq!(path, missing),
        other => panic!("expected fixture error, got {other:?}"),
    }
    assert!(out.is_empty());
}
