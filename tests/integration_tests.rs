//! Integration tests using wiremock to simulate the Parva API.

use parva_client::{ApiRequest, Client, Error, ResolveRequest};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .backoff(Duration::from_millis(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_enveloped_response_round_trips() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "data": {"tithi": "Purnima"},
        "meta": {
            "confidence": {"level": "computed", "score": 0.92},
            "method": "ephemeris-v5",
            "provenance": {
                "snapshot_id": "snap-2081",
                "dataset_hash": "sha256:abc",
                "rules_hash": "sha256:def",
                "verify_url": null,
                "signature": "ed25519:xyz"
            },
            "uncertainty": {"interval_hours": 0.5, "boundary_risk": "low"},
            "trace_id": "trace-42",
            "policy": {"profile": "np-mainstream", "jurisdiction": "NP", "advisory": true}
        }
    });

    Mock::given(method("GET"))
        .and(path("/calendar/panchanga"))
        .and(query_param("date", "2025-01-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client.panchanga(Some("2025-01-15")).await.unwrap();

    let payload: Value = envelope.decode().unwrap();
    assert_eq!(payload, json!({"tithi": "Purnima"}));

    let meta = &envelope.meta;
    assert_eq!(meta.confidence.level, "computed");
    assert_eq!(meta.confidence.score, 0.92);
    assert_eq!(meta.method, "ephemeris-v5");
    assert_eq!(meta.provenance.snapshot_id.as_deref(), Some("snap-2081"));
    assert_eq!(meta.provenance.dataset_hash.as_deref(), Some("sha256:abc"));
    assert_eq!(meta.provenance.verify_url, None);
    assert_eq!(meta.provenance.signature.as_deref(), Some("ed25519:xyz"));
    assert_eq!(meta.uncertainty.interval_hours, Some(0.5));
    assert_eq!(meta.uncertainty.boundary_risk, "low");
    assert_eq!(meta.trace_id.as_deref(), Some("trace-42"));
    assert_eq!(meta.policy.profile, "np-mainstream");
    assert_eq!(meta.policy.jurisdiction, "NP");
    assert!(meta.policy.advisory);
}

#[tokio::test]
async fn test_bare_legacy_body_gets_sentinel_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"bs_date": "2081-09-30"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client.today().await.unwrap();

    let payload: Value = envelope.decode().unwrap();
    assert_eq!(payload, json!({"bs_date": "2081-09-30"}));

    assert_eq!(envelope.meta.confidence.level, "unknown");
    assert_eq!(envelope.meta.confidence.score, 0.5);
    assert_eq!(envelope.meta.method, "unknown");
    assert_eq!(envelope.meta.uncertainty.boundary_risk, "unknown");
    assert_eq!(envelope.meta.policy.profile, "np-mainstream");
    assert_eq!(envelope.meta.policy.jurisdiction, "NP");
    assert!(envelope.meta.policy.advisory);
}

#[tokio::test]
async fn test_retries_through_consecutive_503s() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // Two 503s, then success. Default retries (2) allow three attempts.
    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503).set_body_string("ephemeris warming up")
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"bs_date": "2081-09-30"}, "meta": {}}))
            }
        })
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client.today().await.unwrap();

    let payload: Value = envelope.decode().unwrap();
    assert_eq!(payload, json!({"bs_date": "2081-09-30"}));
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exhausted_retries_surface_last_503() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(move |_req: &wiremock::Request| {
            attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(503).set_body_string("still down")
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .retries(1)
        .backoff(Duration::from_millis(10))
        .build()
        .unwrap();

    let result = client.today().await;

    match result {
        Err(Error::Api { status, body }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "still down");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_404_is_never_retried() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/explain/missing-trace"))
        .respond_with(move |_req: &wiremock::Request| {
            attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(404).set_body_string("trace not found")
        })
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.explain_trace("missing-trace").await;

    match result {
        Err(Error::Api { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "trace not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_json_body_is_not_retried() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(move |_req: &wiremock::Request| {
            attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(200).set_body_string("<html>proxy error</html>")
        })
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.today().await;

    match result {
        Err(Error::Decode { body, .. }) => {
            assert!(body.contains("proxy error"));
        }
        other => panic!("expected Decode error, got {:?}", other),
    }
    assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_omitted_panchanga_date_sends_no_date_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/panchanga"))
        .and(query_param_is_missing("date"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"tithi": "Ashtami"}, "meta": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client.panchanga(None).await.unwrap();

    let payload: Value = envelope.decode().unwrap();
    assert_eq!(payload, json!({"tithi": "Ashtami"}));
}

#[tokio::test]
async fn test_empty_string_param_is_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/convert"))
        .and(query_param_is_missing("date"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}, "meta": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client
        .call(&ApiRequest::new("/calendar/convert").with_param("date", ""))
        .await
        .unwrap();

    let payload: Value = envelope.decode().unwrap();
    assert_eq!(payload, json!({"ok": true}));
}

#[tokio::test]
async fn test_deadline_cancels_backoff_sleep() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    // A long backoff that the deadline must interrupt well before it ends.
    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .retries(3)
        .backoff(Duration::from_secs(30))
        .build()
        .unwrap();

    let start = std::time::Instant::now();
    let result = client
        .call(&ApiRequest::new("/calendar/today").with_deadline(Duration::from_millis(200)))
        .await;
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(Error::DeadlineExceeded)));
    assert!(
        elapsed < Duration::from_secs(5),
        "expected prompt cancellation, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_resolve_serializes_all_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("date", "2026-10-21"))
        .and(query_param("profile", "np-mainstream"))
        .and(query_param("latitude", "27.7172"))
        .and(query_param("longitude", "85.324"))
        .and(query_param("include_trace", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"bikram_sambat": {"year": 2083}},
            "meta": {"trace_id": "trace-7"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let envelope = client
        .resolve(&ResolveRequest::new("2026-10-21"))
        .await
        .unwrap();

    assert_eq!(envelope.meta.trace_id.as_deref(), Some("trace-7"));
}

#[tokio::test]
async fn test_resolve_honors_custom_profile_and_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("profile", "np-newar"))
        .and(query_param("latitude", "26.4525"))
        .and(query_param("longitude", "87.2718"))
        .and(query_param("include_trace", "false"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}, "meta": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = ResolveRequest::new("2026-10-21")
        .profile("np-newar")
        .coordinates(26.4525, 87.2718)
        .include_trace(false);

    client.resolve(&request).await.unwrap();
}

#[tokio::test]
async fn test_festival_and_trace_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/festivals/tihar/explain"))
        .and(query_param("year", "2025"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"festival": "tihar"}, "meta": {}})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/provenance/verify/trace/trace-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"trace_id": "trace-42", "valid": true},
            "meta": {}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/festivals/upcoming"))
        .and(query_param("days", "30"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [], "meta": {}})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/spec/conformance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"conformant": true}, "meta": {}})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    client.explain_festival("tihar", 2025).await.unwrap();
    client.upcoming(30).await.unwrap();
    client.spec_conformance().await.unwrap();

    let verification = client.verify_trace("trace-42").await.unwrap();
    let payload: Value = verification.decode().unwrap();
    assert_eq!(payload["valid"], json!(true));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_stripped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/today"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}, "meta": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(format!("{}/", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap();

    client.today().await.unwrap();
}

#[tokio::test]
async fn test_network_error_is_transient_and_retried() {
    // No server listening on this port: every attempt fails at the
    // connection level and the final error is the network error itself.
    let client = Client::builder()
        .base_url("http://127.0.0.1:9")
        .unwrap()
        .retries(1)
        .backoff(Duration::from_millis(10))
        .build()
        .unwrap();

    let result = client.today().await;

    match result {
        Err(e @ Error::Network(_)) => assert!(e.is_transient()),
        other => panic!("expected Network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/convert"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}, "meta": {}})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.convert(&format!("2025-01-{:02}", i + 1)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
}
