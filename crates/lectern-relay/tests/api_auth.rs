//! Integration tests for the relay API: bearer authentication on the
//! injection endpoints, validation failures, the public SSE stream, and
//! broadcast ordering as observed by a live subscriber.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use tokio::time::timeout;

use lectern_core::settings::RelaySettings;
use lectern_relay::start_relay;

/// Start a relay on an ephemeral port with no chat source.
async fn setup() -> (String, String) {
    let settings = RelaySettings {
        channel: Some("testchannel".to_string()),
        port: Some(0),
        admin_token: Some("test-secret".to_string()),
        ..RelaySettings::default()
    };

    let (info, _handle) = start_relay(settings, None)
        .await
        .expect("failed to start relay");

    (format!("http://127.0.0.1:{}", info.port), info.token)
}

/// Read SSE frames until the next `data:` payload arrives.
async fn next_data_frame(
    stream: &mut (impl futures_util::Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin),
    buffer: &mut String,
) -> Value {
    let payload = timeout(Duration::from_secs(10), async {
        loop {
            if let Some(pos) = buffer.find('\n') {
                let line: String = buffer.drain(..=pos).collect();
                if let Some(data) = line.trim_end().strip_prefix("data: ") {
                    return data.to_string();
                }
                continue;
            }
            let chunk = stream
                .next()
                .await
                .expect("event stream ended")
                .expect("event stream error");
            buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .expect("timed out waiting for event frame");

    serde_json::from_str(&payload).expect("event frame is not JSON")
}

#[tokio::test]
async fn health_endpoint_requires_no_auth() {
    let (base_url, _token) = setup().await;

    let response = reqwest::get(format!("{base_url}/health"))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn injection_without_token_is_rejected() {
    let (base_url, _token) = setup().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/api/read"))
        .json(&json!({ "reference": "John 3:16" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response.headers().contains_key(header::WWW_AUTHENTICATE),
        "401 should carry WWW-Authenticate"
    );
}

#[tokio::test]
async fn wrong_scheme_and_wrong_token_are_rejected() {
    let (base_url, token) = setup().await;
    let client = reqwest::Client::new();

    // Token without Bearer prefix.
    let response = client
        .post(format!("{base_url}/api/read"))
        .header(header::AUTHORIZATION, &token)
        .json(&json!({ "reference": "John 3:16" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong token.
    let response = client
        .post(format!("{base_url}/api/read"))
        .bearer_auth("not-the-secret")
        .json(&json!({ "reference": "John 3:16" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn injection_without_reference_is_a_validation_failure() {
    let (base_url, token) = setup().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/api/read"))
        .bearer_auth(&token)
        .json(&json!({ "text": "orphan text" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("reference"));
}

#[tokio::test]
async fn unauthorized_attempts_broadcast_nothing() {
    let (base_url, token) = setup().await;
    let client = reqwest::Client::new();

    // Subscribe first so any side effect of the failed attempt would be
    // observed.
    let events = client
        .get(format!("{base_url}/api/events"))
        .send()
        .await
        .expect("subscribe failed");
    assert_eq!(events.status(), StatusCode::OK);
    let mut stream = events.bytes_stream();
    let mut buffer = String::new();

    let response = client
        .post(format!("{base_url}/api/read"))
        .bearer_auth("wrong")
        .json(&json!({ "reference": "Malicious 1:1" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A valid injection follows; it must be the FIRST thing on the stream.
    let response = client
        .post(format!("{base_url}/api/read"))
        .bearer_auth(&token)
        .json(&json!({ "reference": "John 3:16", "sourceUser": "admin" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let frame = next_data_frame(&mut stream, &mut buffer).await;
    assert_eq!(frame["type"], "read");
    assert_eq!(frame["reference"], "John 3:16");
    assert_eq!(frame["sourceUser"], "admin");
}

#[tokio::test]
async fn broadcast_order_matches_injection_order() {
    let (base_url, token) = setup().await;
    let client = reqwest::Client::new();

    let events = client
        .get(format!("{base_url}/api/events"))
        .send()
        .await
        .expect("subscribe failed");
    let mut stream = events.bytes_stream();
    let mut buffer = String::new();

    for reference in ["John 3:16", "Psalm 23:1", "Luke 2:1"] {
        let response = client
            .post(format!("{base_url}/api/read"))
            .bearer_auth(&token)
            .json(&json!({ "reference": reference }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    for expected in ["John 3:16", "Psalm 23:1", "Luke 2:1"] {
        let frame = next_data_frame(&mut stream, &mut buffer).await;
        assert_eq!(frame["type"], "read");
        assert_eq!(frame["reference"], expected);
    }
}

#[tokio::test]
async fn bulk_and_clear_round_trip() {
    let (base_url, token) = setup().await;
    let client = reqwest::Client::new();

    let events = client
        .get(format!("{base_url}/api/events"))
        .send()
        .await
        .expect("subscribe failed");
    let mut stream = events.bytes_stream();
    let mut buffer = String::new();

    let response = client
        .post(format!("{base_url}/api/bulk"))
        .bearer_auth(&token)
        .json(&json!({
            "items": [
                { "reference": "John 3:16" },
                { "reference": "Psalm 23:1", "text": "The Lord is my shepherd" }
            ]
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let ack: Value = response.json().await.unwrap();
    assert_eq!(ack["queued"], 2);

    let response = client
        .post(format!("{base_url}/api/clear"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let frame = next_data_frame(&mut stream, &mut buffer).await;
    assert_eq!(frame["type"], "bulk");
    assert_eq!(frame["items"].as_array().unwrap().len(), 2);
    assert_eq!(frame["items"][1]["text"], "The Lord is my shepherd");

    let frame = next_data_frame(&mut stream, &mut buffer).await;
    assert_eq!(frame["type"], "clear");
}

#[tokio::test]
async fn bulk_with_an_invalid_item_broadcasts_nothing() {
    let (base_url, token) = setup().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base_url}/api/bulk"))
        .bearer_auth(&token)
        .json(&json!({
            "items": [
                { "reference": "John 3:16" },
                { "reference": "   " }
            ]
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_channel_is_fatal_at_startup() {
    let settings = RelaySettings {
        channel: None,
        port: Some(0),
        ..RelaySettings::default()
    };

    let result = start_relay(settings, None).await;
    assert!(result.is_err(), "startup must fail without a channel");
}
