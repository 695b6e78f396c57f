//! Integration tests for `Client` request dispatch and response shaping.
//!
//! These tests run every call against a local mock HTTP server.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

use httpwrap::{Client, ClientConfig, HttpError, Request};
use tempfile::TempDir;
use reqwest::Method;
use wiremock::matchers::{
    body_bytes, body_string, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a responder returning `code` with `msg` as the body for any request.
async fn server_replying(code: u16, msg: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(code).set_body_string(msg))
        .mount(&mock_server)
        .await;
    mock_server
}

/// Answers every connection with a `200` that announces 100 body bytes,
/// sends five, then hangs up. Returns the base URL.
fn truncated_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0u8; 1024];
            let mut head = Vec::new();
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nhello");
        }
    });
    format!("http://{addr}/")
}

const CASES: &[(u16, &str)] = &[
    (200, "success"),
    (400, "bad request"),
    (500, "internal server error"),
];

#[tokio::test]
async fn test_get_returns_status_and_body_for_every_code() {
    let client = Client::new();
    for &(code, msg) in CASES {
        let mock_server = server_replying(code, msg).await;

        let response = client
            .get(&format!("{}/", mock_server.uri()))
            .await
            .unwrap_or_else(|e| panic!("GET for {code} should succeed: {e}"));

        assert_eq!(response.status_code, code);
        assert_eq!(response.body, msg.as_bytes());
    }
}

#[tokio::test]
async fn test_client_with_default_config_matches_new() {
    let client = Client::with_config(ClientConfig::default()).unwrap();
    for &(code, msg) in CASES {
        let mock_server = server_replying(code, msg).await;
        let response = client
            .get(&format!("{}/", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(response.status_code, code);
    }
}

#[tokio::test]
async fn test_post_sends_content_type_and_body() {
    let client = Client::new();
    for &(code, msg) in CASES {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header("content-type", "application/octet-stream"))
            .and(body_bytes(msg.as_bytes().to_vec()))
            .respond_with(ResponseTemplate::new(code).set_body_string(msg))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/upload", mock_server.uri());
        let response = client
            .post(&url, "application/octet-stream", msg.as_bytes().to_vec())
            .await
            .unwrap();

        assert_eq!(response.status_code, code);
        assert_eq!(response.text(), msg);
    }
}

#[tokio::test]
async fn test_send_returns_status_and_body_for_every_code() {
    let client = Client::new();
    for &(code, msg) in CASES {
        let mock_server = server_replying(code, msg).await;
        let request = Request::new("GET", format!("{}/", mock_server.uri()), None);

        let response = client.send(&request).await.unwrap();

        assert_eq!(response.status_code, code);
        assert_eq!(response.body, msg.as_bytes());
    }
}

#[tokio::test]
async fn test_send_reports_status_text() {
    let mock_server = server_replying(404, "nope").await;
    let request = Request::new("GET", format!("{}/", mock_server.uri()), None);

    let response = Client::new().send(&request).await.unwrap();

    assert_eq!(response.status, "404 Not Found");
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_send_invalid_method_sends_nothing() {
    let mock_server = server_replying(200, "success").await;
    let request = Request::new("WRONG METHOD", format!("{}/", mock_server.uri()), None);

    let result = Client::new().send(&request).await;

    assert!(matches!(result, Err(HttpError::InvalidMethod { .. })));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_extension_method_reaches_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PURGE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::new("PURGE", format!("{}/cache", mock_server.uri()), None);
    let response = Client::new().send(&request).await.unwrap();

    assert_eq!(response.status_code, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_send_applies_query_params_and_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("a", "1"))
        .and(query_param("b", "2"))
        .and(header("authorization", "Bearer token-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut request = Request::new("GET", format!("{}/items", mock_server.uri()), None);
    request.add_param("b", "2");
    request.add_param("a", "1");
    request.set_authorization("Bearer token-123").unwrap();
    request.set_content_type_json();

    let response = Client::new().send(&request).await.unwrap();
    assert_eq!(response.status_code, 200);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("a=1&b=2"));
}

#[tokio::test]
async fn test_send_json_body_round_trip() {
    #[derive(serde::Serialize)]
    struct NewItem {
        name: &'static str,
    }

    #[derive(serde::Deserialize)]
    struct Created {
        id: u32,
        name: String,
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"widget"}"#))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_raw(r#"{"id":7,"name":"widget"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let mut request = Request::new("POST", format!("{}/items", mock_server.uri()), None);
    request.set_json_body(&NewItem { name: "widget" }).unwrap();

    let response = Client::new().send(&request).await.unwrap();
    let created: Created = response.json().unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(created.id, 7);
    assert_eq!(created.name, "widget");
}

#[tokio::test]
async fn test_response_headers_are_exposed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "abc-123")
                .set_body_string("ok"),
        )
        .mount(&mock_server)
        .await;

    let response = Client::new().get(&mock_server.uri()).await.unwrap();

    assert_eq!(response.headers.get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_requests_carry_crate_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header_regex("user-agent", r"^httpwrap/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = Client::new().get(&mock_server.uri()).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_head_returns_empty_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-size", "42"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = Client::new()
        .head(&format!("{}/doc", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("x-size").unwrap(), "42");
}

#[tokio::test]
async fn test_post_form_encodes_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("a=1&b=two+words"))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut form = BTreeMap::new();
    form.insert("b".to_string(), vec!["two words".to_string()]);
    form.insert("a".to_string(), vec!["1".to_string()]);

    let response = Client::new()
        .post_form(&format!("{}/form", mock_server.uri()), &form)
        .await
        .unwrap();

    assert_eq!(response.text(), "saved");
}

#[tokio::test]
async fn test_raw_send_returns_live_response() {
    let client = Client::new();
    for &(code, msg) in CASES {
        let mock_server = server_replying(code, msg).await;
        let url = format!("{}/", mock_server.uri()).parse().unwrap();
        let request = reqwest::Request::new(Method::GET, url);

        let response = client.raw_send(request).await.unwrap();
        assert_eq!(response.status().as_u16(), code);

        // The body has not been read yet; the caller drains it.
        let body = response.bytes().await.unwrap();
        assert_eq!(body.as_ref(), msg.as_bytes());
    }
}

#[tokio::test]
async fn test_timeout_is_honoured() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        timeout: Duration::from_millis(200),
        ..ClientConfig::default()
    };
    let client = Client::with_config(config).unwrap();

    let result = client.get(&mock_server.uri()).await;

    let err = match result {
        Err(err @ HttpError::Timeout { .. }) => err,
        other => panic!("Expected Timeout, got: {other:?}"),
    };
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Reserve a port, then free it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = Client::new().get(&format!("http://{addr}/")).await;

    assert!(
        matches!(result, Err(HttpError::Network { .. })),
        "Expected Network, got: {result:?}"
    );
}

#[tokio::test]
async fn test_truncated_body_is_read_error() {
    let url = truncated_body_server();

    let result = Client::new().get(&url).await;

    assert!(
        matches!(result, Err(HttpError::Read { .. })),
        "Expected Read, got: {result:?}"
    );
}

#[tokio::test]
async fn test_truncated_body_download_writes_nothing() {
    let url = truncated_body_server();
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("partial.bin");

    let result = Client::new().download_file(&url, &target).await;

    assert!(
        matches!(result, Err(HttpError::Read { .. })),
        "Expected Read, got: {result:?}"
    );
    assert!(!target.exists());
}

#[tokio::test]
async fn test_client_shared_across_tasks() {
    let mock_server = server_replying(200, "success").await;
    let client = Client::new();
    let url = format!("{}/", mock_server.uri());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move { client.get(&url).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status_code, 200);
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_requests_work_after_closing_idle_connections() {
    let mock_server = server_replying(200, "success").await;
    let client = Client::new();
    let url = format!("{}/", mock_server.uri());

    client.get(&url).await.unwrap();
    client.close_idle_connections().unwrap();
    let response = client.get(&url).await.unwrap();

    assert_eq!(response.text(), "success");
}
