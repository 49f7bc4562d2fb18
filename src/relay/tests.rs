use super::*;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHARE: &str = "https://hastebin.com";

fn relay_for(server: &MockServer) -> PasteRelay {
    PasteRelay::new(
        Client::new(),
        format!("{}/documents", server.uri()),
        SHARE,
    )
}

#[test]
fn test_share_link_format() {
    assert_eq!(share_link("https://hastebin.com", "abc"), "https://hastebin.com/abc");
    assert_eq!(share_link("https://hastebin.com/", "abc"), "https://hastebin.com/abc");
}

#[test]
fn test_ascii_bytes_replaces_non_ascii() {
    assert_eq!(ascii_bytes("café ☕"), b"caf? ?".to_vec());
}

#[test]
fn test_from_config_uses_endpoints() {
    let relay = PasteRelay::from_config(&Config::default()).unwrap();
    assert_eq!(relay.post_url(), "https://hastebin.com/documents");
}

#[tokio::test]
async fn test_from_config_applies_paste_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"key":"slow"}"#)
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.paste.post_url = format!("{}/documents", server.uri());
    config.paste.timeout_secs = 1;
    let relay = PasteRelay::from_config(&config).unwrap();
    let err = relay.try_submit("payload").await.unwrap_err();
    assert!(matches!(err, ChatRelayError::Network(_)));
}

#[tokio::test]
async fn test_blank_payload_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"x"}"#))
        .expect(0)
        .mount(&server)
        .await;

    let relay = relay_for(&server);
    assert_eq!(relay.submit("").await, None);
    assert_eq!(relay.submit("   ").await, None);
    assert_eq!(relay.submit("\n\t").await, None);
}

#[tokio::test]
async fn test_submit_returns_share_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .and(header("content-type", "application/json"))
        .and(body_string("sensor:\n  - platform: template"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"abc123"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let link = relay_for(&server)
        .submit("sensor:\n  - platform: template")
        .await;
    assert_eq!(link, Some("https://hastebin.com/abc123".to_string()));
}

#[tokio::test]
async fn test_submit_sends_ascii_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string("temp: 21?C"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"k1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let link = relay_for(&server).submit("temp: 21°C").await;
    assert_eq!(link, Some("https://hastebin.com/k1".to_string()));
}

#[tokio::test]
async fn test_missing_key_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
        .mount(&server)
        .await;

    assert_eq!(relay_for(&server).submit("payload").await, None);
}

#[tokio::test]
async fn test_empty_key_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":""}"#))
        .mount(&server)
        .await;

    assert_eq!(relay_for(&server).submit("payload").await, None);
}

#[tokio::test]
async fn test_non_string_key_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":42}"#))
        .mount(&server)
        .await;

    assert_eq!(relay_for(&server).submit("payload").await, None);
}

#[tokio::test]
async fn test_non_json_response_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    assert_eq!(relay_for(&server).submit("payload").await, None);
}

#[tokio::test]
async fn test_server_error_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"key":"abc"}"#))
        .mount(&server)
        .await;

    assert_eq!(relay_for(&server).submit("payload").await, None);
}

#[tokio::test]
async fn test_connection_refused_returns_none() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = PasteRelay::new(Client::new(), format!("http://{addr}/documents"), SHARE);
    assert_eq!(relay.submit("payload").await, None);
}

#[tokio::test]
async fn test_try_submit_classifies_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"ok"}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = relay_for(&server).try_submit("payload").await.unwrap_err();
    assert!(matches!(err, ChatRelayError::ProtocolAnomaly(ref m) if m.contains("no usable key")));

    let down = PasteRelay::new(Client::new(), format!("{}/down", server.uri()), SHARE);
    let err = down.try_submit("payload").await.unwrap_err();
    assert!(matches!(err, ChatRelayError::Network(_)));
}

#[tokio::test]
async fn test_try_submit_non_json_is_anomaly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = relay_for(&server).try_submit("payload").await.unwrap_err();
    assert!(matches!(err, ChatRelayError::ProtocolAnomaly(_)));
}

#[tokio::test]
async fn test_route_message_inline_when_within_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"x"}"#))
        .expect(0)
        .mount(&server)
        .await;

    let delivery = route_message("short", LineLimit::default(), &relay_for(&server)).await;
    assert_eq!(delivery, Delivery::Inline("short".to_string()));
}

#[tokio::test]
async fn test_route_message_relays_long_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"long1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let text = vec!["line"; 16].join("\n");
    let delivery = route_message(&text, LineLimit::default(), &relay_for(&server)).await;
    assert_eq!(
        delivery,
        Delivery::Link("https://hastebin.com/long1".to_string())
    );
}

#[tokio::test]
async fn test_route_message_undeliverable_when_relay_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let text = vec!["line"; 3].join("\n");
    let delivery = route_message(&text, LineLimit::new(2), &relay_for(&server)).await;
    assert_eq!(delivery, Delivery::Undeliverable);
}
