// Shared test helpers — not all items used by every test binary.
#![allow(unused)]

use chatrelay::config::{Config, load_config};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SHARE_HOST: &str = "https://paste.test";

/// Paste service double answering every POST /documents with `key`.
pub async fn paste_server(key: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!(r#"{{"key":"{}"}}"#, key)),
        )
        .mount(&server)
        .await;
    server
}

/// Write a config.json pointing the relay at `server` and load it back.
pub fn config_for(server: &MockServer, extra: serde_json::Value) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("config.json");
    let mut data = serde_json::json!({
        "paste": {
            "postUrl": format!("{}/documents", server.uri()),
            "shareUrl": SHARE_HOST
        },
        "redirect": {"timeoutSecs": 5}
    });
    if let (Some(base), Some(extra)) = (data.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    std::fs::write(&path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
    let config = load_config(Some(path.as_path())).unwrap();
    (dir, config)
}

pub fn numbered_lines(n: usize) -> String {
    (1..=n)
        .map(|i| format!("- item{}", i))
        .collect::<Vec<_>>()
        .join("\n")
}
