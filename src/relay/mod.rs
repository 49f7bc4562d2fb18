//! Relay oversized text to a paste service and hand back a short link.

use crate::config::Config;
use crate::errors::{ChatRelayError, ChatRelayResult};
use crate::lines::LineLimit;
use crate::utils::http::paste_client;
use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Link to a stored paste: `<share_url>/<key>`.
pub fn share_link(share_url: &str, key: &str) -> String {
    format!("{}/{}", share_url.trim_end_matches('/'), key)
}

/// The paste endpoint takes ASCII; anything else is sent as `?`.
fn ascii_bytes(payload: &str) -> Vec<u8> {
    payload
        .chars()
        .map(|c| u8::try_from(c).ok().filter(u8::is_ascii).unwrap_or(b'?'))
        .collect()
}

#[derive(Clone)]
pub struct PasteRelay {
    client: Client,
    post_url: String,
    share_url: String,
}

impl PasteRelay {
    pub fn new(client: Client, post_url: impl Into<String>, share_url: impl Into<String>) -> Self {
        Self {
            client,
            post_url: post_url.into(),
            share_url: share_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = paste_client(config.paste_timeout())?;
        Ok(Self::new(client, &config.paste.post_url, &config.paste.share_url))
    }

    pub fn post_url(&self) -> &str {
        &self.post_url
    }

    /// Store `payload` and return its share link.
    ///
    /// Blank payloads return `None` without touching the network. Every
    /// failure is logged and also returns `None`.
    pub async fn submit(&self, payload: &str) -> Option<String> {
        if payload.trim().is_empty() {
            return None;
        }
        match self.try_submit(payload).await {
            Ok(link) => Some(link),
            Err(ChatRelayError::ProtocolAnomaly(msg)) => {
                warn!("paste service at {} misbehaved: {}", self.post_url, msg);
                None
            }
            Err(e) => {
                error!("paste relay to {} failed: {}", self.post_url, e);
                None
            }
        }
    }

    /// Store `payload` and return its share link, surfacing the failure.
    ///
    /// Transport failures and error statuses are `Network`; a body without a
    /// usable `key` is a `ProtocolAnomaly`. Blank payloads are posted as-is.
    pub async fn try_submit(&self, payload: &str) -> ChatRelayResult<String> {
        let resp = self
            .client
            .post(&self.post_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(ascii_bytes(payload))
            .send()
            .await?
            .error_for_status()?;
        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body).map_err(|_| {
            ChatRelayError::ProtocolAnomaly(format!("non-JSON response body: {}", body))
        })?;

        match json.get("key").and_then(Value::as_str) {
            Some(key) if !key.is_empty() => {
                let link = share_link(&self.share_url, key);
                debug!("relayed {} bytes to {}", payload.len(), link);
                Ok(link)
            }
            _ => Err(ChatRelayError::ProtocolAnomaly(format!(
                "response has no usable key: {}",
                body
            ))),
        }
    }
}

/// How an outbound message should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Short enough to post as-is.
    Inline(String),
    /// Relayed; post the link instead.
    Link(String),
    /// Too long and the relay failed.
    Undeliverable,
}

/// Post `text` inline when it fits `limit`, otherwise relay it.
pub async fn route_message(text: &str, limit: LineLimit, relay: &PasteRelay) -> Delivery {
    if limit.is_within_limit(text) {
        return Delivery::Inline(text.to_string());
    }
    debug!(
        "message exceeds {} lines, relaying",
        limit.effective_limit(text)
    );
    match relay.submit(text).await {
        Some(link) => Delivery::Link(link),
        None => Delivery::Undeliverable,
    }
}

#[cfg(test)]
mod tests;
