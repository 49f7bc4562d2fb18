use crate::config::Config;
use crate::errors::{ChatRelayError, ChatRelayResult};
use anyhow::{Context, Result, bail};
use reqwest::{Client, Response, redirect, tls};
use std::time::Duration;
use tracing::{debug, error};

/// Default maximum body size for streaming downloads (10 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Redirects followed automatically by the text fetcher.
pub const MAX_FETCH_REDIRECTS: usize = 10;

/// Client for paste uploads. Connect timeout is capped at 10 s.
pub fn paste_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(format!("chatrelay/{}", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
        .context("failed to build paste HTTP client")
}

/// Client for redirect probes: automatic redirect following is disabled so
/// every 3xx reaches the caller with its `Location` header.
pub fn probe_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(format!("chatrelay/{}", env!("CARGO_PKG_VERSION")))
        .redirect(redirect::Policy::none())
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .context("failed to build probe HTTP client")
}

/// Client for plain text downloads: fixed user agent, TLS 1.2 minimum.
pub fn fetch_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .min_tls_version(tls::Version::TLS_1_2)
        .redirect(redirect::Policy::limited(MAX_FETCH_REDIRECTS))
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
        .context("failed to build fetch HTTP client")
}

/// Download a response body as bytes with a size limit.
///
/// - Checks the `Content-Length` header first; rejects immediately if over limit.
/// - Streams via `chunk()` with a running counter; truncates at the limit.
/// - Returns `(bytes, was_truncated)`.
pub async fn limited_body(resp: Response, max_bytes: usize) -> Result<(Vec<u8>, bool)> {
    if let Some(cl) = resp.content_length()
        && u64::try_from(max_bytes).is_ok_and(|max| cl > max)
    {
        bail!(
            "response body too large: Content-Length {} exceeds limit {}",
            cl,
            max_bytes
        );
    }

    let mut buf = Vec::new();
    let mut stream = resp;
    while let Some(chunk) = stream.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            let remaining = max_bytes.saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..remaining]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}

/// Download a response body as a UTF-8 string with a size limit.
///
/// Same semantics as [`limited_body`] but converts the result to a `String`
/// and appends a `\n[truncated]` marker when the body exceeds the limit.
pub async fn limited_text(resp: Response, max_bytes: usize) -> Result<String> {
    let (bytes, truncated) = limited_body(resp, max_bytes).await?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if truncated {
        text.push_str("\n[truncated]");
    }
    Ok(text)
}

/// Fetches a URL body as text, swallowing every failure into an empty string.
#[derive(Clone)]
pub struct TextFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl TextFetcher {
    pub fn new(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = fetch_client(&config.fetch.user_agent, config.fetch_timeout())?;
        Ok(Self::new(client, config.fetch.max_body_bytes))
    }

    /// GET `url` and return its body, or an empty string on any failure.
    pub async fn fetch_text(&self, url: &str) -> String {
        match self.try_fetch_text(url).await {
            Ok(text) => text,
            Err(e) => {
                error!("error downloading url {}: {}", url, e);
                String::new()
            }
        }
    }

    /// GET `url` and return its body. Bad URLs are `Format` errors, transport
    /// failures and error statuses are `Network`.
    pub async fn try_fetch_text(&self, url: &str) -> ChatRelayResult<String> {
        let parsed = url::Url::parse(url)
            .map_err(|e| ChatRelayError::Format(format!("invalid URL '{}': {}", url, e)))?;
        let resp = self
            .client
            .get(parsed)
            .send()
            .await?
            .error_for_status()?;
        debug!("fetched {} ({})", url, resp.status());
        Ok(limited_text(resp, self.max_body_bytes).await?)
    }
}
