//! Canonicalize a URL by walking its redirect chain with HEAD probes.
//!
//! Each hop issues one HEAD request with automatic redirects disabled, reads
//! the status and `Location` header, and drops the response before the next
//! hop. The walk stops after [`MAX_HOPS`] probes whatever the server does.
//!
//! Failures degrade instead of erroring: a transport failure or a redirect
//! without `Location` yields the URL being probed at that point. A `Location`
//! that is not valid UTF-8 is decoded lossily and followed. Only input that
//! cannot be probed at all (unparseable URL, non-http scheme, unresolvable
//! `Location` value) produces [`Resolution::Failed`].

use crate::config::Config;
use crate::utils::http::probe_client;
use anyhow::Result;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// Upper bound on probe requests per resolution.
pub const MAX_HOPS: usize = 8;

/// One probe: the URL requested, the status seen (`None` on transport
/// failure) and the raw `Location` header if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub url: String,
    pub status: Option<u16>,
    pub location: Option<String>,
}

/// The probes performed during one resolution, in order. Never longer than [`MAX_HOPS`].
#[derive(Debug, Clone, Default)]
pub struct RedirectChain {
    hops: Vec<Hop>,
}

impl RedirectChain {
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Number of hops that answered with a followed redirect status.
    pub fn redirects(&self) -> usize {
        self.hops
            .iter()
            .filter(|hop| {
                hop.status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .is_some_and(is_followed_redirect)
                    && hop.location.is_some()
            })
            .count()
    }

    fn push(&mut self, hop: Hop) {
        debug_assert!(self.hops.len() < MAX_HOPS);
        self.hops.push(hop);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Failed,
}

impl Resolution {
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Resolved(url) => Some(url),
            Self::Failed => None,
        }
    }
}

enum Step {
    Redirected(String),
    Done(Resolution),
}

/// 301, 302, 303 and 307 are followed; every other status ends the walk.
fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
    )
}

fn parse_http_url(url: &str) -> Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| format!("invalid URL '{}': {}", url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", parsed.scheme()));
    }
    Ok(parsed)
}

/// A `Location` without `://` is relative to the URL that returned it.
fn absolutize(base: &Url, location: &str) -> Result<String, String> {
    if location.contains("://") {
        return Ok(location.to_string());
    }
    base.join(location)
        .map(String::from)
        .map_err(|e| format!("cannot resolve Location '{}' against {}: {}", location, base, e))
}

#[derive(Clone)]
pub struct RedirectResolver {
    client: Client,
}

impl RedirectResolver {
    /// `client` must have automatic redirects disabled (see [`probe_client`]).
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(probe_client(config.probe_timeout())?))
    }

    /// Final URL of `url`'s redirect chain, or `None` when it cannot be probed.
    /// Blank input is returned unchanged.
    pub async fn resolve(&self, url: &str) -> Option<String> {
        self.resolve_chain(url).await.0.into_url()
    }

    /// Like [`resolve`](Self::resolve) but passes an absent URL through as absent.
    pub async fn resolve_optional(&self, url: Option<&str>) -> Option<String> {
        match url {
            Some(url) => self.resolve(url).await,
            None => None,
        }
    }

    /// Resolve `url` and return the probes that were made along the way.
    pub async fn resolve_chain(&self, url: &str) -> (Resolution, RedirectChain) {
        let mut chain = RedirectChain::default();
        if url.trim().is_empty() {
            return (Resolution::Resolved(url.to_string()), chain);
        }

        let mut current = url.to_string();
        for _ in 0..MAX_HOPS {
            match self.step(&current, &mut chain).await {
                Step::Redirected(next) => current = next,
                Step::Done(resolution) => return (resolution, chain),
            }
        }

        debug!("hop limit ({}) reached, stopping at {}", MAX_HOPS, current);
        (Resolution::Resolved(current), chain)
    }

    async fn step(&self, current: &str, chain: &mut RedirectChain) -> Step {
        let target = match parse_http_url(current) {
            Ok(target) => target,
            Err(e) => {
                warn!("redirect resolution failed: {}", e);
                return Step::Done(Resolution::Failed);
            }
        };

        let resp = match self.client.head(target.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("probe of {} failed, keeping last known URL: {}", current, e);
                chain.push(Hop {
                    url: current.to_string(),
                    status: None,
                    location: None,
                });
                return Step::Done(Resolution::Resolved(current.to_string()));
            }
        };

        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        // Release the connection before the next hop.
        drop(resp);

        debug!(
            "probe {} -> {} (location: {:?})",
            current,
            status.as_u16(),
            location
        );
        chain.push(Hop {
            url: current.to_string(),
            status: Some(status.as_u16()),
            location: location.clone(),
        });

        if !is_followed_redirect(status) {
            return Step::Done(Resolution::Resolved(current.to_string()));
        }
        let Some(location) = location else {
            warn!("{} from {} without Location header", status, current);
            return Step::Done(Resolution::Resolved(current.to_string()));
        };
        match absolutize(&target, &location) {
            Ok(next) => Step::Redirected(next),
            Err(e) => {
                warn!("redirect resolution failed: {}", e);
                Step::Done(Resolution::Failed)
            }
        }
    }
}
