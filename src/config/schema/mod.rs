use crate::errors::ChatRelayError;
use crate::lines::{DEFAULT_MAX_LINES, LineLimit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// Settings key consulted for the base line limit when `messages.maxLinesLimit` is unset.
pub const MAX_LINES_SETTING: &str = "maxLinesLimit";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessagesConfig {
    /// Base line limit for inline messages. Falls back to the `maxLinesLimit`
    /// setting, then to 15.
    #[serde(default, rename = "maxLinesLimit")]
    pub max_lines_limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Paste relay
// ---------------------------------------------------------------------------

fn default_paste_post_url() -> String {
    "https://hastebin.com/documents".to_string()
}

fn default_paste_share_url() -> String {
    "https://hastebin.com".to_string()
}

fn default_paste_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteConfig {
    /// Endpoint receiving the raw payload.
    #[serde(default = "default_paste_post_url", rename = "postUrl")]
    pub post_url: String,
    /// Base of the retrieval link; the returned key is appended as a path segment.
    #[serde(default = "default_paste_share_url", rename = "shareUrl")]
    pub share_url: String,
    #[serde(default = "default_paste_timeout", rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            post_url: default_paste_post_url(),
            share_url: default_paste_share_url(),
            timeout_secs: default_paste_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text fetch
// ---------------------------------------------------------------------------

fn default_user_agent() -> String {
    "HassBot by @skalavala".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    crate::utils::http::DEFAULT_MAX_BODY_BYTES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent", rename = "userAgent")]
    pub user_agent: String,
    #[serde(default = "default_fetch_timeout", rename = "timeoutSecs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_body_bytes", rename = "maxBodyBytes")]
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_fetch_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Redirect resolution
// ---------------------------------------------------------------------------

fn default_probe_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Per-probe timeout. The hop limit itself is fixed.
    #[serde(default = "default_probe_timeout", rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub paste: PasteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    /// Free-form application settings (string or number values).
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Look up an integer application setting.
    ///
    /// A missing key yields `default` unless `required` is set. Values may be
    /// JSON integers or strings holding an integer.
    pub fn setting_int(&self, key: &str, required: bool, default: i64) -> Result<i64, ChatRelayError> {
        let Some(value) = self.settings.get(key) else {
            if required {
                return Err(ChatRelayError::Config(format!(
                    "settings.{key} is required but not set"
                )));
            }
            return Ok(default);
        };
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            ChatRelayError::Config(format!("settings.{key} must be an integer, got {value}"))
        })
    }

    /// Base line limit: `messages.maxLinesLimit`, else the `maxLinesLimit` setting, else 15.
    pub fn max_lines_limit(&self) -> Result<usize, ChatRelayError> {
        if let Some(limit) = self.messages.max_lines_limit {
            return Ok(limit);
        }
        let value = self.setting_int(
            MAX_LINES_SETTING,
            false,
            i64::try_from(DEFAULT_MAX_LINES).unwrap_or(i64::MAX),
        )?;
        usize::try_from(value).map_err(|_| {
            ChatRelayError::Config(format!("settings.{MAX_LINES_SETTING} must not be negative"))
        })
    }

    pub fn line_limit(&self) -> Result<LineLimit, ChatRelayError> {
        Ok(LineLimit::new(self.max_lines_limit()?))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    pub fn paste_timeout(&self) -> Duration {
        Duration::from_secs(self.paste.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.redirect.timeout_secs)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ChatRelayError> {
        self.validate_messages()?;
        self.validate_paste()?;
        self.validate_fetch()?;
        if self.redirect.timeout_secs == 0 {
            return Err(ChatRelayError::Config(
                "redirect.timeoutSecs must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_messages(&self) -> Result<(), ChatRelayError> {
        let limit = self.max_lines_limit()?;
        if limit == 0 {
            return Err(ChatRelayError::Config(
                "messages.maxLinesLimit must be > 0".into(),
            ));
        }
        if limit > 1000 {
            warn!("maxLinesLimit is very large ({}), messages will rarely be relayed", limit);
        }
        Ok(())
    }

    fn validate_paste(&self) -> Result<(), ChatRelayError> {
        validate_http_url("paste.postUrl", &self.paste.post_url)?;
        validate_http_url("paste.shareUrl", &self.paste.share_url)?;
        if self.paste.timeout_secs == 0 {
            return Err(ChatRelayError::Config(
                "paste.timeoutSecs must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_fetch(&self) -> Result<(), ChatRelayError> {
        let f = &self.fetch;
        if f.user_agent.trim().is_empty() {
            return Err(ChatRelayError::Config(
                "fetch.userAgent must not be empty".into(),
            ));
        }
        if f.timeout_secs == 0 {
            return Err(ChatRelayError::Config(
                "fetch.timeoutSecs must be > 0".into(),
            ));
        }
        if f.max_body_bytes == 0 {
            return Err(ChatRelayError::Config(
                "fetch.maxBodyBytes must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ChatRelayError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ChatRelayError::Config(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ChatRelayError::Config(format!(
            "{field} must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}
