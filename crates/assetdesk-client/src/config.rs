//! Client configuration.

use std::time::Duration;

use crate::error::ClientError;

/// Environment variable that overrides the backend base URL.
pub const API_BASE_ENV: &str = "ASSETDESK_API_BASE_URL";

/// Backend base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Delay between two revealed characters of an assistant answer.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(20);

/// Path of the assistant chat endpoint, relative to the base URL.
const CHAT_PATH: &str = "/ws/chat";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (`http://` or `https://`), without trailing slash.
    pub api_base_url: String,

    /// Typewriter cadence for assistant answers.
    pub reveal_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL.
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Default config, with the base URL taken from [`API_BASE_ENV`] when set.
    pub fn from_env() -> Self {
        match std::env::var(API_BASE_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Set the reveal cadence.
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// WebSocket URL of the assistant chat: the base URL with `http` upgraded
    /// to `ws` (and `https` to `wss`), plus `/ws/chat`.
    pub fn chat_url(&self) -> Result<String, ClientError> {
        let base = self.api_base_url.trim_end_matches('/');
        let upgraded = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            return Err(ClientError::InvalidUrl(format!(
                "expected an http:// or https:// base URL, got '{}'",
                self.api_base_url
            )));
        };
        Ok(format!("{}{}", upgraded, CHAT_PATH))
    }
}
