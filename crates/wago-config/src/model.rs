// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for wago.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level wago configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WagoConfig {
    /// HTTP API listener and authentication.
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// Inbound event store sizing.
    #[serde(default)]
    pub store: StoreConfig,

    /// Inbound message filtering and chat commands.
    #[serde(default)]
    pub inbound: InboundConfig,

    /// Operator webhook receiving inbound messages.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// WhatsApp Cloud API credentials.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

/// HTTP API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared key expected in `X-API-Key`. When unset every protected
    /// route answers 403.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bound on a single outbound send.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl ApiConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("send_timeout_secs", &self.send_timeout_secs)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_send_timeout_secs() -> u64 {
    15
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Event store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Number of most recent inbound messages retained.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    1000
}

/// Inbound adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InboundConfig {
    /// Messages older than process start minus this window are dropped as
    /// replayed history.
    #[serde(default = "default_replay_grace_ms")]
    pub replay_grace_ms: u64,

    /// Log messages whose content could not be classified.
    #[serde(default)]
    pub log_unknown: bool,

    /// Answer `!ping` and `!id` chat commands.
    #[serde(default = "default_true")]
    pub commands: bool,
}

impl InboundConfig {
    pub fn replay_grace(&self) -> Duration {
        Duration::from_millis(self.replay_grace_ms)
    }
}

impl Default for InboundConfig {
    fn default() -> Self {
        Self {
            replay_grace_ms: default_replay_grace_ms(),
            log_unknown: false,
            commands: true,
        }
    }
}

fn default_replay_grace_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

/// Operator webhook configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Endpoint receiving inbound messages. Unset disables delivery.
    #[serde(default)]
    pub url: Option<String>,

    /// HMAC-SHA256 key for `X-Wago-Signature`. Unset disables signing.
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default = "default_webhook_timeout_secs")]
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured URL, treating an empty string as unset.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            secret: None,
            timeout_secs: default_webhook_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url)
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_webhook_timeout_secs() -> u64 {
    5
}

/// WhatsApp Cloud API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Business phone number ID messages are sent from.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Long-lived access token. Required when `phone_number_id` is set.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token for the callback subscription handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// App secret for callback signature verification.
    #[serde(default)]
    pub app_secret: Option<String>,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            phone_number_id: None,
            access_token: None,
            verify_token: None,
            app_secret: None,
        }
    }
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "[redacted]");
        f.debug_struct("WhatsAppConfig")
            .field("api_base", &self.api_base)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &redact(&self.access_token))
            .field("verify_token", &redact(&self.verify_token))
            .field("app_secret", &redact(&self.app_secret))
            .finish()
    }
}

fn default_api_base() -> String {
    "https://graph.facebook.com/v21.0".to_string()
}
