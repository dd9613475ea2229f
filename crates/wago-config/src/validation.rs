// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::WagoConfig;

/// Largest accepted `store.capacity`.
pub const MAX_STORE_CAPACITY: usize = 100_000;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &WagoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.api.host.trim().is_empty() {
        fail("api.host must not be empty".to_string());
    }

    if config.api.send_timeout_secs == 0 {
        fail("api.send_timeout_secs must be greater than 0".to_string());
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "log.level `{}` is not one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    let capacity = config.store.capacity;
    if !(1..=MAX_STORE_CAPACITY).contains(&capacity) {
        fail(format!(
            "store.capacity must be between 1 and {MAX_STORE_CAPACITY}, got {capacity}"
        ));
    }

    if let Some(url) = config.webhook.url()
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        fail(format!("webhook.url `{url}` must start with http:// or https://"));
    }

    if config.webhook.timeout_secs == 0 {
        fail("webhook.timeout_secs must be greater than 0".to_string());
    }

    let whatsapp = &config.whatsapp;
    if whatsapp.phone_number_id.as_deref().is_some_and(|id| !id.is_empty())
        && whatsapp.access_token.as_deref().is_none_or(str::is_empty)
    {
        fail("whatsapp.access_token is required when whatsapp.phone_number_id is set".to_string());
    }

    if !(whatsapp.api_base.starts_with("http://") || whatsapp.api_base.starts_with("https://")) {
        fail(format!(
            "whatsapp.api_base `{}` must start with http:// or https://",
            whatsapp.api_base
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
