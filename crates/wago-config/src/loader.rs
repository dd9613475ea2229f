// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/wago/wago.toml`
//! 3. `~/.config/wago/wago.toml`
//! 4. `./wago.toml`, or the explicit path given to [`load_config_from_path`]
//! 5. Plain `PORT`, `API_KEY`, `WEBHOOK_URL`, `WEBHOOK_SECRET`
//! 6. `WAGO_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WagoConfig;

/// Top-level sections, used to map `WAGO_<SECTION>_<KEY>` to `section.key`.
pub const SECTIONS: &[&str] = &["api", "log", "store", "inbound", "webhook", "whatsapp"];

/// Unprefixed variables honoured for compatibility with older deployments.
pub const LEGACY_ENV_VARS: &[&str] = &["PORT", "API_KEY", "WEBHOOK_URL", "WEBHOOK_SECRET"];

/// String-typed keys whose env values must not be parsed as numbers or
/// booleans.
pub const STRING_KEYS: &[&str] = &[
    "api.host",
    "api.api_key",
    "log.level",
    "webhook.url",
    "webhook.secret",
    "whatsapp.api_base",
    "whatsapp.phone_number_id",
    "whatsapp.access_token",
    "whatsapp.verify_token",
    "whatsapp.app_secret",
];

pub const SYSTEM_CONFIG_PATH: &str = "/etc/wago/wago.toml";
pub const LOCAL_CONFIG_PATH: &str = "wago.toml";

/// `~/.config/wago/wago.toml`, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wago/wago.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<WagoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<WagoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WagoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file with env var overrides.
///
/// Unlike [`load_config`], a missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<WagoConfig, figment::Error> {
    if !path.is_file() {
        return Err(figment::Error::from(format!(
            "config file `{}` does not exist",
            path.display()
        )));
    }
    Figment::new()
        .merge(Serialized::defaults(WagoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_layers())
        .extract()
}

/// The full figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WagoConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_layers())
}

/// Legacy then `WAGO_*` variables.
///
/// figment parses env values as TOML-like scalars, so `API_KEY=0042` would
/// become the integer 42. Each layer is therefore followed by the same
/// variables' raw text for the keys listed in [`STRING_KEYS`].
fn env_layers() -> Figment {
    let mut figment = Figment::new();
    for env in [legacy_env_provider(), env_provider()] {
        let verbatim: Vec<(String, String)> = env
            .iter()
            .filter(|(key, _)| is_string_key(key.as_str()))
            .map(|(key, value)| (key.as_str().to_string(), value))
            .collect();
        figment = figment.merge(env);
        for (key, value) in verbatim {
            figment = figment.merge(Serialized::default(&key, value));
        }
    }
    figment
}

fn is_string_key(key: &str) -> bool {
    STRING_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn legacy_env_provider() -> Env {
    Env::raw().only(LEGACY_ENV_VARS).map(|key| {
        let mapped = match key.as_str().to_ascii_uppercase().as_str() {
            "PORT" => "api.port",
            "API_KEY" => "api.api_key",
            "WEBHOOK_URL" => "webhook.url",
            "WEBHOOK_SECRET" => "webhook.secret",
            _ => return key.as_str().to_string().into(),
        };
        mapped.into()
    })
}

/// `WAGO_*` variables, mapped with `Env::map` rather than `Env::split("_")`
/// because key names themselves contain underscores:
/// `WAGO_WHATSAPP_PHONE_NUMBER_ID` is `whatsapp.phone_number_id`.
fn env_provider() -> Env {
    Env::prefixed("WAGO_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env key such as `webhook_timeout_secs` to its
/// dotted config path. Keys without a known section are returned unchanged.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(*section).and_then(|r| r.strip_prefix('_'))
            && !rest.is_empty()
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
