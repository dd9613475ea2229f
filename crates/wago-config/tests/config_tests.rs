// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the wago configuration system.

use figment::Jail;
use wago_config::diagnostic::ConfigError;
use wago_config::model::WagoConfig;
use wago_config::{
    load_and_validate, load_and_validate_path, load_and_validate_str, load_config,
    load_config_from_str,
};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[api]
host = "127.0.0.1"
port = 9000
api_key = "k"
send_timeout_secs = 20

[log]
level = "debug"

[store]
capacity = 50

[inbound]
replay_grace_ms = 500
log_unknown = true
commands = false

[webhook]
url = "https://example.com/hook"
secret = "s"
timeout_secs = 3

[whatsapp]
api_base = "https://graph.facebook.com/v22.0"
phone_number_id = "1234"
access_token = "tok"
verify_token = "verify"
app_secret = "app"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.api.bind_address(), "127.0.0.1:9000");
    assert_eq!(config.api.api_key.as_deref(), Some("k"));
    assert_eq!(config.api.send_timeout_secs, 20);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.store.capacity, 50);
    assert_eq!(config.inbound.replay_grace_ms, 500);
    assert!(config.inbound.log_unknown);
    assert!(!config.inbound.commands);
    assert_eq!(config.webhook.url(), Some("https://example.com/hook"));
    assert_eq!(config.webhook.timeout_secs, 3);
    assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("1234"));
    assert_eq!(config.whatsapp.app_secret.as_deref(), Some("app"));
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = WagoConfig::default();
    assert_eq!(config.api.port, defaults.api.port);
    assert_eq!(config.store.capacity, 1000);
    assert_eq!(config.inbound.replay_grace_ms, 2000);
    assert!(config.webhook.url.is_none());
}

#[test]
fn unknown_key_is_rejected_with_suggestion() {
    let toml = "[api]\nprot = 9000\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key must fail");
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            span,
            ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
            assert!(valid_keys.contains("send_timeout_secs"));
            assert!(span.is_some());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let errors = load_and_validate_str("[storage]\ndsn = \"x\"\n").expect_err("must fail");
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "storage"));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[api]\nport = \"eighty\"\n").expect_err("must fail");
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "api.port"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn validation_errors_surface_from_str() {
    let errors = load_and_validate_str("[store]\ncapacity = 0\n[log]\nlevel = \"chatty\"\n")
        .expect_err("must fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn config_error_renders_with_miette() {
    let errors = load_and_validate_str("[webhook]\nurll = \"https://x\"\n").unwrap_err();
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    handler
        .render_report(&mut out, &errors[0] as &dyn miette::Diagnostic)
        .unwrap();
    assert!(out.contains("wago::config::unknown_key"), "{out}");
    assert!(out.contains("did you mean `url`"), "{out}");
}

#[test]
fn local_file_and_env_layers_override_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "wago.toml",
            r#"
[api]
port = 7000
api_key = "from-file"

[webhook]
url = "https://file.example.com"
"#,
        )?;
        jail.set_env("PORT", "7100");
        jail.set_env("WEBHOOK_SECRET", "legacy-secret");
        jail.set_env("WAGO_API_API_KEY", "from-env");
        jail.set_env("WAGO_WHATSAPP_PHONE_NUMBER_ID", "555");
        jail.set_env("WAGO_WHATSAPP_ACCESS_TOKEN", "tok");

        let config = load_config()?;
        assert_eq!(config.api.port, 7100);
        assert_eq!(config.api.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.webhook.url(), Some("https://file.example.com"));
        assert_eq!(config.webhook.secret.as_deref(), Some("legacy-secret"));
        assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("555"));
        Ok(())
    });
}

#[test]
fn numeric_env_values_stay_strings() {
    Jail::expect_with(|jail| {
        jail.set_env("API_KEY", "12345678");
        jail.set_env("WEBHOOK_SECRET", "987654");
        jail.set_env("WAGO_WHATSAPP_PHONE_NUMBER_ID", "106540352242922");
        jail.set_env("WAGO_WHATSAPP_ACCESS_TOKEN", "0042");
        jail.set_env("WAGO_WHATSAPP_VERIFY_TOKEN", "true");

        let config = load_config()?;
        assert_eq!(config.api.api_key.as_deref(), Some("12345678"));
        assert_eq!(config.webhook.secret.as_deref(), Some("987654"));
        assert_eq!(
            config.whatsapp.phone_number_id.as_deref(),
            Some("106540352242922")
        );
        assert_eq!(config.whatsapp.access_token.as_deref(), Some("0042"));
        assert_eq!(config.whatsapp.verify_token.as_deref(), Some("true"));
        Ok(())
    });
}

#[test]
fn prefixed_numeric_key_beats_legacy_key() {
    Jail::expect_with(|jail| {
        jail.set_env("API_KEY", "0001");
        jail.set_env("WAGO_API_API_KEY", "2222");
        let config = load_config()?;
        assert_eq!(config.api.api_key.as_deref(), Some("2222"));
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_env() {
    Jail::expect_with(|jail| {
        jail.set_env("PORT", "7100");
        jail.set_env("WAGO_API_PORT", "7200");
        let config = load_config()?;
        assert_eq!(config.api.port, 7200);
        Ok(())
    });
}

#[test]
fn load_and_validate_reports_env_validation_errors() {
    Jail::expect_with(|jail| {
        jail.set_env("WAGO_STORE_CAPACITY", "0");
        let errors = load_and_validate().expect_err("capacity 0 is invalid");
        assert!(errors[0].to_string().contains("store.capacity"));
        Ok(())
    });
}

#[test]
fn explicit_path_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[store]\ncapacity = 42\n")?;
        let config = load_and_validate_path(&jail.directory().join("custom.toml"))
            .expect("valid explicit config");
        assert_eq!(config.store.capacity, 42);
        Ok(())
    });
}

#[test]
fn explicit_missing_path_is_an_error() {
    Jail::expect_with(|jail| {
        let errors = load_and_validate_path(&jail.directory().join("nope.toml"))
            .expect_err("missing file must fail");
        assert!(errors[0].to_string().contains("does not exist"));
        Ok(())
    });
}
