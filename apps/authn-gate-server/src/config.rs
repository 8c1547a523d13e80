//! Server configuration: a YAML file overlaid with `AUTHN_GATE__*` env vars.

use std::path::Path;

use anyhow::Context;
use authn_gate::AuthnGateConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use jwt_authn_plugin::JwtAuthNPluginConfig;
use serde::Deserialize;
use static_authn_plugin::StaticAuthNPluginConfig;

/// Prefix of environment overrides; `__` separates nested keys,
/// e.g. `AUTHN_GATE__GATE__CONTEXT_HEADER=x-uid`.
pub const ENV_PREFIX: &str = "AUTHN_GATE__";

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub gate: AuthnGateConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl ServerConfig {
    /// Load configuration from an optional YAML file plus the environment.
    ///
    /// # Errors
    /// Returns an error if the file is missing or any value fails to
    /// deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(&figment)
    }

    /// # Errors
    /// Returns an error if the merged configuration does not deserialize.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("failed to load authn-gate server configuration")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Which plugin backs the token and session providers.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvidersConfig {
    Static(StaticAuthNPluginConfig),
    Jwt(JwtAuthNPluginConfig),
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self::Static(StaticAuthNPluginConfig::default())
    }
}
