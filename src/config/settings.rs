use serde::Deserialize;

use crate::utils::constants::{AUTH_URL, DEFAULT_HTTP_TIMEOUT_MS, MESSAGING_URL_TEMPLATE};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    #[serde(flatten)]
    pub adm: AdmSettings,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// ADM client
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AdmSettings {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// applied by the transport to every request, token exchange included
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

impl Default for AdmSettings {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EndpointsConfig {
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// must contain `{registration_id}`
    #[serde(default = "default_messaging_url_template")]
    pub messaging_url_template: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            messaging_url_template: default_messaging_url_template(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_auth_url() -> String {
    AUTH_URL.to_string()
}

fn default_messaging_url_template() -> String {
    MESSAGING_URL_TEMPLATE.to_string()
}
