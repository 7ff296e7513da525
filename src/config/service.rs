use serde::Deserialize;

use crate::auth::credentials::Credentials;
use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub credentials: Credentials,
}
