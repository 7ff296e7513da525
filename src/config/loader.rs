use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::service::ServiceConfig;
use crate::config::settings::LoggingConfig;
use crate::config::validator::validate_service_config;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read config file {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    expand_config_env_vars(&mut service_config)?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    validate_service_config(&service_config)
        .map_err(|errors| anyhow!("config is not valid: {}", errors.join("; ")))?;

    Ok(service_config)
}

/// Expands env placeholders in the string fields once the YAML is parsed, so
/// values are never re-read as YAML.
fn expand_config_env_vars(service_config: &mut ServiceConfig) -> Result<()> {
    let credentials = &mut service_config.credentials;
    let endpoints = &mut service_config.settings.adm.endpoints;
    for field in [
        &mut credentials.client_id,
        &mut credentials.client_secret,
        &mut endpoints.auth_url,
        &mut endpoints.messaging_url_template,
    ] {
        *field = expand_env_vars(field)?;
    }
    if let Some(logging) = service_config.settings.logging.as_mut() {
        logging.level = expand_env_vars(&logging.level)?;
    }
    Ok(())
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}
