//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - endpoints must be absolute http(s) URLs
//! - the messaging template must carry the registration id placeholder

use reqwest::Url;
use tracing::{error, info};

use crate::config::service::ServiceConfig;
use crate::config::settings::{AdmSettings, LoggingConfig};
use crate::utils::constants::REGISTRATION_ID_PLACEHOLDER;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_adm_settings(&cfg.settings.adm, &mut errors);
    if let Some(logging) = &cfg.settings.logging {
        validate_logging(logging, &mut errors);
    }

    if cfg.credentials.client_id.trim().is_empty() {
        errors.push("credentials.client_id must not be empty".to_string());
    }
    if cfg.credentials.client_secret.trim().is_empty() {
        errors.push("credentials.client_secret must not be empty".to_string());
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

pub fn validate_adm_settings(settings: &AdmSettings, errors: &mut Vec<String>) {
    validate_url("settings.endpoints.auth_url", &settings.endpoints.auth_url, errors);

    let template = &settings.endpoints.messaging_url_template;
    if !template.contains(REGISTRATION_ID_PLACEHOLDER) {
        errors.push(format!(
            "settings.endpoints.messaging_url_template must contain '{}'",
            REGISTRATION_ID_PLACEHOLDER
        ));
    }
    validate_url(
        "settings.endpoints.messaging_url_template",
        &template.replace(REGISTRATION_ID_PLACEHOLDER, "registration"),
        errors,
    );

    if settings.http_timeout_ms == 0 {
        errors.push("settings.http_timeout_ms must be > 0".to_string());
    }
}

fn validate_url(field: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {}
        Ok(url) => errors.push(format!("{} has unsupported scheme '{}'", field, url.scheme())),
        Err(e) => errors.push(format!("{} is not a valid URL: {}", field, e)),
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}
