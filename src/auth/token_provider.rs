use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use tracing::{debug, info, warn};

use crate::auth::credentials::Credentials;
use crate::auth::token::AccessToken;
use crate::error::{AdmError, Result};
use crate::observability::metrics::{get_metrics, RESULT_OK, RESULT_REJECTED, RESULT_TRANSPORT_ERROR};
use crate::parser::json_field::string_field;
use crate::transport::{HttpTransport, OutboundRequest};
use crate::utils::constants::{
    FIELD_ACCESS_TOKEN, FORM_CONTENT_TYPE, GRANT_TYPE_CLIENT_CREDENTIALS, SCOPE_MESSAGING_PUSH,
};

/// Exchanges client credentials for a bearer token at the authorization endpoint.
///
/// Holds no token itself; the dispatcher owns the cached slot.
#[derive(Debug, Clone)]
pub struct TokenProvider<T> {
    transport: T,
    auth_url: String,
}

impl<T: HttpTransport> TokenProvider<T> {
    pub fn new(transport: T, auth_url: impl Into<String>) -> Self {
        Self {
            transport,
            auth_url: auth_url.into(),
        }
    }

    pub async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let metrics = get_metrics().await;
        let body = token_request_body(credentials)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        debug!(url = %self.auth_url, client_id = %credentials.client_id, "requesting access token");
        let response = self
            .transport
            .post(OutboundRequest::new(self.auth_url.clone(), headers, body.into_bytes()))
            .await
            .inspect_err(|_| {
                metrics.token_fetch_requests.with_label_values(&[RESULT_TRANSPORT_ERROR]).inc();
            })?;

        let status = response.status.as_u16();
        if response.status != StatusCode::OK {
            warn!(status, "access token request rejected");
            metrics.token_fetch_requests.with_label_values(&[RESULT_REJECTED]).inc();
            return Err(AdmError::Authentication {
                status,
                message: response.body,
            });
        }

        let token = string_field(&response.body, FIELD_ACCESS_TOKEN).filter(|token| !token.is_empty());
        let Some(value) = token else {
            warn!(status, "token response has no usable '{}' field", FIELD_ACCESS_TOKEN);
            metrics.token_fetch_requests.with_label_values(&[RESULT_REJECTED]).inc();
            return Err(AdmError::Authentication {
                status,
                message: response.body,
            });
        };

        metrics.token_fetch_requests.with_label_values(&[RESULT_OK]).inc();
        info!(client_id = %credentials.client_id, "access token obtained");
        Ok(AccessToken::new(value))
    }
}

/// Percent-encoded `client_credentials` form for the ADM token endpoint.
pub fn token_request_body(credentials: &Credentials) -> Result<String> {
    if credentials.client_id.is_empty() {
        return Err(AdmError::InvalidInput("client_id must not be empty".to_owned()));
    }
    if credentials.client_secret.is_empty() {
        return Err(AdmError::InvalidInput("client_secret must not be empty".to_owned()));
    }

    let form = [
        ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
        ("scope", SCOPE_MESSAGING_PUSH),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];
    serde_urlencoded::to_string(&form[..])
        .map_err(|e| AdmError::InvalidInput(format!("credentials cannot be form-encoded: {}", e)))
}
