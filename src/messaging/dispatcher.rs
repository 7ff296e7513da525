use std::time::Instant;

use http::StatusCode;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::credentials::Credentials;
use crate::auth::token::AccessToken;
use crate::auth::token_provider::TokenProvider;
use crate::config::settings::AdmSettings;
use crate::error::{AdmError, Result};
use crate::messaging::outcome::DeliveryOutcome;
use crate::messaging::request::DeliveryRequest;
use crate::observability::metrics::{
    get_metrics, RESULT_CANONICAL_CHANGED, RESULT_DELIVERED, RESULT_REJECTED,
    RESULT_TRANSPORT_ERROR, RESULT_UNAUTHORIZED,
};
use crate::parser::json_field::string_field;
use crate::transport::{HttpTransport, RawResponse, ReqwestTransport};
use crate::utils::constants::FIELD_REGISTRATION_ID;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    AfterRefresh,
}

/// Sends messages to ADM with a cached bearer token and one transparent
/// re-authentication when the token is rejected.
///
/// The token slot lives as long as the dispatcher. Reading and refreshing it
/// happen under one lock, so concurrent callers that all see a 401 trigger a
/// single refresh.
pub struct MessageDispatcher<T = ReqwestTransport> {
    tokens: TokenProvider<T>,
    transport: T,
    messaging_url_template: String,
    cached_token: Mutex<Option<AccessToken>>,
}

impl MessageDispatcher<ReqwestTransport> {
    pub fn from_settings(settings: &AdmSettings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.http_timeout_ms)?;
        Ok(Self::with_transport(transport, settings))
    }
}

impl<T: HttpTransport + Clone> MessageDispatcher<T> {
    pub fn with_transport(transport: T, settings: &AdmSettings) -> Self {
        Self {
            tokens: TokenProvider::new(transport.clone(), settings.endpoints.auth_url.clone()),
            transport,
            messaging_url_template: settings.endpoints.messaging_url_template.clone(),
            cached_token: Mutex::new(None),
        }
    }

    pub async fn cached_token(&self) -> Option<AccessToken> {
        self.cached_token.lock().await.clone()
    }

    /// Deliver `payload_json` to `device_id`.
    ///
    /// Returns `Delivered` with the canonical registration id reported by ADM.
    /// A 401 refreshes the token and retries once; a second 401 is an
    /// [`AdmError::Authentication`]. Any other non-200 is an
    /// [`AdmError::Delivery`] and is never retried.
    pub async fn deliver(
        &self,
        device_id: &str,
        credentials: &Credentials,
        payload_json: &str,
    ) -> Result<DeliveryOutcome> {
        let metrics = get_metrics().await;
        let start = Instant::now();

        let result = self.run_delivery(device_id, credentials, payload_json).await;

        let label = match &result {
            Ok(outcome) if outcome.registration_changed(device_id) => RESULT_CANONICAL_CHANGED,
            Ok(_) => RESULT_DELIVERED,
            Err(AdmError::Authentication { .. }) => RESULT_UNAUTHORIZED,
            Err(AdmError::Transport(_)) => RESULT_TRANSPORT_ERROR,
            Err(_) => RESULT_REJECTED,
        };
        metrics.delivery_requests.with_label_values(&[label]).inc();
        metrics
            .delivery_duration
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());
        result
    }

    /// Deliver and hand back only the canonical registration id.
    pub async fn send_message_to_device(
        &self,
        registration_id: &str,
        client_id: &str,
        client_secret: &str,
        payload: &str,
    ) -> Result<String> {
        let credentials = Credentials::new(client_id, client_secret);
        let outcome = self.deliver(registration_id, &credentials, payload).await?;
        Ok(outcome
            .canonical_device_id()
            .unwrap_or(registration_id)
            .to_owned())
    }

    async fn run_delivery(
        &self,
        device_id: &str,
        credentials: &Credentials,
        payload_json: &str,
    ) -> Result<DeliveryOutcome> {
        let request = DeliveryRequest::new(device_id, payload_json)?;
        let mut token = self.current_token(credentials).await?;
        let mut attempt = Attempt::First;

        loop {
            let outbound = request.to_outbound(&self.messaging_url_template, &token)?;
            debug!(device_id = %device_id, attempt = ?attempt, "sending message");
            let response = self.transport.post(outbound).await?;

            match (response.status, attempt) {
                (StatusCode::OK, _) => return canonical_outcome(device_id, response),
                (StatusCode::UNAUTHORIZED, Attempt::First) => {
                    warn!(device_id = %device_id, token_age_seconds = token.age_seconds(), "access token rejected, refreshing");
                    token = self.refresh_token(credentials, &token).await?;
                    attempt = Attempt::AfterRefresh;
                }
                (StatusCode::UNAUTHORIZED, Attempt::AfterRefresh) => {
                    warn!(device_id = %device_id, "refreshed access token rejected");
                    return Err(AdmError::Authentication {
                        status: response.status.as_u16(),
                        message: response.body,
                    });
                }
                (status, _) => {
                    warn!(device_id = %device_id, status = status.as_u16(), "message rejected");
                    return Err(AdmError::Delivery {
                        status: status.as_u16(),
                        message: response.body,
                    });
                }
            }
        }
    }

    /// Cached token, or a freshly fetched one when the slot is empty.
    async fn current_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let mut slot = self.cached_token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.tokens.fetch_token(credentials).await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Replace `stale`. If another caller already swapped the slot, its token is reused.
    async fn refresh_token(&self, credentials: &Credentials, stale: &AccessToken) -> Result<AccessToken> {
        let mut slot = self.cached_token.lock().await;
        if let Some(current) = slot.as_ref().filter(|current| current.value != stale.value) {
            debug!("access token already refreshed by a concurrent delivery");
            return Ok(current.clone());
        }

        *slot = None;
        let token = self.tokens.fetch_token(credentials).await?;
        get_metrics().await.token_refreshes.inc();
        *slot = Some(token.clone());
        Ok(token)
    }
}

fn canonical_outcome(device_id: &str, response: RawResponse) -> Result<DeliveryOutcome> {
    let canonical_device_id =
        string_field(&response.body, FIELD_REGISTRATION_ID).ok_or_else(|| AdmError::Delivery {
            status: response.status.as_u16(),
            message: response.body.clone(),
        })?;

    if canonical_device_id != device_id {
        info!(
            device_id = %device_id,
            canonical_device_id = %canonical_device_id,
            "ADM returned a different canonical registration id"
        );
    }
    Ok(DeliveryOutcome::Delivered { canonical_device_id })
}
