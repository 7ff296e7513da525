use thiserror::Error;

use crate::messaging::outcome::DeliveryOutcome;
use crate::transport::TransportError;

pub type Result<T, E = AdmError> = std::result::Result<T, E>;

/// Errors surfaced by the token exchange and the delivery flow.
///
/// Nothing is swallowed: the only condition handled internally is a single
/// 401-triggered token refresh inside `MessageDispatcher::deliver`.
#[derive(Error, Debug)]
pub enum AdmError {
    /// Credential exchange failed, or the delivery endpoint rejected a freshly
    /// refreshed token.
    #[error("authentication failed with status {status}: {message}")]
    Authentication { status: u16, message: String },

    /// Delivery endpoint rejected the message for a reason other than token expiry.
    #[error("the enqueue request failed with a {status} response code, with the following message: {message}")]
    Delivery { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl AdmError {
    /// Status code returned by the remote endpoint, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdmError::Authentication { status, .. } | AdmError::Delivery { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Report form of a status-carrying error.
    pub fn outcome(&self) -> Option<DeliveryOutcome> {
        match self {
            AdmError::Authentication { status, message } | AdmError::Delivery { status, message } => {
                Some(DeliveryOutcome::Failed {
                    status_code: *status,
                    server_message: message.clone(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdmError;
    use crate::messaging::outcome::DeliveryOutcome;

    #[test]
    fn status_is_reported_only_for_remote_rejections() {
        let auth = AdmError::Authentication { status: 401, message: "expired".into() };
        let delivery = AdmError::Delivery { status: 413, message: "too large".into() };

        assert_eq!(auth.status(), Some(401));
        assert_eq!(delivery.status(), Some(413));
        assert_eq!(AdmError::InvalidInput("device id".into()).status(), None);
        assert_eq!(AdmError::Client("tls".into()).status(), None);
        assert_eq!(AdmError::Client("tls".into()).outcome(), None);
        assert_eq!(
            delivery.outcome(),
            Some(DeliveryOutcome::Failed { status_code: 413, server_message: "too large".into() })
        );
    }
}
