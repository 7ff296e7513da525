//! # ADM Client Library
//!
//! Sends messages through Amazon Device Messaging: exchanges client
//! credentials for a bearer token, builds the JSON payload, posts it to the
//! device's registration endpoint and reports the canonical registration id.
//!
//! Modules:
//! - `auth` : credentials, access token, OAuth2 token provider
//! - `messaging` : payload builder, delivery request, dispatcher with one re-authentication retry
//! - `transport` : HTTP seam and its reqwest implementation
//! - `config` : YAML service configuration and validation
//! - `parser` : JSON field extraction from response bodies
//!
//! ```no_run
//! use adm_client::{Adm, Credentials};
//!
//! # async fn send() -> adm_client::Result<()> {
//! let dispatcher = Adm::new_service()?;
//! let payload = Adm::new_payload().consolidation_key("SyncNow").data_field("message", "hi").build();
//! let outcome = dispatcher
//!     .deliver("amzn1.adm-registration.v3.abc", &Credentials::new("client-id", "client-secret"), &payload)
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod messaging;
pub mod observability;
pub mod parser;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::{AccessToken, Credentials, TokenProvider};
pub use crate::config::settings::AdmSettings;
pub use crate::error::{AdmError, Result};
pub use crate::messaging::{DeliveryOutcome, MessageDispatcher, PayloadBuilder};

/// Entry points for building payloads and dispatch services.
pub struct Adm;

impl Adm {
    pub fn new_payload() -> PayloadBuilder {
        PayloadBuilder::new()
    }

    /// Dispatcher against the production ADM endpoints.
    pub fn new_service() -> Result<MessageDispatcher> {
        MessageDispatcher::from_settings(&AdmSettings::default())
    }

    pub fn service_with_settings(settings: &AdmSettings) -> Result<MessageDispatcher> {
        MessageDispatcher::from_settings(settings)
    }
}
