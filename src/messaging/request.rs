use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::auth::token::AccessToken;
use crate::error::{AdmError, Result};
use crate::transport::OutboundRequest;
use crate::utils::constants::{
    AMAZON_ACCEPT_TYPE, AMAZON_TYPE_VERSION, APPLICATION_JSON, HEADER_AMZN_ACCEPT_TYPE,
    HEADER_AMZN_TYPE_VERSION, REGISTRATION_ID_PLACEHOLDER,
};

/// One message for one device, built per `deliver` call.
#[derive(Debug, Clone)]
pub struct DeliveryRequest<'a> {
    pub device_id: &'a str,
    pub payload_json: &'a str,
}

impl<'a> DeliveryRequest<'a> {
    pub fn new(device_id: &'a str, payload_json: &'a str) -> Result<Self> {
        if device_id.is_empty() {
            return Err(AdmError::InvalidInput("device id must not be empty".to_owned()));
        }
        Ok(Self { device_id, payload_json })
    }

    /// The device id is substituted as-is; ADM expects the raw registration id in the path.
    pub fn url(&self, template: &str) -> String {
        template.replace(REGISTRATION_ID_PLACEHOLDER, self.device_id)
    }

    pub fn to_outbound(&self, template: &str, token: &AccessToken) -> Result<OutboundRequest> {
        let authorization = HeaderValue::from_str(&token.bearer()).map_err(|_| {
            AdmError::InvalidInput("access token is not a valid header value".to_owned())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(
            HeaderName::from_static(HEADER_AMZN_TYPE_VERSION),
            HeaderValue::from_static(AMAZON_TYPE_VERSION),
        );
        headers.insert(
            HeaderName::from_static(HEADER_AMZN_ACCEPT_TYPE),
            HeaderValue::from_static(AMAZON_ACCEPT_TYPE),
        );
        headers.insert(AUTHORIZATION, authorization);

        Ok(OutboundRequest::new(
            self.url(template),
            headers,
            self.payload_json.as_bytes().to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::DeliveryRequest;
    use crate::auth::token::AccessToken;
    use crate::error::AdmError;
    use crate::utils::constants::MESSAGING_URL_TEMPLATE;

    #[test]
    fn url_substitutes_device_id_verbatim() {
        let request = DeliveryRequest::new("amzn1.adm-registration.v3.Y29t", "{}").unwrap();
        assert_eq!(
            request.url(MESSAGING_URL_TEMPLATE),
            "https://api.amazon.com/messaging/registrations/amzn1.adm-registration.v3.Y29t/messages"
        );
    }

    #[test]
    fn outbound_carries_adm_headers() {
        let request = DeliveryRequest::new("abc123", r#"{"data":{}}"#).unwrap();
        let outbound = request
            .to_outbound(MESSAGING_URL_TEMPLATE, &AccessToken::new("T1".into()))
            .unwrap();

        let header = |name: &str| outbound.headers.get(name).unwrap().to_str().unwrap().to_owned();
        assert_eq!(header("content-type"), "application/json");
        assert_eq!(header("accept"), "application/json");
        assert_eq!(header("x-amzn-type-version"), "com.amazon.device.messaging.ADMMessage@1.0");
        assert_eq!(header("x-amzn-accept-type"), "com.amazon.device.messaging.ADMSendResult@1.0");
        assert_eq!(header("authorization"), "Bearer T1");
        assert_eq!(outbound.body, br#"{"data":{}}"#.to_vec());
    }

    #[test]
    fn empty_device_id_is_rejected() {
        assert!(matches!(DeliveryRequest::new("", "{}"), Err(AdmError::InvalidInput(_))));
    }
}
