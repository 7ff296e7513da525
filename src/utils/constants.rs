//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

// Endpoints
pub const AUTH_URL: &str = "https://api.amazon.com/auth/O2/token";
pub const REGISTRATION_ID_PLACEHOLDER: &str = "{registration_id}";
pub const MESSAGING_URL_TEMPLATE: &str =
    "https://api.amazon.com/messaging/registrations/{registration_id}/messages";

// Token request form
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const SCOPE_MESSAGING_PUSH: &str = "messaging:push";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

// Delivery request headers
pub const APPLICATION_JSON: &str = "application/json";
pub const HEADER_AMZN_TYPE_VERSION: &str = "x-amzn-type-version";
pub const HEADER_AMZN_ACCEPT_TYPE: &str = "x-amzn-accept-type";
pub const AMAZON_TYPE_VERSION: &str = "com.amazon.device.messaging.ADMMessage@1.0";
pub const AMAZON_ACCEPT_TYPE: &str = "com.amazon.device.messaging.ADMSendResult@1.0";

// Response fields
pub const FIELD_ACCESS_TOKEN: &str = "access_token";
pub const FIELD_REGISTRATION_ID: &str = "registrationID";
