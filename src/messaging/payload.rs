use std::fmt;

use serde_json::{Map, Value};

const CONSOLIDATION_KEY: &str = "consolidationKey";
const EXPIRES_AFTER: &str = "expiresAfter";
const MD5: &str = "md5";
const DATA: &str = "data";

/// Builds the JSON document posted to the ADM messaging endpoint.
///
/// ```
/// use adm_client::Adm;
///
/// let payload = Adm::new_payload()
///     .consolidation_key("SyncNow")
///     .expires_after(86400)
///     .data_field("message", "hello")
///     .build();
/// assert!(payload.contains("\"consolidationKey\":\"SyncNow\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadBuilder {
    root: Map<String, Value>,
    data: Map<String, Value>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom field delivered to the app inside `data`. A repeated key replaces the earlier value.
    pub fn data_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data_fields<K, V, I>(mut self, values: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in values {
            self.data.insert(key.into(), value.into());
        }
        self
    }

    pub fn consolidation_key(mut self, value: impl Into<String>) -> Self {
        self.root.insert(CONSOLIDATION_KEY.to_owned(), Value::String(value.into()));
        self
    }

    /// Seconds ADM keeps the message while the device is offline.
    pub fn expires_after(mut self, seconds: u64) -> Self {
        self.root.insert(EXPIRES_AFTER.to_owned(), Value::from(seconds));
        self
    }

    /// Base64 MD5 checksum of the data fields, verified on the device.
    pub fn md5(mut self, value: impl Into<String>) -> Self {
        self.root.insert(MD5.to_owned(), Value::String(value.into()));
        self
    }

    pub fn build(&self) -> String {
        let mut document = self.root.clone();
        document.insert(DATA.to_owned(), Value::Object(self.data.clone()));
        Value::Object(document).to_string()
    }
}

impl fmt::Display for PayloadBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::PayloadBuilder;

    fn parsed(payload: &str) -> Value {
        serde_json::from_str(payload).unwrap()
    }

    #[test]
    fn empty_builder_has_empty_data() {
        assert_eq!(parsed(&PayloadBuilder::new().build()), json!({"data":{}}));
    }

    #[test]
    fn consolidation_key() {
        let payload = PayloadBuilder::new().consolidation_key("SyncNow").build();
        assert_eq!(parsed(&payload), json!({"consolidationKey":"SyncNow","data":{}}));
    }

    #[test]
    fn expires_after() {
        let payload = PayloadBuilder::new().expires_after(86400).build();
        assert_eq!(parsed(&payload), json!({"expiresAfter":86400,"data":{}}));
    }

    #[test]
    fn data_fields_merge_and_override() {
        let payload = PayloadBuilder::new()
            .data_field("custom", "custom")
            .data_fields([("count", json!(3)), ("custom", json!("replaced"))])
            .md5("dGVzdA==")
            .build();
        assert_eq!(
            parsed(&payload),
            json!({"md5":"dGVzdA==","data":{"custom":"replaced","count":3}})
        );
    }

    #[test]
    fn display_matches_build() {
        let builder = PayloadBuilder::new().data_field("custom", "custom");
        assert_eq!(builder.to_string(), builder.build());
    }
}
