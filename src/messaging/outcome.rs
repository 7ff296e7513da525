use serde::Serialize;

/// Terminal result of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Accepted by ADM. The canonical id may differ from the requested one;
    /// callers keep their own device records up to date.
    Delivered { canonical_device_id: String },
    Failed { status_code: u16, server_message: String },
}

impl DeliveryOutcome {
    pub fn canonical_device_id(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Delivered { canonical_device_id } => Some(canonical_device_id),
            DeliveryOutcome::Failed { .. } => None,
        }
    }

    /// True when ADM answered with a registration id other than `requested`.
    pub fn registration_changed(&self, requested: &str) -> bool {
        self.canonical_device_id()
            .map(|canonical| canonical != requested)
            .unwrap_or(false)
    }
}
