use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Text exposition of every registered metric.
pub async fn render() -> String {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        return format!("# metrics encoding failed: {}\n", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

pub const RESULT_OK: &str = "ok";
pub const RESULT_REJECTED: &str = "rejected";
pub const RESULT_TRANSPORT_ERROR: &str = "transport_error";
pub const RESULT_DELIVERED: &str = "delivered";
pub const RESULT_CANONICAL_CHANGED: &str = "canonical_changed";
pub const RESULT_UNAUTHORIZED: &str = "unauthorized";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_fetch_requests: IntCounterVec,
    pub token_refreshes: IntCounter,

    // Delivery metrics
    pub delivery_requests: IntCounterVec,
    pub delivery_duration: HistogramVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("adm".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_fetch_requests: IntCounterVec::new(Opts::new("token_fetch_requests_total", "Token exchanges by result"),&["result"],).unwrap(),
            token_refreshes: IntCounter::new("token_refreshes_total", "Token refreshes triggered by a 401").unwrap(),

            // Delivery
            delivery_requests: IntCounterVec::new(Opts::new("delivery_requests_total", "Delivery attempts by result"),&["result"],).unwrap(),
            delivery_duration: HistogramVec::new(HistogramOpts::new("delivery_duration_seconds", "Duration of a deliver call, token exchange included").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["result"],).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.delivery_requests.clone())).unwrap();
        reg.register(Box::new(metrics.delivery_duration.clone())).unwrap();

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::{get_metrics, render, RESULT_DELIVERED};

    #[tokio::test]
    async fn render_exposes_prefixed_metrics() {
        let metrics = get_metrics().await;
        metrics.delivery_requests.with_label_values(&[RESULT_DELIVERED]).inc();
        let text = render().await;
        assert!(text.contains("adm_delivery_requests_total"));
    }
}
