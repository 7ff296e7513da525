// tests/common/mod.rs
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Router};
use serde_json::json;
use tokio::task::JoinHandle;

use crate::config::settings::{AdmSettings, EndpointsConfig};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Settings pointing both endpoints at `base` (e.g. `http://127.0.0.1:1234`).
pub fn settings_for(base: &str) -> AdmSettings {
    AdmSettings {
        endpoints: EndpointsConfig {
            auth_url: format!("{}/auth/O2/token", base),
            messaging_url_template: format!("{}/messaging/registrations/{{registration_id}}/messages", base),
        },
        http_timeout_ms: 5000,
    }
}

/// How the fake messaging endpoint answers.
#[derive(Clone)]
pub enum DeliveryBehavior {
    /// Pop replies in order; an empty script answers 500.
    Scripted(Arc<Mutex<VecDeque<(StatusCode, String)>>>),
    /// 401 for the listed bearer tokens, 200 echoing the path id otherwise.
    RejectTokens(Vec<String>),
}

/// In-process stand-in for the ADM token and messaging endpoints.
#[derive(Clone)]
pub struct AdmDouble {
    pub token_hits: Arc<AtomicUsize>,
    pub delivery_hits: Arc<AtomicUsize>,
    pub token_forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub token_content_types: Arc<Mutex<Vec<String>>>,
    pub authorizations: Arc<Mutex<Vec<String>>>,
    pub behavior: DeliveryBehavior,
}

impl AdmDouble {
    pub fn scripted(replies: Vec<(StatusCode, &str)>) -> Self {
        let script = replies.into_iter().map(|(s, b)| (s, b.to_owned())).collect();
        Self::with_behavior(DeliveryBehavior::Scripted(Arc::new(Mutex::new(script))))
    }

    pub fn rejecting(tokens: &[&str]) -> Self {
        Self::with_behavior(DeliveryBehavior::RejectTokens(
            tokens.iter().map(|t| t.to_string()).collect(),
        ))
    }

    fn with_behavior(behavior: DeliveryBehavior) -> Self {
        Self {
            token_hits: Arc::default(),
            delivery_hits: Arc::default(),
            token_forms: Arc::default(),
            token_content_types: Arc::default(),
            authorizations: Arc::default(),
            behavior,
        }
    }

    pub fn token_hits(&self) -> usize {
        self.token_hits.load(Ordering::SeqCst)
    }

    pub fn delivery_hits(&self) -> usize {
        self.delivery_hits.load(Ordering::SeqCst)
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.authorizations.lock().unwrap().clone()
    }

    /// Serve the double and return settings pointing at it.
    pub async fn serve(&self) -> (JoinHandle<()>, AdmSettings) {
        let router = Router::new()
            .route("/auth/O2/token", post(issue_token))
            .route("/messaging/registrations/{registration_id}/messages", post(receive_message))
            .with_state(self.clone());
        let (handle, addr) = spawn_axum(router).await;
        (handle, settings_for(&format!("http://{}", addr)))
    }
}

/// Issues `T1`, `T2`, ... in request order.
async fn issue_token(
    State(double): State<AdmDouble>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let n = double.token_hits.fetch_add(1, Ordering::SeqCst) + 1;
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    double.token_content_types.lock().unwrap().push(content_type);
    double.token_forms.lock().unwrap().push(form);

    let body = json!({"access_token": format!("T{}", n), "scope": "messaging:push", "token_type": "bearer", "expires_in": 3600});
    (StatusCode::OK, body.to_string())
}

async fn receive_message(
    State(double): State<AdmDouble>,
    Path(registration_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    double.delivery_hits.fetch_add(1, Ordering::SeqCst);
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    double.authorizations.lock().unwrap().push(authorization.clone());

    match &double.behavior {
        DeliveryBehavior::Scripted(script) => script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "unscripted".to_owned())),
        DeliveryBehavior::RejectTokens(rejected) => {
            let token = authorization.trim_start_matches("Bearer ");
            if rejected.iter().any(|r| r == token) {
                (StatusCode::UNAUTHORIZED, r#"{"reason":"AccessTokenExpired"}"#.to_owned())
            } else {
                (StatusCode::OK, json!({"registrationID": registration_id}).to_string())
            }
        }
    }
}
