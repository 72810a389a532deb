//! Authentication endpoints / 认证接口
//!
//! GET probes whether any credentials currently grant access; POST
//! validates a supplied credential triple and stores it only after the
//! probe succeeds. Both always answer HTTP 200; the client reads the
//! body, not the status code.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use s3list_backend::s3::{check_access, probe, ClientHandle, S3Credentials};

use crate::state::AppState;

/// POST /api/s3/auth request body
#[derive(Debug, Deserialize)]
pub struct SetCredentialsReq {
    pub endpoint_url: String,
    pub client_id: String,
    pub client_secret: String,
}

/// GET /api/s3/auth - 检查当前是否已认证
///
/// Ambient (role-based) credentials are probed first so a configured
/// instance role wins over stored secrets; stored explicit credentials
/// are only tried when the ambient probe fails. Read-only: never mutates
/// the credential store.
pub async fn check_auth(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut authenticated = match ClientHandle::ambient(state.clients.options()) {
        Ok(handle) => probe(&handle).await,
        Err(e) => {
            tracing::debug!("No ambient S3 credentials: {}", e);
            false
        }
    };

    if !authenticated {
        let creds = state.clients.credentials();
        if creds.is_explicit() {
            match ClientHandle::with_credentials(&creds, state.clients.options()) {
                Ok(handle) => authenticated = probe(&handle).await,
                Err(e) => {
                    tracing::warn!("Failed to build client from stored credentials: {}", e)
                }
            }
        }
    }

    Json(json!({ "authenticated": authenticated }))
}

/// POST /api/s3/auth - 设置S3凭证
///
/// The body is parsed by hand: a malformed request still gets the
/// in-band `success: false` shape instead of an extractor rejection.
/// A failed probe leaves the stored credentials untouched.
pub async fn set_credentials(State(state): State<Arc<AppState>>, body: String) -> Json<Value> {
    let req: SetCredentialsReq = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(e) => {
            return Json(json!({
                "success": false,
                "message": format!("Invalid request body: {}", e),
            }));
        }
    };

    let creds = S3Credentials {
        endpoint_url: req.endpoint_url,
        access_key_id: req.client_id,
        secret_key: req.client_secret,
    };

    if !creds.is_explicit() {
        return Json(json!({
            "success": false,
            "message": "endpoint_url, client_id and client_secret are all required",
        }));
    }

    let handle = match ClientHandle::with_credentials(&creds, state.clients.options()) {
        Ok(handle) => handle,
        Err(e) => {
            return Json(json!({ "success": false, "message": e.to_string() }));
        }
    };

    match check_access(&handle).await {
        Ok(()) => {
            state.clients.set_credentials(creds);
            Json(json!({ "success": true }))
        }
        Err(e) => {
            tracing::warn!("Supplied S3 credentials failed the probe: {}", e);
            Json(json!({ "success": false, "message": e.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3list_backend::s3::{ClientFactory, ClientOptions};

    fn test_state() -> Arc<AppState> {
        let initial = S3Credentials {
            endpoint_url: "http://localhost:9000".to_string(),
            access_key_id: "original".to_string(),
            secret_key: "original".to_string(),
        };
        let options = ClientOptions {
            region: "us-east-1".to_string(),
            force_path_style: true,
        };
        Arc::new(AppState {
            clients: ClientFactory::new(initial, options),
        })
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_store() {
        let state = test_state();
        let before = state.clients.credentials();

        let response = set_credentials(State(state.clone()), "not json".to_string()).await;
        assert_eq!(response.0["success"], false);
        assert!(!response.0["message"].as_str().unwrap().is_empty());
        assert_eq!(state.clients.credentials(), before);
    }

    #[tokio::test]
    async fn test_partial_triple_rejected() {
        let state = test_state();
        let before = state.clients.credentials();

        let body = r#"{"endpoint_url": "http://localhost:9000", "client_id": "", "client_secret": ""}"#;
        let response = set_credentials(State(state.clone()), body.to_string()).await;
        assert_eq!(response.0["success"], false);
        assert_eq!(state.clients.credentials(), before);
    }

    #[tokio::test]
    async fn test_failed_probe_keeps_store() {
        let state = test_state();
        let before = state.clients.credentials();

        // Nothing listens on the discard port, so the probe fails fast
        let body = r#"{"endpoint_url": "http://127.0.0.1:9", "client_id": "ak", "client_secret": "sk"}"#;
        let response = set_credentials(State(state.clone()), body.to_string()).await;
        assert_eq!(response.0["success"], false);
        assert_eq!(state.clients.credentials(), before);
    }
}
