mod stores;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_agent::{FindError, StoreFinder};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub finder: StoreFinder,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    service: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_find_error(request_id: String, error: &FindError) -> ApiError {
    match error {
        FindError::InvalidRequest(e) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        FindError::MissingCredential => {
            tracing::error!(error = %error, "store search refused");
            ApiError::new(request_id, "configuration_error", error.to_string())
        }
        FindError::Agent(e) => {
            tracing::error!(error = %e, "store search failed");
            ApiError::new(request_id, "agent_error", error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/find-stores", post(stores::find_stores))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        service: "store-finder",
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use storefinder_agent::{AgentError, AgentOutput, AgentRunner, FinderSettings};
    use tower::ServiceExt;

    use super::*;

    struct FixedAgent(AgentOutput);

    #[async_trait]
    impl AgentRunner for FixedAgent {
        async fn run_task(&self, _description: &str) -> Result<AgentOutput, AgentError> {
            Ok(self.0.clone())
        }
    }

    struct StoppedAgent;

    #[async_trait]
    impl AgentRunner for StoppedAgent {
        async fn run_task(&self, _description: &str) -> Result<AgentOutput, AgentError> {
            Err(AgentError::TaskFailed {
                task_id: "t-1".to_string(),
                status: "stopped".to_string(),
            })
        }
    }

    fn settings(key: Option<&str>) -> FinderSettings {
        FinderSettings {
            agent_api_key: key.map(ToString::to_string),
            default_radius_km: 5.0,
            max_results: 5,
            store_kind: "cannabis dispensaries".to_string(),
            region: None,
        }
    }

    fn app_with(key: Option<&str>, agent: Arc<dyn AgentRunner>) -> Router {
        build_app(AppState {
            finder: StoreFinder::new(settings(key), agent),
        })
    }

    fn green_leaf_app() -> Router {
        app_with(
            Some("test-key"),
            Arc::new(FixedAgent(AgentOutput::Text(
                "Found:\n```json\n[{\"id\": \"gl\", \"name\": \"Green Leaf\", \"distance\": 1.5}]\n```"
                    .to_string(),
            ))),
        )
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/find-stores")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_other_codes_map_to_internal_error() {
        for code in ["configuration_error", "agent_error"] {
            let response = ApiError::new("req-1", code, "boom").into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{code}");
        }
    }

    #[tokio::test]
    async fn find_stores_returns_extracted_records() {
        let response = green_leaf_app()
            .oneshot(post_json(r#"{"postal_code": "V6B 1A1", "strains": ["Blue Dream"]}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let json = body_json(response).await;
        let stores = json["stores"].as_array().expect("stores array");
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0]["name"], "Green Leaf");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn find_stores_without_location_is_validation_error() {
        let response = green_leaf_app()
            .oneshot(post_json(r#"{"strains": ["Blue Dream"]}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn find_stores_with_malformed_body_is_validation_error() {
        let response = green_leaf_app()
            .oneshot(post_json("{not json"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn missing_credential_is_configuration_error() {
        let app = app_with(
            None,
            Arc::new(FixedAgent(AgentOutput::Text("[]".to_string()))),
        );
        let response = app
            .oneshot(post_json(r#"{"postal_code": "V6B 1A1"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "configuration_error");
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("STOREFINDER_AGENT_API_KEY"));
    }

    #[tokio::test]
    async fn agent_failure_is_agent_error() {
        let app = app_with(Some("test-key"), Arc::new(StoppedAgent));
        let response = app
            .oneshot(post_json(r#"{"address": "400 Granville St"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "agent_error");
    }

    #[tokio::test]
    async fn health_is_static() {
        let response = app_with(None, Arc::new(StoppedAgent))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({"status": "ok", "service": "store-finder"})
        );
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed() {
        let response = green_leaf_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn preflight_allows_post_from_any_origin() {
        let response = green_leaf_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/find-stores")
                    .header("origin", "https://example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn concurrent_requests_each_get_their_own_result() {
        struct EchoAgent;

        #[async_trait]
        impl AgentRunner for EchoAgent {
            async fn run_task(&self, description: &str) -> Result<AgentOutput, AgentError> {
                let objective = description
                    .lines()
                    .find(|line| line.starts_with("Find "))
                    .unwrap_or_default();
                Ok(AgentOutput::Structured(
                    serde_json::json!([{ "name": objective }]),
                ))
            }
        }

        let app = app_with(Some("test-key"), Arc::new(EchoAgent));
        let calls = (0..8).map(|i| {
            let app = app.clone();
            async move {
                let response = app
                    .oneshot(post_json(&format!(r#"{{"postal_code": "P{i}"}}"#)))
                    .await
                    .expect("response");
                (i, body_json(response).await)
            }
        });

        for (i, json) in futures::future::join_all(calls).await {
            let name = json["stores"][0]["name"].as_str().expect("name");
            assert!(name.contains(&format!("of P{i}.")), "{i}: {name}");
        }
    }
}
