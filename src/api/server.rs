//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{handlers, models::ErrorResponse, models::TranscriptTextRequest};
use crate::config::Config;
use crate::TranscriptError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the router with all routes and middleware
pub fn build_router(config: Arc<Config>) -> Router {
    let app_state = AppState {
        config: config.clone(),
    };

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/scan-transcript", post(scan_transcript_handler))
        .route("/api/parse-courses", post(parse_courses_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
}

/// CORS restricted to the configured origins, or open when none are set
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .api
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Configure and start the HTTP server
pub async fn start_http_server(config: Arc<Config>) -> Result<()> {
    let address = format!("{}:{}", config.api.host, config.api.port);
    let app = build_router(config);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 Pathway transcript API listening on http://{}", address);
    info!("🔗 Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Map a handler error onto a status code and JSON body
fn error_response(err: TranscriptError) -> Response {
    let status = match &err {
        TranscriptError::EmptyInput | TranscriptError::NoCoursesDetected { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TranscriptError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        TranscriptError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    };

    let body = ErrorResponse::new(err.to_string());
    let body = match err {
        TranscriptError::NoCoursesDetected { raw_text } => body.with_raw_text(raw_text),
        _ => body,
    };

    (status, Json(body)).into_response()
}

/// Health check handler
async fn health_handler() -> Response {
    match handlers::health_check().await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Unwrap a JSON body, turning extractor rejections into the JSON error shape
fn decode_body(
    payload: std::result::Result<Json<TranscriptTextRequest>, JsonRejection>,
) -> std::result::Result<TranscriptTextRequest, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            warn!("Rejecting request body: {}", rejection.body_text());
            Err(error_response(TranscriptError::InvalidRequest(
                rejection.body_text(),
            )))
        }
    }
}

/// Transcript scan handler
async fn scan_transcript_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TranscriptTextRequest>, JsonRejection>,
) -> Response {
    let payload = match decode_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match handlers::scan_transcript(&state.config, &payload).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Free-text course list handler
async fn parse_courses_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TranscriptTextRequest>, JsonRejection>,
) -> Response {
    let payload = match decode_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match handlers::parse_free_text(&state.config, &payload).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = build_router(Arc::new(Config::default()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_error_body() {
        let (status, body) = post_json("/api/scan-transcript", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

        let (status, body) = post_json("/api/parse-courses", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_scan_route_returns_classes() {
        let (status, body) =
            post_json("/api/scan-transcript", r#"{"text":"Fall 2024\nCMSC131 Intro A 4"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalClasses"], 1);
        assert_eq!(body["classes"][0]["code"], "CMSC131");
    }

    #[test]
    fn test_error_status_mapping() {
        let response = error_response(TranscriptError::EmptyInput);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = error_response(TranscriptError::InputTooLarge { len: 5, limit: 1 });
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = error_response(TranscriptError::InvalidRequest("bad".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
