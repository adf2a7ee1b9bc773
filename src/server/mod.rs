//! HTTP 서버 (axum)
//!
//! - `GET /health`
//! - `POST /upload` (multipart `file`)
//! - `GET /docs/{doc_id}`, `DELETE /docs`
//! - `POST /study`

mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Result, StudyError};
use crate::study::StudyEngine;

// ============================================================================
// State
// ============================================================================

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub engine: StudyEngine,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(engine: StudyEngine, config: AppConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// 핸들러 에러 → HTTP 응답 (`{"detail": "..."}`)
#[derive(Debug)]
pub enum ApiError {
    Study(StudyError),
    /// 요청 본문 파싱 실패 (axum 거부 상태 코드 유지)
    Rejection { status: StatusCode, detail: String },
}

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        Self::Study(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Rejection { status, detail } => (status, detail),
            ApiError::Study(err) => {
                let status = match &err {
                    StudyError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
                    StudyError::NotFound(_) => StatusCode::NOT_FOUND,
                    StudyError::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
                    StudyError::Extraction(_) | StudyError::Storage(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                if status.is_server_error() {
                    tracing::error!("{}", err);
                }
                let detail = match err {
                    StudyError::InvalidParameter(msg) => msg,
                    StudyError::NotFound(_) => "Document not found".to_string(),
                    other => other.to_string(),
                };
                (status, detail)
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| StudyError::invalid(format!("invalid CORS origin '{}': {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}

/// 라우터 구성
pub fn build_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors_origin)?;
    let body_limit = state.config.max_upload_bytes;

    Ok(Router::new()
        .route("/health", get(routes::health))
        .route("/upload", post(routes::upload))
        .route("/docs", axum::routing::delete(routes::clear_docs))
        .route("/docs/{doc_id}", get(routes::read_doc))
        .route("/study", post(routes::study))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// 서버 실행 (Ctrl+C로 종료)
///
/// 설정 검증은 여기서 한 번만 수행합니다.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    state.config.validate().context("Invalid server config")?;
    let bind = state.config.bind;
    let router = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!("Listening on http://{}", bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            // 시그널 없이 종료되지 않도록 계속 대기
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn detail_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_signal() {
        let result = tokio::time::timeout(Duration::from_millis(100), shutdown_signal()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_serve_rejects_invalid_config() {
        let config = AppConfig {
            max_chunks: 0,
            ..Default::default()
        };
        let engine = StudyEngine::new(crate::knowledge::DocumentStore::new());
        let err = serve(AppState::new(engine, config)).await.unwrap_err();
        assert!(err.to_string().contains("Invalid server config"));
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let (status, body) = detail_of(StudyError::NotFound("x".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Document not found");

        let (status, body) = detail_of(StudyError::invalid("bad").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "bad");

        let (status, _) = detail_of(StudyError::generation("down").into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let rejection = ApiError::Rejection {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: "unknown variant".to_string(),
        };
        let (status, body) = detail_of(rejection).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "unknown variant");
    }
}
