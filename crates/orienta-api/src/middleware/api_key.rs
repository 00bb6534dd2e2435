//! API 키 검증 미들웨어.
//!
//! 서비스 간 호출(모바일 앱, 배치 클라이언트)을 위한 선택적 게이트.
//! 사용자 토큰 인증과는 독립적이며, 활성화 시 모든 요청에 대해
//! `X-API-Key` 헤더를 검사합니다.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::ApiErrorResponse;

/// API 키 헤더 이름.
pub const API_KEY_HEADER: &str = "x-api-key";

/// API 키 미들웨어 상태.
///
/// 평문 키 대신 SHA-256 다이제스트만 보관합니다.
#[derive(Debug, Clone)]
pub struct ApiKeyState {
    expected_digest: [u8; 32],
}

impl ApiKeyState {
    /// 평문 키에서 상태 생성.
    pub fn new(api_key: &str) -> Self {
        Self {
            expected_digest: digest(api_key),
        }
    }

    /// `API_KEY` 환경변수에서 상태 생성. 미설정이면 None.
    pub fn from_env() -> Option<Self> {
        std::env::var("API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|key| Self::new(&key))
    }

    fn matches(&self, candidate: &str) -> bool {
        // 다이제스트 비교로 길이 누출 방지
        digest(candidate) == self.expected_digest
    }
}

fn digest(input: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// API 키 검증 미들웨어.
///
/// 헤더 부재와 키 불일치를 구분하지 않고 동일하게 거부합니다.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if state.matches(key) => next.run(req).await,
        _ => {
            warn!(path = %req.uri().path(), "Rejected request with missing or invalid API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiErrorResponse::simple(
                    "INVALID_API_KEY",
                    "유효하지 않은 API 키입니다",
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = ApiKeyState::new("orienta-service-key");
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(state, api_key_middleware))
    }

    #[tokio::test]
    async fn test_valid_key_passes() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/ping")
                    .header(API_KEY_HEADER, "orienta-service-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_and_wrong_key_rejected() {
        let response = app()
            .oneshot(HttpRequest::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/ping")
                    .header(API_KEY_HEADER, "wrong-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
