//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/register`, `/api/v1/login`, `/api/v1/refresh` - 인증 (공개)
//! - `/api/v1/users` - 사용자 관리 (인증 필요, 일부 관리자 전용)
//! - `/api/v1/universities` - 대학 (조회 공개, 변경 관리자)
//! - `/api/v1/programs` - 교육 프로그램 (조회 공개, 변경 관리자)
//! - `/api/v1/jobs`, `/api/v1/sectors` - 직업/분야 (조회 공개, 변경 관리자)

pub mod auth;
pub mod careers;
pub mod health;
pub mod programs;
pub mod universities;
pub mod users;

pub use auth::{auth_router, LoginRequest, RegisterRequest};
pub use careers::{careers_router, CreateJobRequest, CreateSectorRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use programs::{programs_router, CreateProgramRequest};
pub use universities::{universities_router, CreateUniversityRequest};
pub use users::{users_router, UpdateUserRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다. 인증
/// 미들웨어는 각 서브 라우터에서 보호가 필요한 경로에만 배선됩니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 인증 (공개)
        .nest("/api/v1", auth_router())
        // 사용자 관리 (전체 인증 필요)
        .nest("/api/v1/users", users_router(state.clone()))
        // 콘텐츠 엔드포인트 (조회 공개, 변경 관리자)
        .nest("/api/v1/universities", universities_router(state.clone()))
        .nest("/api/v1/programs", programs_router(state.clone()))
        .nest("/api/v1", careers_router(state.clone()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    #[tokio::test]
    async fn test_full_router_wires_public_and_protected_routes() {
        let state = Arc::new(create_test_state("router-wiring-test-secret"));
        let app = create_api_router(state);

        // 공개: 헬스 체크
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // 보호: 사용자 목록은 토큰 없이 401
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // 미정의 경로는 404
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
