//! 진로/대학 오리엔테이션 플랫폼 REST API.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 (Access/Refresh 토큰 쌍, 인라인 갱신)
//! - 대학/프로그램/직업 콘텐츠 API
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`repository`]: 데이터베이스 저장소 계층
//! - [`middleware`]: HTTP 미들웨어 (API 키)
//! - [`error`]: 통합 에러 응답

pub mod auth;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    hash_password, verify_password, AdminUser, AuthError, AuthUser, Claims, JwtError, Role,
    TokenPair, TokenService,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
