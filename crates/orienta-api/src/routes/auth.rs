//! 인증 라우트.
//!
//! 회원가입, 로그인, 토큰 갱신의 공개 엔드포인트를 제공합니다.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use orienta_core::{Role, User};

use crate::auth::{
    hash_password, validate_password_strength, verify_password, AuthError, JwtError, TokenPair,
    REFRESH_TOKEN_HEADER,
};
use crate::error::{ApiError, ApiResult};
use crate::repository::{NewUser, UserRepository};
use crate::state::AppState;

/// 회원가입 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 사용자 이름 (unique)
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// 이메일 (unique)
    #[validate(email)]
    pub email: String,
    /// 비밀번호 (최소 8자)
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// 이메일
    #[validate(email)]
    pub email: String,
    /// 비밀번호
    pub password: String,
}

/// 회원가입 핸들러.
///
/// POST /api/v1/register
///
/// 이메일/사용자 이름 중복과 비밀번호 강도를 검사한 뒤 Argon2id로
/// 해싱하여 저장합니다. 중복은 필드별 메시지와 함께 400으로
/// 거부됩니다 (가입 경로에는 열거 방지가 적용되지 않음 - 가입 시도
/// 자체가 계정 존재를 전제하지 않으므로).
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let pool = state.require_db()?;

    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    validate_password_strength(&payload.password).map_err(ApiError::bad_request)?;

    if UserRepository::find_by_email(pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("이미 사용 중인 이메일입니다"));
    }
    if UserRepository::find_by_username(pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("이미 사용 중인 사용자 이름입니다"));
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| ApiError::internal(e.to_string()))?;

    let user = UserRepository::create(
        pool,
        NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: Role::Normal,
        },
    )
    .await?;

    info!(user_id = %user.id, "New user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// 자격증명 검사.
///
/// 존재하지 않는 계정과 비밀번호 불일치를 구분하지 않고 동일한
/// [`AuthError::InvalidCredentials`]로 수렴시킵니다 (계정 존재 여부
/// 열거 방지).
fn check_credentials(user: Option<User>, password: &str) -> Result<User, AuthError> {
    let user = user.ok_or(AuthError::InvalidCredentials)?;

    verify_password(password, &user.password_hash).map_err(|_| {
        warn!(email = %user.email, "Login attempt with invalid credentials");
        AuthError::InvalidCredentials
    })?;

    Ok(user)
}

/// Refresh 실패 매핑.
///
/// 서명/인코딩 실패는 내부 에러로 표면화되며, 절대 "invalid token"으로
/// 격하되지 않습니다. 나머지 검증 실패만 401입니다.
fn refresh_error(err: JwtError) -> AuthError {
    match err {
        JwtError::Signing(e) => {
            warn!(error = %e, "Token signing failed during refresh");
            AuthError::TokenIssuance
        }
        _ => AuthError::InvalidRefreshToken,
    }
}

/// 로그인 핸들러.
///
/// POST /api/v1/login
///
/// 어떤 자격증명 실패든(존재하지 않는 계정, 비밀번호 불일치) 동일한
/// 401 응답을 반환합니다. 저장소 장애만 500으로 구분됩니다.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<TokenPair> {
    let pool = state.require_db()?;

    let user = UserRepository::find_by_email(pool, &payload.email).await?;
    let user = check_credentials(user, &payload.password)?;

    let pair = state
        .tokens
        .issue_pair(&user.email, user.role)
        .map_err(AuthError::from)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(pair))
}

/// 토큰 갱신 핸들러.
///
/// POST /api/v1/refresh
///
/// `refresh_token` 헤더의 Refresh Token을 소비하여 새 토큰 쌍을
/// 발급합니다. 만료된 Access Token 없이도 호출할 수 있습니다.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<TokenPair> {
    let refresh_token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidRefreshToken)?;

    let (pair, _claims) = state.tokens.refresh(refresh_token).map_err(refresh_error)?;

    Ok(Json(pair))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn app() -> Router {
        let state = Arc::new(create_test_state("auth-route-test-secret"));
        auth_router().with_state(state)
    }

    #[test]
    fn test_register_request_validation() {
        let bad_email = RegisterRequest {
            username: "ismael".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_name = RegisterRequest {
            username: "ab".to_string(),
            email: "a@b.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(short_name.validate().is_err());

        let ok = RegisterRequest {
            username: "ismael".to_string(),
            email: "ismael@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let user = orienta_core::User {
            id: uuid::Uuid::new_v4(),
            username: "ismael".to_string(),
            email: "ismael@example.com".to_string(),
            password_hash: hash_password("correct-password").unwrap(),
            role: Role::Normal,
            favorites: vec![],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        // 두 실패 경로 모두 동일한 에러로 수렴
        let unknown = check_credentials(None, "correct-password").unwrap_err();
        let mismatch = check_credentials(Some(user.clone()), "wrong-password").unwrap_err();
        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(unknown, mismatch);

        // 올바른 자격증명은 통과
        assert!(check_credentials(Some(user), "correct-password").is_ok());
    }

    #[test]
    fn test_refresh_signing_failure_is_not_downgraded() {
        // 서명 실패는 내부 에러(500), 검증 실패만 401
        assert_eq!(
            refresh_error(JwtError::Signing("key failure".to_string())),
            AuthError::TokenIssuance
        );
        assert_eq!(
            refresh_error(JwtError::Expired),
            AuthError::InvalidRefreshToken
        );
        assert_eq!(
            refresh_error(JwtError::InvalidSignature),
            AuthError::InvalidRefreshToken
        );
    }

    #[tokio::test]
    async fn test_refresh_with_valid_token_returns_new_pair() {
        let state = Arc::new(create_test_state("auth-route-test-secret"));
        let pair = state
            .tokens
            .issue_pair("ismael@example.com", Role::Normal)
            .unwrap();
        let app = auth_router().with_state(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(REFRESH_TOKEN_HEADER, pair.refresh_token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let new_pair: TokenPair = serde_json::from_slice(&body).unwrap();
        assert!(state.tokens.validate_access(&new_pair.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_without_header_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_without_db_is_internal_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"a@b.com","password":"whatever123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
