//! Axum용 인증 미들웨어 및 추출기.
//!
//! 요청당 상태 기계:
//!
//! ```text
//! START -> [bearer 추출] -> 없음 -> REJECT(401)
//!                        -> 있음 -> VALIDATE
//! VALIDATE -> 유효        -> PROCEED (클레임 부착)
//! VALIDATE -> 형식/서명 오류 -> REJECT(401)
//! VALIDATE -> 만료        -> REFRESH
//! REFRESH  -> refresh 무효 -> REJECT(401)
//! REFRESH  -> refresh 유효 -> 새 쌍 발급 -> PROCEED (새 토큰 응답 헤더 반환)
//! PROCEED  -> [admin 라우트] -> role == admin -> ALLOW / 아니면 403
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiErrorResponse;
use crate::state::AppState;

use super::jwt::{Claims, JwtError, TokenPair};

/// Refresh Token이 전달되는 커스텀 헤더 이름 (표준 bearer 헤더와 분리).
pub const REFRESH_TOKEN_HEADER: &str = "refresh_token";
/// 인라인 갱신 시 새 Access Token이 반환되는 응답 헤더.
pub const NEW_ACCESS_TOKEN_HEADER: &str = "x-access-token";
/// 인라인 갱신 시 새 Refresh Token이 반환되는 응답 헤더.
pub const NEW_REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// 인증/인가 에러.
///
/// [`AuthError::Expired`]는 refresh 토큰이 동반되지 않았을 때만
/// 호출자에게 표면화됩니다. 동반된 경우 미들웨어가 Refresh Flow로
/// 복구를 시도합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization 헤더가 없거나 Bearer 형식이 아닙니다")]
    MissingHeader,
    #[error("잘못된 토큰 형식")]
    MalformedToken,
    #[error("토큰을 검증할 수 없습니다")]
    UnverifiableToken,
    #[error("유효하지 않은 토큰 서명")]
    InvalidSignature,
    #[error("만료된 토큰입니다. refresh 토큰이 필요합니다")]
    Expired,
    #[error("유효하지 않은 refresh 토큰")]
    InvalidRefreshToken,
    #[error("인증 정보가 없습니다")]
    MissingClaims,
    #[error("이 리소스에 접근할 권한이 없습니다")]
    InsufficientRole,
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
    #[error("토큰 발급에 실패했습니다")]
    TokenIssuance,
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingHeader => (StatusCode::UNAUTHORIZED, "MISSING_AUTH_HEADER"),
            AuthError::MalformedToken => (StatusCode::UNAUTHORIZED, "MALFORMED_TOKEN"),
            AuthError::UnverifiableToken => (StatusCode::UNAUTHORIZED, "UNVERIFIABLE_TOKEN"),
            AuthError::InvalidSignature => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN_SIGNATURE"),
            AuthError::Expired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::InvalidRefreshToken => (StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN"),
            AuthError::MissingClaims => (StatusCode::UNAUTHORIZED, "MISSING_CLAIMS"),
            AuthError::InsufficientRole => (StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            // 서명 실패는 내부 에러. 절대 "invalid token"으로 격하하지 않음
            AuthError::TokenIssuance => (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_ISSUANCE_FAILED"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(ApiErrorResponse::simple(code, self.to_string()));
        (status, body).into_response()
    }
}

impl From<AuthError> for crate::error::ApiError {
    fn from(err: AuthError) -> Self {
        let (status, code) = err.status_and_code();
        crate::error::ApiError {
            status,
            body: ApiErrorResponse::simple(code, err.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed => AuthError::MalformedToken,
            JwtError::Unverifiable => AuthError::UnverifiableToken,
            JwtError::InvalidSignature => AuthError::InvalidSignature,
            JwtError::Expired => AuthError::Expired,
            JwtError::Signing(_) => AuthError::TokenIssuance,
        }
    }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingHeader)
}

/// 인증 미들웨어.
///
/// Bearer 토큰을 검증하고 클레임을 request extension에 부착합니다.
/// 만료된 토큰은 `refresh_token` 헤더가 있으면 인라인으로 갱신하여
/// 원래 요청을 그대로 진행시키고, 새 토큰 쌍을 응답 헤더로
/// 반환합니다. 그 외의 검증 실패는 즉시 거부됩니다.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(req.headers()) {
        Ok(token) => token.to_owned(),
        Err(e) => return e.into_response(),
    };

    let mut reissued: Option<TokenPair> = None;

    let claims = match state.tokens.validate_access(&token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            let Some(refresh_token) = req
                .headers()
                .get(REFRESH_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
            else {
                return AuthError::Expired.into_response();
            };

            match state.tokens.refresh(refresh_token) {
                Ok((pair, claims)) => {
                    debug!(email = %claims.email, "Access token refreshed inline");
                    reissued = Some(pair);
                    claims
                }
                Err(JwtError::Signing(e)) => {
                    warn!(error = %e, "Token signing failed during refresh");
                    return AuthError::TokenIssuance.into_response();
                }
                Err(_) => return AuthError::InvalidRefreshToken.into_response(),
            }
        }
        Err(e) => return AuthError::from(e).into_response(),
    };

    req.extensions_mut().insert(claims);

    let mut response = next.run(req).await;

    // 갱신된 토큰을 호출자에게도 반환 (이후 요청에 사용)
    if let Some(pair) = reissued {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&pair.access_token) {
            headers.insert(NEW_ACCESS_TOKEN_HEADER, value);
        }
        if let Ok(value) = HeaderValue::from_str(&pair.refresh_token) {
            headers.insert(NEW_REFRESH_TOKEN_HEADER, value);
        }
    }

    response
}

/// 인증된 사용자 추출기.
///
/// [`authenticate`] 미들웨어가 부착한 클레임을 꺼냅니다. 클레임이
/// 없으면 미들웨어를 거치지 않고 배선된 라우트이므로 토큰 무효와는
/// 다른 실패 경로(`MISSING_CLAIMS`)로 거부합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn me(AuthUser(claims): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthError::MissingClaims)
    }
}

/// 역할 게이트: admin 역할만 통과시킵니다.
///
/// 클레임 부재(인증 누락, 401)와 역할 부족(권한 부족, 403)을
/// 구분합니다.
pub fn require_admin(claims: &Claims) -> Result<(), AuthError> {
    if claims.role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole)
    }
}

/// 관리자 전용 추출기.
///
/// 관리자 게이트는 이 추출기 하나로 일원화됩니다. 핸들러 내 인라인
/// 역할 검사를 별도로 두지 않습니다.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(&claims)?;
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use orienta_core::{AuthConfig, Role};
    use tower::ServiceExt;

    use crate::auth::jwt::TokenService;
    use crate::state::create_test_state;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_tokens() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        })
    }

    fn protected_app() -> Router {
        let state = Arc::new(create_test_state(TEST_SECRET));
        Router::new()
            .route("/private", get(|AuthUser(claims): AuthUser| async move { claims.email }))
            .route("/admin", get(|AdminUser(claims): AdminUser| async move { claims.email }))
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    async fn call(app: Router, req: HttpRequest<Body>) -> axum::response::Response {
        app.oneshot(req).await.unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), Err(AuthError::MissingHeader));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(extract_bearer_token(&headers), Err(AuthError::MissingHeader));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_require_admin_gate() {
        let tokens = test_tokens();
        let pair = tokens.issue_pair("admin@example.com", Role::Admin).unwrap();
        let admin_claims = tokens.validate_access(&pair.access_token).unwrap();
        assert!(require_admin(&admin_claims).is_ok());

        let pair = tokens.issue_pair("user@example.com", Role::Normal).unwrap();
        let normal_claims = tokens.validate_access(&pair.access_token).unwrap();
        assert_eq!(
            require_admin(&normal_claims),
            Err(AuthError::InsufficientRole)
        );
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            AuthError::InsufficientRole.status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::MissingClaims.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenIssuance.status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_request_without_token_is_rejected() {
        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() {
        let tokens = test_tokens();
        let pair = tokens.issue_pair("user@example.com", Role::Normal).unwrap();

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .header(AUTHORIZATION, format!("Bearer {}", pair.access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let tokens = test_tokens();
        let pair = tokens.issue_pair("user@example.com", Role::Normal).unwrap();
        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .header(AUTHORIZATION, format!("Bearer {}", tampered))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_normal_role_is_forbidden_on_admin_route() {
        let tokens = test_tokens();
        let pair = tokens.issue_pair("user@example.com", Role::Normal).unwrap();

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/admin")
                .header(AUTHORIZATION, format!("Bearer {}", pair.access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_role_is_allowed_on_admin_route() {
        let tokens = test_tokens();
        let pair = tokens.issue_pair("admin@example.com", Role::Admin).unwrap();

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/admin")
                .header(AUTHORIZATION, format!("Bearer {}", pair.access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_claims_without_middleware_is_unauthorized() {
        // 미들웨어 없이 추출기만 배선된 라우트: 클레임 부재는 401
        let app = Router::new().route(
            "/unwired",
            get(|AuthUser(claims): AuthUser| async move { claims.email }),
        );

        let response = call(
            app,
            HttpRequest::builder()
                .uri("/unwired")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_header_is_rejected() {
        let tokens = test_tokens();
        let expired = tokens.issue_expired_for_tests("user@example.com", Role::Normal);

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .header(AUTHORIZATION, format!("Bearer {}", expired))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_with_valid_refresh_is_upgraded_inline() {
        let tokens = test_tokens();
        let expired = tokens.issue_expired_for_tests("user@example.com", Role::Normal);
        let pair = tokens.issue_pair("user@example.com", Role::Normal).unwrap();

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .header(AUTHORIZATION, format!("Bearer {}", expired))
                .header(REFRESH_TOKEN_HEADER, pair.refresh_token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        // 원래 요청이 그대로 진행되고, 새 토큰이 응답 헤더로 반환됨
        assert_eq!(response.status(), StatusCode::OK);

        let new_access = response
            .headers()
            .get(NEW_ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("new access token header");
        let claims = tokens.validate_access(new_access).unwrap();
        assert_eq!(claims.email, "user@example.com");

        assert!(response.headers().contains_key(NEW_REFRESH_TOKEN_HEADER));
    }

    #[tokio::test]
    async fn test_expired_token_with_invalid_refresh_is_rejected() {
        let tokens = test_tokens();
        let expired = tokens.issue_expired_for_tests("user@example.com", Role::Normal);

        let response = call(
            protected_app(),
            HttpRequest::builder()
                .uri("/private")
                .header(AUTHORIZATION, format!("Bearer {}", expired))
                .header(REFRESH_TOKEN_HEADER, "garbage.refresh.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!response.headers().contains_key(NEW_ACCESS_TOKEN_HEADER));
    }
}
