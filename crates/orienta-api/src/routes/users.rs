//! 사용자 라우트.
//!
//! 사용자 조회/수정/삭제와 즐겨찾기 관리를 제공합니다. 모든
//! 엔드포인트는 인증 미들웨어 뒤에 배선되며, 본인 또는 관리자만
//! 개별 계정을 수정할 수 있습니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use orienta_core::{Role, User};

use crate::auth::{
    authenticate, hash_password, validate_password_strength, AdminUser, AuthError, AuthUser,
    Claims,
};
use crate::error::{ApiError, ApiResult};
use crate::repository::{UniversityRepository, UpdateUser, UserRepository};
use crate::state::AppState;

/// 사용자 수정 요청. None인 필드는 변경되지 않습니다.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// 평문 비밀번호 (서버에서 재해싱)
    pub password: Option<String>,
    /// 역할 변경은 관리자만 가능
    pub role: Option<Role>,
}

/// 본인 계정이거나 관리자인지 확인.
fn require_self_or_admin(claims: &Claims, target: &User) -> Result<(), AuthError> {
    if claims.role.is_admin() || claims.email == target.email {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole)
    }
}

/// 전체 사용자 목록 조회 (관리자 전용).
///
/// GET /api/v1/users
pub async fn list_users(
    AdminUser(_claims): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<User>> {
    let pool = state.require_db()?;
    let users = UserRepository::list(pool).await?;

    Ok(Json(users))
}

/// 사용자 조회.
///
/// GET /api/v1/users/{id}
pub async fn get_user(
    AuthUser(_claims): AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    let pool = state.require_db()?;
    let user = UserRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(user))
}

/// 사용자 수정 (본인 또는 관리자).
///
/// PATCH /api/v1/users/{id}
pub async fn update_user(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let pool = state.require_db()?;

    let target = UserRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;
    require_self_or_admin(&claims, &target)?;

    if payload.role.is_some() && !claims.role.is_admin() {
        return Err(AuthError::InsufficientRole.into());
    }

    // 변경되는 필드에 대해 가입 시와 동일한 검사를 적용
    if let Some(email) = &payload.email {
        if let Some(existing) = UserRepository::find_by_email(pool, email).await? {
            if existing.id != id {
                return Err(ApiError::bad_request("이미 사용 중인 이메일입니다"));
            }
        }
    }
    if let Some(username) = &payload.username {
        if let Some(existing) = UserRepository::find_by_username(pool, username).await? {
            if existing.id != id {
                return Err(ApiError::bad_request("이미 사용 중인 사용자 이름입니다"));
            }
        }
    }

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password_strength(password).map_err(ApiError::bad_request)?;
            Some(hash_password(password).map_err(|e| ApiError::internal(e.to_string()))?)
        }
        None => None,
    };

    let updated = UserRepository::update(
        pool,
        id,
        UpdateUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: payload.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(updated))
}

/// 사용자 삭제 (관리자 전용).
///
/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = state.require_db()?;

    if !UserRepository::delete(pool, id).await? {
        return Err(ApiError::not_found("사용자를 찾을 수 없습니다"));
    }

    info!(deleted_user_id = %id, admin = %claims.email, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 즐겨찾기 추가 (본인 또는 관리자, 멱등).
///
/// POST /api/v1/users/{id}/favorites/{univ_id}
pub async fn add_favorite(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    Path((id, univ_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<User> {
    let pool = state.require_db()?;

    let target = UserRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;
    require_self_or_admin(&claims, &target)?;

    if UniversityRepository::find_by_id(pool, univ_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("대학을 찾을 수 없습니다"));
    }

    let user = UserRepository::add_favorite(pool, id, univ_id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(user))
}

/// 즐겨찾기 제거 (본인 또는 관리자, 멱등).
///
/// DELETE /api/v1/users/{id}/favorites/{univ_id}
pub async fn remove_favorite(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    Path((id, univ_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<User> {
    let pool = state.require_db()?;

    let target = UserRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;
    require_self_or_admin(&claims, &target)?;

    let user = UserRepository::remove_favorite(pool, id, univ_id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(user))
}

/// 사용자 라우터 생성. 전체가 인증 미들웨어 뒤에 배선됩니다.
pub fn users_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/{id}/favorites/{univ_id}",
            post(add_favorite).delete(remove_favorite),
        )
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::AUTHORIZATION, Request};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    const TEST_SECRET: &str = "users-route-test-secret";

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .nest("/api/v1/users", users_router(state.clone()))
            .with_state(state)
    }

    #[test]
    fn test_require_self_or_admin() {
        let state = create_test_state(TEST_SECRET);
        let target = User {
            id: Uuid::new_v4(),
            username: "ismael".to_string(),
            email: "ismael@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Normal,
            favorites: vec![],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let own = state
            .tokens
            .issue_pair("ismael@example.com", Role::Normal)
            .unwrap();
        let own_claims = state.tokens.validate_access(&own.access_token).unwrap();
        assert!(require_self_or_admin(&own_claims, &target).is_ok());

        let admin = state
            .tokens
            .issue_pair("admin@example.com", Role::Admin)
            .unwrap();
        let admin_claims = state.tokens.validate_access(&admin.access_token).unwrap();
        assert!(require_self_or_admin(&admin_claims, &target).is_ok());

        let other = state
            .tokens
            .issue_pair("other@example.com", Role::Normal)
            .unwrap();
        let other_claims = state.tokens.validate_access(&other.access_token).unwrap();
        assert_eq!(
            require_self_or_admin(&other_claims, &target),
            Err(AuthError::InsufficientRole)
        );
    }

    #[tokio::test]
    async fn test_list_users_requires_admin_role() {
        let state = Arc::new(create_test_state(TEST_SECRET));
        let pair = state
            .tokens
            .issue_pair("user@example.com", Role::Normal)
            .unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users")
                    .header(AUTHORIZATION, format!("Bearer {}", pair.access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_users_routes_reject_anonymous() {
        let state = Arc::new(create_test_state(TEST_SECRET));

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
