//! 대학 라우트.
//!
//! 조회는 공개, 생성/수정/삭제는 관리자 전용입니다. 관리자 전용
//! 핸들러에만 인증 미들웨어가 적용됩니다.

use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use orienta_core::domain::{Contact, Event, Location, Rating, University};

use crate::auth::{authenticate, AdminUser};
use crate::error::{ApiError, ApiResult};
use crate::repository::{UniversityFilter, UniversityRepository, UpdateUniversity};
use crate::state::AppState;

/// 대학 생성 요청. id는 서버에서 생성됩니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUniversityRequest {
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub presentation: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub tuition: Decimal,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub document_url: String,
    #[serde(default)]
    pub program_ids: Vec<Uuid>,
    #[serde(default)]
    pub infrastructure: Vec<String>,
    #[serde(default)]
    pub partnerships: Vec<String>,
    #[serde(default)]
    pub success_diplomas: Decimal,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub news: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl CreateUniversityRequest {
    fn into_university(self) -> University {
        University {
            id: Uuid::new_v4(),
            name: self.name,
            location: self.location,
            presentation: self.presentation,
            is_private: self.is_private,
            tuition: self.tuition,
            contact: self.contact,
            image_url: self.image_url,
            document_url: self.document_url,
            program_ids: self.program_ids,
            infrastructure: self.infrastructure,
            partnerships: self.partnerships,
            success_diplomas: self.success_diplomas,
            events: self.events,
            news: self.news,
            photos: self.photos,
            ratings: self.ratings,
        }
    }
}

/// 대학 목록 조회 (필터 지원).
///
/// GET /api/v1/universities?name=&city=&province=&region=&isPrivate=&maxTuition=
pub async fn list_universities(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<UniversityFilter>,
) -> ApiResult<Vec<University>> {
    let pool = state.require_db()?;
    let universities = UniversityRepository::list(pool, &filter).await?;

    Ok(Json(universities))
}

/// 대학 상세 조회.
///
/// GET /api/v1/universities/{id}
pub async fn get_university(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<University> {
    let pool = state.require_db()?;
    let university = UniversityRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("대학을 찾을 수 없습니다"))?;

    Ok(Json(university))
}

/// 대학 생성 (관리자 전용).
///
/// POST /api/v1/universities
pub async fn create_university(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUniversityRequest>,
) -> Result<(StatusCode, Json<University>), ApiError> {
    let pool = state.require_db()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("대학 이름은 비어 있을 수 없습니다"));
    }

    // 정규화된 이름 기준 중복 검사 (unique 제약이 백스톱)
    if UniversityRepository::find_by_name(pool, &payload.name)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("이미 존재하는 대학 이름입니다"));
    }

    let university = UniversityRepository::create(pool, payload.into_university()).await?;

    info!(university_id = %university.id, admin = %claims.email, "University created");

    Ok((StatusCode::CREATED, Json(university)))
}

/// 대학 수정 (관리자 전용).
///
/// PATCH /api/v1/universities/{id}
pub async fn update_university(
    AdminUser(_claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUniversity>,
) -> ApiResult<University> {
    let pool = state.require_db()?;

    let university = UniversityRepository::update(pool, id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("대학을 찾을 수 없습니다"))?;

    Ok(Json(university))
}

/// 대학 삭제 (관리자 전용).
///
/// DELETE /api/v1/universities/{id}
pub async fn delete_university(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = state.require_db()?;

    if !UniversityRepository::delete(pool, id).await? {
        return Err(ApiError::not_found("대학을 찾을 수 없습니다"));
    }

    info!(university_id = %id, admin = %claims.email, "University deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 대학 라우터 생성. 조회는 공개, 변경 핸들러에만 인증이 적용됩니다.
pub fn universities_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state, authenticate);

    Router::new()
        .route(
            "/",
            get(list_universities).post(create_university.layer(auth.clone())),
        )
        .route(
            "/{id}",
            get(get_university)
                .patch(update_university.layer(auth.clone()))
                .delete(delete_university.layer(auth)),
        )
}
