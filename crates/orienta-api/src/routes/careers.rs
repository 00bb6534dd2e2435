//! 직업/진로 라우트.
//!
//! 직업과 산업 분야 조회는 공개, 생성/수정은 관리자 전용입니다.
//! 직업 삭제 엔드포인트는 제공되지 않습니다.

use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use orienta_core::domain::{Job, JobAbout, Sector, WorkingEnvironment};

use crate::auth::{authenticate, AdminUser};
use crate::error::{ApiError, ApiResult};
use crate::repository::{CareerRepository, UpdateJob};
use crate::state::AppState;

/// 직업 생성 요청. id는 서버에서 생성됩니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub name: String,
    #[serde(default)]
    pub about: JobAbout,
    #[serde(default)]
    pub working_environment: WorkingEnvironment,
    #[serde(default)]
    pub formation: String,
    #[serde(default)]
    pub sector_id: Option<Uuid>,
}

/// 산업 분야 생성 요청.
#[derive(Debug, Deserialize)]
pub struct CreateSectorRequest {
    pub name: String,
}

/// 직업 목록 조회.
///
/// GET /api/v1/jobs
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Job>> {
    let pool = state.require_db()?;
    let jobs = CareerRepository::list_jobs(pool).await?;

    Ok(Json(jobs))
}

/// 직업 상세 조회.
///
/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Job> {
    let pool = state.require_db()?;
    let job = CareerRepository::find_job_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("직업을 찾을 수 없습니다"))?;

    Ok(Json(job))
}

/// 직업 생성 (관리자 전용).
///
/// POST /api/v1/jobs
pub async fn create_job(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let pool = state.require_db()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("직업 이름은 비어 있을 수 없습니다"));
    }

    // sector_id가 지정된 경우 해당 분야가 존재해야 함
    if let Some(sector_id) = payload.sector_id {
        if CareerRepository::find_sector_by_id(pool, sector_id)
            .await?
            .is_none()
        {
            return Err(ApiError::bad_request("존재하지 않는 산업 분야입니다"));
        }
    }

    let job = CareerRepository::create_job(
        pool,
        Job {
            id: Uuid::new_v4(),
            name: payload.name,
            about: payload.about,
            working_environment: payload.working_environment,
            formation: payload.formation,
            sector_id: payload.sector_id,
        },
    )
    .await?;

    info!(job_id = %job.id, admin = %claims.email, "Job created");

    Ok((StatusCode::CREATED, Json(job)))
}

/// 직업 수정 (관리자 전용).
///
/// PATCH /api/v1/jobs/{id}
pub async fn update_job(
    AdminUser(_claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJob>,
) -> ApiResult<Job> {
    let pool = state.require_db()?;

    if let Some(sector_id) = payload.sector_id {
        if CareerRepository::find_sector_by_id(pool, sector_id)
            .await?
            .is_none()
        {
            return Err(ApiError::bad_request("존재하지 않는 산업 분야입니다"));
        }
    }

    let job = CareerRepository::update_job(pool, id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("직업을 찾을 수 없습니다"))?;

    Ok(Json(job))
}

/// 산업 분야 목록 조회.
///
/// GET /api/v1/sectors
pub async fn list_sectors(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Sector>> {
    let pool = state.require_db()?;
    let sectors = CareerRepository::list_sectors(pool).await?;

    Ok(Json(sectors))
}

/// 산업 분야 생성 (관리자 전용).
///
/// POST /api/v1/sectors
pub async fn create_sector(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSectorRequest>,
) -> Result<(StatusCode, Json<Sector>), ApiError> {
    let pool = state.require_db()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("분야 이름은 비어 있을 수 없습니다"));
    }

    let sector = CareerRepository::create_sector(pool, &payload.name).await?;

    info!(sector_id = %sector.id, admin = %claims.email, "Sector created");

    Ok((StatusCode::CREATED, Json(sector)))
}

/// 직업/분야 라우터 생성. 조회는 공개, 변경 핸들러에만 인증이 적용됩니다.
pub fn careers_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state, authenticate);

    Router::new()
        .route("/jobs", get(list_jobs).post(create_job.layer(auth.clone())))
        .route(
            "/jobs/{id}",
            get(get_job).patch(update_job.layer(auth.clone())),
        )
        .route(
            "/sectors",
            get(list_sectors).post(create_sector.layer(auth)),
        )
}
