//! 교육 프로그램 라우트.
//!
//! 조회는 공개, 생성/수정/삭제는 관리자 전용입니다.

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

use orienta_core::Program;

use crate::auth::{authenticate, AdminUser};
use crate::error::{ApiError, ApiResult};
use crate::repository::{ProgramRepository, UpdateProgram};
use crate::state::AppState;

/// 프로그램 생성 요청. id는 서버에서 생성됩니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub duration_months: i32,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub career_prospects: Vec<String>,
}

/// 프로그램 목록 조회.
///
/// GET /api/v1/programs
pub async fn list_programs(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Program>> {
    let pool = state.require_db()?;
    let programs = ProgramRepository::list(pool).await?;

    Ok(Json(programs))
}

/// 프로그램 상세 조회.
///
/// GET /api/v1/programs/{id}
pub async fn get_program(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Program> {
    let pool = state.require_db()?;
    let program = ProgramRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("프로그램을 찾을 수 없습니다"))?;

    Ok(Json(program))
}

/// 프로그램 생성 (관리자 전용).
///
/// POST /api/v1/programs
pub async fn create_program(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    let pool = state.require_db()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("프로그램 이름은 비어 있을 수 없습니다"));
    }
    if payload.duration_months < 0 {
        return Err(ApiError::bad_request("기간은 음수일 수 없습니다"));
    }

    let program = ProgramRepository::create(
        pool,
        Program {
            id: Uuid::new_v4(),
            name: payload.name,
            level: payload.level,
            duration_months: payload.duration_months,
            requirements: payload.requirements,
            career_prospects: payload.career_prospects,
        },
    )
    .await?;

    info!(program_id = %program.id, admin = %claims.email, "Program created");

    Ok((StatusCode::CREATED, Json(program)))
}

/// 프로그램 수정 (관리자 전용).
///
/// PATCH /api/v1/programs/{id}
pub async fn update_program(
    AdminUser(_claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProgram>,
) -> ApiResult<Program> {
    let pool = state.require_db()?;

    let program = ProgramRepository::update(pool, id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("프로그램을 찾을 수 없습니다"))?;

    Ok(Json(program))
}

/// 프로그램 삭제 (관리자 전용).
///
/// DELETE /api/v1/programs/{id}
pub async fn delete_program(
    AdminUser(claims): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = state.require_db()?;

    if !ProgramRepository::delete(pool, id).await? {
        return Err(ApiError::not_found("프로그램을 찾을 수 없습니다"));
    }

    info!(program_id = %id, admin = %claims.email, "Program deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 프로그램 라우터 생성. 조회는 공개, 변경 핸들러에만 인증이 적용됩니다.
pub fn programs_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state, authenticate);

    Router::new()
        .route(
            "/",
            get(list_programs).post(create_program.layer(auth.clone())),
        )
        .route(
            "/{id}",
            get(get_program)
                .patch(update_program.layer(auth.clone()))
                .delete(delete_program.layer(auth)),
        )
}
