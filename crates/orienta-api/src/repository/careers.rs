//! Career Repository
//!
//! 직업(Job)과 산업 분야(Sector) 관련 데이터베이스 연산을 담당합니다.
//! 직업의 상세 설명 문서는 JSONB 컬럼으로 보관됩니다.

use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use orienta_core::{
    domain::{Job, JobAbout, Sector, WorkingEnvironment},
    OrientaError,
};

use super::map_unique_violation;

/// jobs 테이블 레코드.
#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    name: String,
    about: Json<JobAbout>,
    working_environment: Json<WorkingEnvironment>,
    formation: String,
    sector_id: Option<Uuid>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            name: row.name,
            about: row.about.0,
            working_environment: row.working_environment.0,
            formation: row.formation,
            sector_id: row.sector_id,
        }
    }
}

/// sectors 테이블 레코드.
#[derive(Debug, FromRow)]
struct SectorRow {
    id: Uuid,
    name: String,
}

impl From<SectorRow> for Sector {
    fn from(row: SectorRow) -> Self {
        Sector {
            id: row.id,
            name: row.name,
        }
    }
}

/// 직업 업데이트 입력. None인 필드는 변경되지 않습니다.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJob {
    pub name: Option<String>,
    pub about: Option<JobAbout>,
    pub working_environment: Option<WorkingEnvironment>,
    pub formation: Option<String>,
    pub sector_id: Option<Uuid>,
}

/// Career Repository
pub struct CareerRepository;

impl CareerRepository {
    // ============================================================================================
    // Job Operations
    // ============================================================================================

    /// 전체 직업 목록 조회.
    pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Job::from).collect())
    }

    /// ID로 직업 조회.
    pub async fn find_job_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Job::from))
    }

    /// 직업 생성.
    ///
    /// 직업 이름 unique 제약 위반은 Duplicate로 변환됩니다.
    pub async fn create_job(pool: &PgPool, job: Job) -> Result<Job, OrientaError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (id, name, about, working_environment, formation, sector_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(&job.name)
        .bind(Json(&job.about))
        .bind(Json(&job.working_environment))
        .bind(&job.formation)
        .bind(job.sector_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 존재하는 직업 이름입니다"))?;

        Ok(row.into())
    }

    /// 직업 수정 (None인 필드는 유지).
    pub async fn update_job(
        pool: &PgPool,
        id: Uuid,
        input: UpdateJob,
    ) -> Result<Option<Job>, OrientaError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET
                name = COALESCE($2, name),
                about = COALESCE($3, about),
                working_environment = COALESCE($4, working_environment),
                formation = COALESCE($5, formation),
                sector_id = COALESCE($6, sector_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.about.as_ref().map(Json))
        .bind(input.working_environment.as_ref().map(Json))
        .bind(&input.formation)
        .bind(input.sector_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 존재하는 직업 이름입니다"))?;

        Ok(row.map(Job::from))
    }

    // ============================================================================================
    // Sector Operations
    // ============================================================================================

    /// 전체 산업 분야 목록 조회.
    pub async fn list_sectors(pool: &PgPool) -> Result<Vec<Sector>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SectorRow>("SELECT * FROM sectors ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Sector::from).collect())
    }

    /// ID로 산업 분야 조회 (직업 생성 시 sector_id 검증용).
    pub async fn find_sector_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Sector>, sqlx::Error> {
        let row = sqlx::query_as::<_, SectorRow>("SELECT * FROM sectors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Sector::from))
    }

    /// 산업 분야 생성.
    pub async fn create_sector(pool: &PgPool, name: &str) -> Result<Sector, OrientaError> {
        let row = sqlx::query_as::<_, SectorRow>(
            "INSERT INTO sectors (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 존재하는 산업 분야입니다"))?;

        Ok(row.into())
    }
}
