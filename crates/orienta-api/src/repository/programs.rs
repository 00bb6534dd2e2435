//! Program Repository
//!
//! 교육 프로그램 관련 데이터베이스 연산을 담당합니다.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orienta_core::Program;

/// programs 테이블 레코드.
#[derive(Debug, FromRow)]
struct ProgramRow {
    id: Uuid,
    name: String,
    level: String,
    duration_months: i32,
    requirements: Vec<String>,
    career_prospects: Vec<String>,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: row.id,
            name: row.name,
            level: row.level,
            duration_months: row.duration_months,
            requirements: row.requirements,
            career_prospects: row.career_prospects,
        }
    }
}

/// 프로그램 업데이트 입력. None인 필드는 변경되지 않습니다.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgram {
    pub name: Option<String>,
    pub level: Option<String>,
    pub duration_months: Option<i32>,
    pub requirements: Option<Vec<String>>,
    pub career_prospects: Option<Vec<String>>,
}

/// Program Repository
pub struct ProgramRepository;

impl ProgramRepository {
    /// 전체 프로그램 목록 조회.
    pub async fn list(pool: &PgPool) -> Result<Vec<Program>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProgramRow>("SELECT * FROM programs ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Program::from).collect())
    }

    /// ID로 프로그램 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Program>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProgramRow>("SELECT * FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Program::from))
    }

    /// 프로그램 생성.
    pub async fn create(pool: &PgPool, program: Program) -> Result<Program, sqlx::Error> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            INSERT INTO programs (id, name, level, duration_months, requirements, career_prospects)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(program.id)
        .bind(&program.name)
        .bind(&program.level)
        .bind(program.duration_months)
        .bind(&program.requirements)
        .bind(&program.career_prospects)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    /// 프로그램 수정 (None인 필드는 유지).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateProgram,
    ) -> Result<Option<Program>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            UPDATE programs
            SET
                name = COALESCE($2, name),
                level = COALESCE($3, level),
                duration_months = COALESCE($4, duration_months),
                requirements = COALESCE($5, requirements),
                career_prospects = COALESCE($6, career_prospects)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.level)
        .bind(input.duration_months)
        .bind(&input.requirements)
        .bind(&input.career_prospects)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Program::from))
    }

    /// 프로그램 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
