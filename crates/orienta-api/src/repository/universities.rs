//! University Repository
//!
//! 대학 관련 데이터베이스 연산을 담당합니다. 부속 문서(위치, 연락처,
//! 행사, 평가)는 JSONB 컬럼으로 보관됩니다.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use orienta_core::{
    domain::{normalize_name, Contact, Event, Location, Rating, University},
    OrientaError,
};

use super::map_unique_violation;

/// universities 테이블 레코드.
#[derive(Debug, FromRow)]
struct UniversityRow {
    id: Uuid,
    name: String,
    location: Json<Location>,
    presentation: String,
    is_private: bool,
    tuition: Decimal,
    contact: Json<Contact>,
    image_url: String,
    document_url: String,
    program_ids: Vec<Uuid>,
    infrastructure: Vec<String>,
    partnerships: Vec<String>,
    success_diplomas: Decimal,
    events: Json<Vec<Event>>,
    news: Vec<String>,
    photos: Vec<String>,
    ratings: Json<Vec<Rating>>,
}

impl From<UniversityRow> for University {
    fn from(row: UniversityRow) -> Self {
        University {
            id: row.id,
            name: row.name,
            location: row.location.0,
            presentation: row.presentation,
            is_private: row.is_private,
            tuition: row.tuition,
            contact: row.contact.0,
            image_url: row.image_url,
            document_url: row.document_url,
            program_ids: row.program_ids,
            infrastructure: row.infrastructure,
            partnerships: row.partnerships,
            success_diplomas: row.success_diplomas,
            events: row.events.0,
            news: row.news,
            photos: row.photos,
            ratings: row.ratings.0,
        }
    }
}

/// 대학 목록 필터.
///
/// name은 대소문자 무시 부분 일치, 나머지는 완전 일치입니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityFilter {
    pub name: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub region: Option<String>,
    pub is_private: Option<bool>,
    pub max_tuition: Option<Decimal>,
}

/// 대학 업데이트 입력. None인 필드는 변경되지 않습니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUniversity {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub presentation: Option<String>,
    pub is_private: Option<bool>,
    pub tuition: Option<Decimal>,
    pub contact: Option<Contact>,
    pub image_url: Option<String>,
    pub document_url: Option<String>,
    pub program_ids: Option<Vec<Uuid>>,
    pub infrastructure: Option<Vec<String>>,
    pub partnerships: Option<Vec<String>>,
    pub success_diplomas: Option<Decimal>,
    pub events: Option<Vec<Event>>,
    pub news: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
    pub ratings: Option<Vec<Rating>>,
}

/// University Repository
pub struct UniversityRepository;

impl UniversityRepository {
    /// ID로 대학 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<University>, sqlx::Error> {
        let row = sqlx::query_as::<_, UniversityRow>("SELECT * FROM universities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(University::from))
    }

    /// 정규화된 이름으로 대학 조회 (유일성 검사용).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<University>, sqlx::Error> {
        let row = sqlx::query_as::<_, UniversityRow>(
            "SELECT * FROM universities WHERE normalized_name = $1",
        )
        .bind(normalize_name(name))
        .fetch_optional(pool)
        .await?;

        Ok(row.map(University::from))
    }

    /// 필터 조건에 맞는 대학 목록 조회.
    pub async fn list(
        pool: &PgPool,
        filter: &UniversityFilter,
    ) -> Result<Vec<University>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM universities WHERE 1=1");

        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ");
            query.push_bind(format!("%{}%", name));
        }
        if let Some(city) = &filter.city {
            query.push(" AND location->>'city' = ");
            query.push_bind(city);
        }
        if let Some(province) = &filter.province {
            query.push(" AND location->>'province' = ");
            query.push_bind(province);
        }
        if let Some(region) = &filter.region {
            query.push(" AND location->>'region' = ");
            query.push_bind(region);
        }
        if let Some(is_private) = filter.is_private {
            query.push(" AND is_private = ");
            query.push_bind(is_private);
        }
        if let Some(max_tuition) = filter.max_tuition {
            query.push(" AND tuition <= ");
            query.push_bind(max_tuition);
        }

        query.push(" ORDER BY name");

        let rows = query
            .build_query_as::<UniversityRow>()
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(University::from).collect())
    }

    /// 대학 생성.
    ///
    /// 정규화된 이름의 unique 제약 위반은 Duplicate로 변환됩니다.
    pub async fn create(pool: &PgPool, univ: University) -> Result<University, OrientaError> {
        let row = sqlx::query_as::<_, UniversityRow>(
            r#"
            INSERT INTO universities (
                id, name, normalized_name, location, presentation, is_private,
                tuition, contact, image_url, document_url, program_ids,
                infrastructure, partnerships, success_diplomas, events, news,
                photos, ratings
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(univ.id)
        .bind(&univ.name)
        .bind(normalize_name(&univ.name))
        .bind(Json(&univ.location))
        .bind(&univ.presentation)
        .bind(univ.is_private)
        .bind(univ.tuition)
        .bind(Json(&univ.contact))
        .bind(&univ.image_url)
        .bind(&univ.document_url)
        .bind(&univ.program_ids)
        .bind(&univ.infrastructure)
        .bind(&univ.partnerships)
        .bind(univ.success_diplomas)
        .bind(Json(&univ.events))
        .bind(&univ.news)
        .bind(&univ.photos)
        .bind(Json(&univ.ratings))
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 존재하는 대학 이름입니다"))?;

        Ok(row.into())
    }

    /// 대학 수정 (None인 필드는 유지).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateUniversity,
    ) -> Result<Option<University>, OrientaError> {
        let normalized = input.name.as_deref().map(normalize_name);

        let row = sqlx::query_as::<_, UniversityRow>(
            r#"
            UPDATE universities
            SET
                name = COALESCE($2, name),
                normalized_name = COALESCE($3, normalized_name),
                location = COALESCE($4, location),
                presentation = COALESCE($5, presentation),
                is_private = COALESCE($6, is_private),
                tuition = COALESCE($7, tuition),
                contact = COALESCE($8, contact),
                image_url = COALESCE($9, image_url),
                document_url = COALESCE($10, document_url),
                program_ids = COALESCE($11, program_ids),
                infrastructure = COALESCE($12, infrastructure),
                partnerships = COALESCE($13, partnerships),
                success_diplomas = COALESCE($14, success_diplomas),
                events = COALESCE($15, events),
                news = COALESCE($16, news),
                photos = COALESCE($17, photos),
                ratings = COALESCE($18, ratings)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(normalized)
        .bind(input.location.as_ref().map(Json))
        .bind(&input.presentation)
        .bind(input.is_private)
        .bind(input.tuition)
        .bind(input.contact.as_ref().map(Json))
        .bind(&input.image_url)
        .bind(&input.document_url)
        .bind(&input.program_ids)
        .bind(&input.infrastructure)
        .bind(&input.partnerships)
        .bind(input.success_diplomas)
        .bind(input.events.as_ref().map(Json))
        .bind(&input.news)
        .bind(&input.photos)
        .bind(input.ratings.as_ref().map(Json))
        .fetch_optional(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 존재하는 대학 이름입니다"))?;

        Ok(row.map(University::from))
    }

    /// 대학 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM universities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
