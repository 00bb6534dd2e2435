//! User Repository
//!
//! 사용자 계정 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orienta_core::{OrientaError, Role, User};

use super::map_unique_violation;

/// users 테이블 레코드.
///
/// role은 TEXT로 저장되며 도메인 타입으로 변환 시 파싱됩니다.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    favorites: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: Role::parse(&row.role).unwrap_or_default(),
            favorites: row.favorites,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 새 사용자 입력. password_hash는 이미 해싱된 PHC 문자열이어야 합니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 사용자 업데이트 입력. None인 필드는 변경되지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// 이메일로 사용자 조회 (로그인 경로).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// 사용자 이름으로 조회 (중복 검사용).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// ID로 사용자 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// 전체 사용자 목록 조회 (관리자용).
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// 사용자 생성.
    ///
    /// email/username unique 제약 위반은 Duplicate로 변환됩니다.
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<User, OrientaError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, favorites)
            VALUES ($1, $2, $3, $4, $5, '{}')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.to_string())
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 사용 중인 이메일 또는 사용자 이름입니다"))?;

        Ok(row.into())
    }

    /// 사용자 수정 (None인 필드는 유지).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateUser,
    ) -> Result<Option<User>, OrientaError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.map(|r| r.to_string()))
        .fetch_optional(pool)
        .await
        .map_err(|e| map_unique_violation(e, "이미 사용 중인 이메일 또는 사용자 이름입니다"))?;

        Ok(row.map(User::from))
    }

    /// 사용자 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 즐겨찾기 추가 (집합 의미: 이미 있으면 변경 없음).
    pub async fn add_favorite(
        pool: &PgPool,
        user_id: Uuid,
        university_id: Uuid,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET favorites = array_append(favorites, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(favorites))
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(university_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into())),
            // 이미 즐겨찾기에 있는 경우: 현재 상태 반환 (멱등)
            None => Self::find_by_id(pool, user_id).await,
        }
    }

    /// 즐겨찾기 제거 (없으면 변경 없음, 멱등).
    pub async fn remove_favorite(
        pool: &PgPool,
        user_id: Uuid,
        university_id: Uuid,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET favorites = array_remove(favorites, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(university_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_role_parsing() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "ismael".to_string(),
            email: "ismael@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "admin".to_string(),
            favorites: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let user = User::from(row);
        assert!(user.role.is_admin());
    }

    #[test]
    fn test_unknown_role_falls_back_to_normal() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "x".to_string(),
            email: "x@example.com".to_string(),
            password_hash: String::new(),
            role: "superuser".to_string(),
            favorites: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(User::from(row).role, Role::Normal);
    }
}
