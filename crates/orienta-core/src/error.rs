//! 오리엔테이션 플랫폼의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 플랫폼 에러.
#[derive(Debug, Error)]
pub enum OrientaError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 중복된 값 (unique 제약 위반)
    #[error("중복된 값: {0}")]
    Duplicate(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl OrientaError {
    /// 클라이언트 입력 문제로 발생한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OrientaError::InvalidInput(_) | OrientaError::Duplicate(_) | OrientaError::NotFound(_)
        )
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for OrientaError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => OrientaError::NotFound("행을 찾을 수 없습니다".to_string()),
            other => OrientaError::Database(other.to_string()),
        }
    }
}
