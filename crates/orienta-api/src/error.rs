//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use orienta_core::OrientaError;

/// 통합 API 에러 응답 바디.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "대학을 찾을 수 없습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DB_ERROR", "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// HTTP 상태가 결합된 API 에러.
///
/// 핸들러는 `ApiResult<T>`를 반환하고 `?`로 에러를 전파합니다.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP 상태 코드
    pub status: StatusCode,
    /// 응답 바디
    pub body: ApiErrorResponse,
}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    /// 임의 상태의 에러 생성.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse::new(code, message),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// 데이터베이스 미설정/장애용 500.
    pub fn database_unavailable() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DB_UNAVAILABLE",
            "데이터베이스를 사용할 수 없습니다",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("리소스를 찾을 수 없습니다"),
            other => {
                tracing::error!(error = %other, "Database query failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DB_ERROR",
                    "데이터베이스 오류가 발생했습니다",
                )
            }
        }
    }
}

impl From<OrientaError> for ApiError {
    fn from(err: OrientaError) -> Self {
        match &err {
            OrientaError::NotFound(msg) => Self::not_found(msg.clone()),
            OrientaError::Duplicate(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "DUPLICATE", msg.clone())
            }
            OrientaError::InvalidInput(msg) => Self::bad_request(msg.clone()),
            _ => {
                tracing::error!(error = %err, "Internal error");
                Self::internal("내부 오류가 발생했습니다")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ApiErrorResponse::simple("NOT_FOUND", "missing");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "missing");
        // 선택 필드는 생략됨
        assert!(json.get("details").is_none());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_maps_to_400() {
        let err = ApiError::from(OrientaError::Duplicate("email".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "DUPLICATE");
    }
}
