//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use orienta_core::AppConfig;

use crate::auth::TokenService;

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: Option<sqlx::PgPool>,

    /// 토큰 발급/검증 서비스
    pub tokens: TokenService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정에서 새로운 AppState 생성.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db_pool: None,
            tokens: TokenService::new(&config.auth),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// DB 풀 참조 반환. 미설정이면 에러.
    ///
    /// 핸들러에서 `let pool = state.require_db()?;` 형태로 사용합니다.
    pub fn require_db(&self) -> Result<&sqlx::PgPool, crate::error::ApiError> {
        self.db_pool
            .as_ref()
            .ok_or_else(crate::error::ApiError::database_unavailable)
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 토큰 처리 경로를 테스트할 수 있는 최소한의
/// 상태를 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state(jwt_secret: &str) -> AppState {
    use orienta_core::AuthConfig;

    let mut config = AppConfig::default();
    config.auth = AuthConfig {
        jwt_secret: jwt_secret.to_string(),
        ..AuthConfig::default()
    };

    AppState::new(&config)
}
