//! 오리엔테이션 플랫폼 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 인증, 사용자/대학/프로그램/직업 관리, 헬스 체크 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use orienta_api::middleware::{api_key_middleware, ApiKeyState};
use orienta_api::routes::create_api_router;
use orienta_api::state::AppState;
use orienta_core::{init_logging, AppConfig, LogConfig};

/// 설정 로드.
///
/// `config/default.toml`이 없으면 기본값 + 환경 변수 오버라이드로
/// 동작합니다 (컨테이너 배포에서 흔한 형태).
fn load_config() -> (AppConfig, Option<String>) {
    match AppConfig::load_default() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e.to_string())),
    }
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://app.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        .max_age(Duration::from_secs(3600))
}

/// AppState 초기화.
///
/// DATABASE_URL이 설정된 경우 연결 풀을 생성하고 연결을 검증합니다.
/// DB 없이도 서버는 기동되며, DB가 필요한 엔드포인트만 실패합니다.
async fn create_app_state(config: &AppConfig) -> AppState {
    let mut state = AppState::new(config);

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        match PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    info!("Connected to PostgreSQL successfully");
                    state = state.with_db_pool(pool);
                } else {
                    error!("Failed to verify database connection");
                }
            }
            Err(e) => {
                error!("Failed to connect to database: {}", e);
            }
        }
    } else {
        warn!("DATABASE_URL not set, database features will be disabled");
    }

    state
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    let mut app = create_api_router(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer());

    // API 키 게이트 (API_KEY 환경변수 설정 시에만)
    if let Some(api_key_state) = ApiKeyState::from_env() {
        info!("API key gate enabled");
        app = app.layer(middleware::from_fn_with_state(
            api_key_state,
            api_key_middleware,
        ));
    }

    app
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let (mut config, config_load_error) = load_config();

    // tracing 초기화 (설정 파일의 logging 섹션 기준)
    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    if let Some(e) = config_load_error {
        warn!(error = %e, "Config file not loaded, using defaults with env overrides");
    }

    info!("Starting Orienta API server...");

    // JWT 시크릿: 설정 파일 → JWT_SECRET_KEY 환경변수 순으로 로드.
    // 시크릿 없이는 기동하지 않음 (fail closed)
    if config.auth.jwt_secret.is_empty() {
        if let Ok(secret) = std::env::var("JWT_SECRET_KEY") {
            config.auth.jwt_secret = secret;
        }
    }
    anyhow::ensure!(
        !config.auth.jwt_secret.is_empty(),
        "JWT 서명 시크릿이 설정되지 않았습니다. JWT_SECRET_KEY 환경변수 또는 auth.jwt_secret 설정을 확인하세요."
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "소켓 주소가 유효하지 않습니다: {}:{}",
                config.server.host, config.server.port
            )
        })?;

    // AppState 생성 (DB 연결 포함)
    let state = Arc::new(create_app_state(&config).await);

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        "Application state initialized"
    );

    let app = create_router(state);

    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{} 바인딩 실패", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("서버 실행 실패")?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
