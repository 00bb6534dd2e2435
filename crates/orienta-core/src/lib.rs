//! # Orienta Core
//!
//! 진로/대학 오리엔테이션 플랫폼의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 계정 및 역할 정의
//! - 대학 및 학과 프로그램 모델
//! - 직업/진로 및 산업 분야 모델
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
