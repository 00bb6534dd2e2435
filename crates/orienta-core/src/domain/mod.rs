//! 도메인 모델.
//!
//! 플랫폼의 핵심 엔티티를 정의합니다:
//! - [`User`]: 사용자 계정 및 역할
//! - [`University`]: 대학 및 부속 문서 (위치, 연락처, 행사, 평가)
//! - [`Program`]: 학과 프로그램
//! - [`Job`] / [`Sector`]: 직업 및 산업 분야

pub mod career;
pub mod program;
pub mod university;
pub mod user;

pub use career::{Job, JobAbout, QualitySkills, Sector, WorkingEnvironment};
pub use program::Program;
pub use university::{normalize_name, Contact, Event, Location, Rating, University};
pub use user::{Role, User};
