//! 데이터베이스 저장소 계층.
//!
//! 각 저장소는 static async 메서드를 가진 단위 구조체로, `&PgPool`을
//! 받아 동작합니다. 핸들러에서 직접 호출됩니다.

pub mod careers;
pub mod programs;
pub mod universities;
pub mod users;

pub use careers::{CareerRepository, UpdateJob};
pub use programs::{ProgramRepository, UpdateProgram};
pub use universities::{UniversityFilter, UniversityRepository, UpdateUniversity};
pub use users::{NewUser, UpdateUser, UserRepository};

use orienta_core::OrientaError;

/// unique 제약 위반(23505)을 [`OrientaError::Duplicate`]로 변환.
///
/// 나머지 에러는 그대로 전파됩니다. 라우트의 사전 중복 검사를
/// 우회한 동시 삽입에 대한 백스톱입니다.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> OrientaError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return OrientaError::Duplicate(message.to_string());
        }
    }
    err.into()
}
