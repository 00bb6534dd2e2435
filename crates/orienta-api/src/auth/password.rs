//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 자격증명 검증. 해시는 솔트를 포함한 PHC 문자열로
//! 저장되며, 검증은 입력에 대한 순수 함수입니다 (부수 효과 없음).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 등록/변경 시 요구되는 최소 비밀번호 길이.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// 비밀번호 처리 에러.
///
/// [`PasswordError::Mismatch`]는 API 경계에서 "사용자 없음"과 구분되지
/// 않게 처리되어야 합니다. 두 경우 모두 동일한 unauthorized 응답으로
/// 표면화됩니다 (사용자 열거 방지).
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호가 일치하지 않습니다")]
    Mismatch,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용합니다. 솔트는 자동 생성되어 PHC 문자열에
/// 포함됩니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 해시와 입력된 비밀번호를 비교합니다. 일치하면 Ok(()),
/// 불일치하면 [`PasswordError::Mismatch`]를 반환합니다.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

/// 비밀번호 강도 검증.
///
/// 등록과 비밀번호 변경 경로에서 호출됩니다. 최소 8자 이상이어야
/// 합니다.
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err("비밀번호는 최소 8자 이상이어야 합니다");
    }

    Ok(())
}
