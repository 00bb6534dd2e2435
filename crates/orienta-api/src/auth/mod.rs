//! 인증/인가 모듈.
//!
//! - [`jwt`]: 토큰 발급/검증 ([`TokenService`])
//! - [`password`]: Argon2id 비밀번호 해싱
//! - [`middleware`]: 인증 미들웨어 및 [`AuthUser`]/[`AdminUser`] 추출기

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtError, TokenPair, TokenService};
pub use middleware::{
    authenticate, AdminUser, AuthError, AuthUser, NEW_ACCESS_TOKEN_HEADER,
    NEW_REFRESH_TOKEN_HEADER, REFRESH_TOKEN_HEADER,
};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};

pub use orienta_core::Role;
