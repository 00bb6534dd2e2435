//! 사용자 계정 모델.
//!
//! 사용자 자격증명 레코드와 역할 정의를 제공합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 일반 사용자 - 조회 및 본인 계정 관리
    #[default]
    Normal,
    /// 관리자 - 콘텐츠 생성/수정/삭제 및 사용자 관리
    Admin,
}

impl Role {
    /// 관리자 역할인지 확인.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Role::Normal),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Normal => "normal",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// 사용자 계정 레코드.
///
/// email과 username은 전역적으로 유일합니다.
/// 비밀번호 해시는 직렬화 시 절대 노출되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 사용자 ID
    pub id: Uuid,
    /// 사용자 이름 (unique)
    pub username: String,
    /// 이메일 (unique)
    pub email: String,
    /// Argon2id 비밀번호 해시 (PHC 형식)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// 역할
    #[serde(default)]
    pub role: Role,
    /// 즐겨찾기한 대학 ID 목록
    #[serde(default)]
    pub favorites: Vec<Uuid>,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
    /// 수정 시간
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("NORMAL"), Some(Role::Normal));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Normal).unwrap(), "\"normal\"");

        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(parsed.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ismael".to_string(),
            email: "ismael@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Normal,
            favorites: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
