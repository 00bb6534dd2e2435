//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 발급/검증 로직.
//!
//! 서명 시크릿은 [`TokenService`] 생성 시 한 번 주입되며, 이후 모든
//! 발급/검증은 해당 인스턴스를 통해 이루어집니다 (전역 상태 없음).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use orienta_core::{AuthConfig, Role};

/// Access Token의 subject 태그.
pub const ACCESS_TOKEN_SUBJECT: &str = "access_token";
/// Refresh Token의 subject 태그.
pub const REFRESH_TOKEN_SUBJECT: &str = "refresh_token";

/// JWT 페이로드.
///
/// Access Token과 Refresh Token은 동일한 클레임 형태를 사용하며
/// `sub` 태그와 수명으로만 구분됩니다. Refresh Token에도 identity와
/// role이 바인딩됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// Subject - 토큰 용도 태그 ("access_token" | "refresh_token")
    pub sub: String,
}

impl Claims {
    fn new(email: impl Into<String>, role: Role, subject: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            sub: subject.to_string(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// JWT 처리 에러.
///
/// 검증 실패는 호출자가 분기해야 하는 서로 다른 신호입니다.
/// [`JwtError::Expired`]만 Refresh Flow로 복구 가능하며, 나머지는
/// 모두 종료 실패입니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    /// 토큰을 기대한 구조로 파싱할 수 없음 (subject 태그 불일치 포함)
    #[error("잘못된 토큰 형식")]
    Malformed,
    /// 서명 알고리즘 불일치 또는 키 문제로 검증 불가
    #[error("토큰을 검증할 수 없습니다")]
    Unverifiable,
    /// 서명이 계산값과 일치하지 않음
    #[error("유효하지 않은 토큰 서명")]
    InvalidSignature,
    /// 구조와 서명은 유효하나 만료됨 - 유일한 복구 가능 결과
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 서명/인코딩 실패 - 내부 에러로 전파 (fail closed)
    #[error("토큰 서명 실패: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_) => JwtError::Unverifiable,
            _ => JwtError::Malformed,
        }
    }
}

/// 토큰 발급/검증 서비스.
///
/// HMAC-SHA256 대칭 서명을 사용합니다. 인스턴스는 프로세스 시작 시
/// 설정에서 한 번 생성되어 AppState를 통해 공유됩니다. 내부 상태는
/// 불변이므로 동시 요청 간 간섭이 없습니다.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// 설정에서 토큰 서비스를 생성합니다.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        }
    }

    /// Access + Refresh 토큰 쌍 발급.
    ///
    /// 자격증명 검증 성공 또는 Refresh Flow 성공 이후에만 호출되어야
    /// 합니다. 서명 실패 시 발급을 중단하고 에러를 반환합니다 (부분
    /// 서명된 토큰은 절대 반환되지 않음).
    pub fn issue_pair(&self, email: &str, role: Role) -> Result<TokenPair, JwtError> {
        let access_claims = Claims::new(email, role, ACCESS_TOKEN_SUBJECT, self.access_ttl);
        let refresh_claims = Claims::new(email, role, REFRESH_TOKEN_SUBJECT, self.refresh_ttl);

        let access_token = self.sign(&access_claims)?;
        let refresh_token = self.sign(&refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
            token_type: "Bearer".to_string(),
        })
    }

    /// Access Token 검증 및 클레임 추출.
    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, ACCESS_TOKEN_SUBJECT)
    }

    /// Refresh Token 검증 및 클레임 추출.
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, REFRESH_TOKEN_SUBJECT)
    }

    /// Refresh Flow: Refresh Token을 소비하여 새 토큰 쌍을 발급합니다.
    ///
    /// 검증 실패(서명 불일치, 형식 오류, 만료) 시 아무것도 발급하지
    /// 않습니다. 성공 시 새 쌍과 함께 요청 컨텍스트에 부착할 access
    /// 클레임을 반환합니다.
    pub fn refresh(&self, refresh_token: &str) -> Result<(TokenPair, Claims), JwtError> {
        let refresh_claims = self.validate_refresh(refresh_token)?;

        let pair = self.issue_pair(&refresh_claims.email, refresh_claims.role)?;
        let access_claims = Claims::new(
            refresh_claims.email,
            refresh_claims.role,
            ACCESS_TOKEN_SUBJECT,
            self.access_ttl,
        );

        Ok((pair, access_claims))
    }

    /// 만료 시각이 과거인 access 토큰을 직접 서명합니다 (시계 조작 대용).
    #[cfg(test)]
    pub(crate) fn issue_expired_for_tests(&self, email: &str, role: Role) -> String {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            role,
            iat: (now - Duration::minutes(31)).timestamp(),
            exp: (now - Duration::minutes(16)).timestamp(),
            sub: ACCESS_TOKEN_SUBJECT.to_string(),
        };
        self.sign(&claims).unwrap()
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// 검증 순서: (1) 서명 확인, (2) 구조/클레임 디코딩, (3) 만료 확인.
    ///
    /// 만료 시각에는 leeway를 적용하지 않습니다. 인코딩된 exp를 지난
    /// 토큰은 어떤 경우에도 유효하지 않습니다.
    fn validate(&self, token: &str, expected_subject: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.sub = Some(expected_subject.to_string());
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
