//! 대학 모델.
//!
//! 대학 엔티티와 부속 문서(위치, 연락처, 행사, 평가)를 정의합니다.
//! 부속 문서는 저장소에서 JSONB 컬럼으로 보관됩니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 대학 위치 정보.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// 주소
    #[serde(default)]
    pub address: String,
    /// GPS 좌표 (예: "-18.8792,47.5079")
    #[serde(default)]
    pub coordinate_gps: String,
    /// 도(province)
    #[serde(default)]
    pub province: String,
    /// 지역(region)
    #[serde(default)]
    pub region: String,
    /// 도시
    #[serde(default)]
    pub city: String,
}

/// 대학 연락처.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// 전화번호
    #[serde(default)]
    pub phone_number: String,
    /// 이메일
    #[serde(default)]
    pub email: String,
    /// 웹사이트
    #[serde(default)]
    pub website: String,
}

/// 대학 행사.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// 행사 제목
    pub title: String,
    /// 행사 설명
    #[serde(default)]
    pub description: String,
    /// 행사 일시
    pub date: DateTime<Utc>,
    /// 행사 장소
    #[serde(default)]
    pub location: String,
    /// 무료 여부
    #[serde(default)]
    pub is_free: bool,
    /// 입장료 (무료가 아닌 경우)
    #[serde(default)]
    pub admission_price: Decimal,
}

/// 사용자 평가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// 평가한 사용자 ID
    pub user_id: Uuid,
    /// 평점 (1~5)
    pub rating: i32,
    /// 코멘트
    #[serde(default)]
    pub comment: String,
}

/// 대학 엔티티.
///
/// name은 정규화된 형태(소문자, 공백 제거, 악센트 제거)로 유일성이
/// 검사됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    /// 대학 ID
    pub id: Uuid,
    /// 대학 이름 (unique)
    pub name: String,
    /// 위치
    #[serde(default)]
    pub location: Location,
    /// 소개글
    #[serde(default)]
    pub presentation: String,
    /// 사립 여부
    #[serde(default)]
    pub is_private: bool,
    /// 등록금
    #[serde(default)]
    pub tuition: Decimal,
    /// 연락처
    #[serde(default)]
    pub contact: Contact,
    /// 대표 이미지 URL
    #[serde(default)]
    pub image_url: String,
    /// 안내 문서 URL
    #[serde(default)]
    pub document_url: String,
    /// 개설 프로그램 ID 목록
    #[serde(default)]
    pub program_ids: Vec<Uuid>,
    /// 인프라 (도서관, 기숙사 등)
    #[serde(default)]
    pub infrastructure: Vec<String>,
    /// 제휴 기관
    #[serde(default)]
    pub partnerships: Vec<String>,
    /// 졸업/학위 취득 성공률 (%)
    #[serde(default)]
    pub success_diplomas: Decimal,
    /// 행사 목록
    #[serde(default)]
    pub events: Vec<Event>,
    /// 소식
    #[serde(default)]
    pub news: Vec<String>,
    /// 사진 URL 목록
    #[serde(default)]
    pub photos: Vec<String>,
    /// 사용자 평가 목록
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl University {
    /// 평균 평점 계산. 평가가 없으면 None.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: i32 = self.ratings.iter().map(|r| r.rating).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }
}

/// 이름 정규화.
///
/// 이름 기반 유일성 검사와 조회에 사용됩니다: 앞뒤 공백 제거,
/// 소문자화, 프랑스어권 악센트 문자 치환.
pub fn normalize_name(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
