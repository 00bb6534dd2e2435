//! 학과 프로그램 모델.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 학과 프로그램.
///
/// 대학이 개설하는 교육 과정 단위. 대학과는 `University::program_ids`로
/// 연결됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// 프로그램 ID
    pub id: Uuid,
    /// 프로그램 이름
    pub name: String,
    /// 학위 수준 (예: "Licence", "Master")
    #[serde(default)]
    pub level: String,
    /// 수업 기간 (개월)
    #[serde(default)]
    pub duration_months: i32,
    /// 지원 요건
    #[serde(default)]
    pub requirements: Vec<String>,
    /// 진로 전망
    #[serde(default)]
    pub career_prospects: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_roundtrip() {
        let program = Program {
            id: Uuid::new_v4(),
            name: "Informatique".to_string(),
            level: "Licence".to_string(),
            duration_months: 36,
            requirements: vec!["Baccalauréat série C".to_string()],
            career_prospects: vec!["Développeur".to_string()],
        };

        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("durationMonths"));

        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, program.name);
        assert_eq!(back.duration_months, 36);
    }
}
