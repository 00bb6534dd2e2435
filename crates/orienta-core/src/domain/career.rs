//! 직업/진로 모델.
//!
//! 직업(Job)과 산업 분야(Sector)를 정의합니다. 직업의 상세 설명은
//! 저장소에서 JSONB 문서로 보관됩니다.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 직무 역량.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySkills {
    /// 지식 (이론적 역량)
    #[serde(default)]
    pub knowledges: Vec<String>,
    /// 노하우 (실무 역량)
    #[serde(default)]
    pub know_how: Vec<String>,
}

/// 직업 소개.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAbout {
    /// 직업 설명
    #[serde(default)]
    pub description: String,
    /// 주요 업무
    #[serde(default)]
    pub missions: Vec<String>,
    /// 요구 역량
    #[serde(default)]
    pub skills: QualitySkills,
    /// 경력 발전 경로
    #[serde(default)]
    pub professional_evolution: String,
}

/// 근무 환경.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingEnvironment {
    /// 근무 환경 소개
    #[serde(default)]
    pub presentation: String,
    /// 근무 장소
    #[serde(default)]
    pub exercise_place: String,
}

/// 직업 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// 직업 ID
    pub id: Uuid,
    /// 직업 이름 (unique)
    pub name: String,
    /// 직업 소개
    #[serde(default)]
    pub about: JobAbout,
    /// 근무 환경
    #[serde(default)]
    pub working_environment: WorkingEnvironment,
    /// 필요한 교육 과정
    #[serde(default)]
    pub formation: String,
    /// 소속 산업 분야 ID
    #[serde(default)]
    pub sector_id: Option<Uuid>,
}

/// 산업 분야.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    /// 분야 ID
    pub id: Uuid,
    /// 분야 이름
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_wire_format() {
        let job = Job {
            id: Uuid::new_v4(),
            name: "Ingénieur logiciel".to_string(),
            about: JobAbout {
                description: "Conçoit des logiciels".to_string(),
                missions: vec!["développement".to_string()],
                skills: QualitySkills {
                    knowledges: vec!["algorithmique".to_string()],
                    know_how: vec!["Rust".to_string()],
                },
                professional_evolution: "chef de projet".to_string(),
            },
            working_environment: WorkingEnvironment::default(),
            formation: "Master informatique".to_string(),
            sector_id: None,
        };

        let json = serde_json::to_value(&job).unwrap();
        assert!(json.get("workingEnvironment").is_some());
        assert!(json["about"]["skills"].get("knowHow").is_some());

        let back: Job = serde_json::from_value(json).unwrap();
        assert_eq!(back.about.skills.know_how, vec!["Rust".to_string()]);
    }
}
