use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a skill's corroboration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerificationSource {
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "onChain")]
    OnChain,
    #[serde(rename = "poap")]
    Poap,
    #[serde(rename = "manual")]
    Manual,
}

impl VerificationSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            VerificationSource::GitHub => "GitHub",
            VerificationSource::OnChain => "Blockchain",
            VerificationSource::Poap => "POAP",
            VerificationSource::Manual => "Manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    pub is_verified: bool,
    pub source: VerificationSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectScore {
    pub name: String,
    pub is_verified: bool,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoapScore {
    pub name: String,
    pub event_id: String,
    pub date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

/// Which items counted toward a `TotalScore`, plus the bonus components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub verified_skills: Vec<SkillScore>,
    pub verified_projects: Vec<ProjectScore>,
    pub verified_poaps: Vec<PoapScore>,
    pub consistency_bonus: u32,
    pub diversity_bonus: u32,
    pub multiplier: f64,
}

/// Persisted score record. `total_score` is always derived from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalScore {
    pub skills_score: u32,
    pub projects_score: u32,
    pub poaps_score: u32,
    pub bonus_score: u32,
    pub total_score: u32,
    pub verification_date: DateTime<Utc>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub previous_score: u32,
    pub current_score: u32,
    pub improvement: i64,
    pub improvement_percentage: f64,
    pub is_improvement: bool,
}

impl ScoreComparison {
    pub fn change_description(&self) -> String {
        let sign = if self.improvement >= 0 { "+" } else { "" };
        format!(
            "{sign}{} points ({:.1}%)",
            self.improvement, self.improvement_percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_wire_names() {
        assert_eq!(
            serde_json::to_string(&VerificationSource::OnChain).unwrap(),
            "\"onChain\""
        );
        let parsed: VerificationSource = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(parsed, VerificationSource::GitHub);
        assert_eq!(parsed.display_name(), "GitHub");
    }

    #[test]
    fn test_change_description_signs() {
        let mut c = ScoreComparison {
            previous_score: 100,
            current_score: 150,
            improvement: 50,
            improvement_percentage: 50.0,
            is_improvement: true,
        };
        assert_eq!(c.change_description(), "+50 points (50.0%)");
        c.improvement = -25;
        c.improvement_percentage = -25.0;
        assert_eq!(c.change_description(), "-25 points (-25.0%)");
    }
}
