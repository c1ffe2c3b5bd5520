//! Score aggregator: turns tagged skill/project/POAP records into a `TotalScore`.
//!
//! This is a separate formula from the pipeline's `final_score` (see DESIGN.md); the two
//! are intentionally kept apart until one is confirmed as authoritative.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::scoring::models::{
    PoapScore, ProjectScore, ScoreBreakdown, ScoreComparison, SkillScore, TotalScore,
};

const SKILL_POINTS: u32 = 10;
const PROJECT_POINTS: u32 = 15;
const POAP_POINTS: u32 = 5;

pub const CONSISTENCY_BONUS_CAP: u32 = 50;
pub const DIVERSITY_BONUS_CAP: u32 = 30;
pub const TOTAL_SCORE_CAP: u32 = 2000;

/// Multiplier thresholds on verified skills + projects, in tenths.
const MULTIPLIER_TIERS: &[(usize, u64)] = &[(10, 12), (5, 11)];

pub fn calculate_total_score(
    skills: &[SkillScore],
    projects: &[ProjectScore],
    poaps: &[PoapScore],
) -> TotalScore {
    let verified_skills: Vec<SkillScore> = skills.iter().filter(|s| s.is_verified).cloned().collect();
    let verified_projects: Vec<ProjectScore> =
        projects.iter().filter(|p| p.is_verified).cloned().collect();
    let verified_poaps = poaps.to_vec();

    let skills_score = SKILL_POINTS * verified_skills.len() as u32;
    let projects_score = PROJECT_POINTS * verified_projects.len() as u32;
    let poaps_score = POAP_POINTS * verified_poaps.len() as u32;

    let consistency_bonus = consistency_bonus(
        verified_skills.len() + verified_projects.len() + verified_poaps.len(),
    );
    let diversity_bonus = diversity_bonus(&verified_skills);
    let bonus_score = consistency_bonus + diversity_bonus;

    let tenths = multiplier_tenths(verified_skills.len() + verified_projects.len());
    let pre_multiplier = u64::from(skills_score + projects_score + poaps_score + bonus_score);
    let total_score = (pre_multiplier * tenths / 10).min(u64::from(TOTAL_SCORE_CAP)) as u32;

    TotalScore {
        skills_score,
        projects_score,
        poaps_score,
        bonus_score,
        total_score,
        verification_date: Utc::now(),
        breakdown: ScoreBreakdown {
            verified_skills,
            verified_projects,
            verified_poaps,
            consistency_bonus,
            diversity_bonus,
            multiplier: tenths as f64 / 10.0,
        },
    }
}

/// Two points per verified item, capped at 50.
pub fn consistency_bonus(verified_items: usize) -> u32 {
    (verified_items as u64 * 2).min(u64::from(CONSISTENCY_BONUS_CAP)) as u32
}

/// Five points per distinct verification source among verified skills, capped at 30.
pub fn diversity_bonus(verified_skills: &[SkillScore]) -> u32 {
    let sources: BTreeSet<_> = verified_skills.iter().map(|s| s.source).collect();
    (sources.len() as u32 * 5).min(DIVERSITY_BONUS_CAP)
}

fn multiplier_tenths(verified_items: usize) -> u64 {
    MULTIPLIER_TIERS
        .iter()
        .find(|(threshold, _)| verified_items >= *threshold)
        .map(|(_, tenths)| *tenths)
        .unwrap_or(10)
}

pub fn compare_scores(previous: &TotalScore, current: &TotalScore) -> ScoreComparison {
    let improvement = i64::from(current.total_score) - i64::from(previous.total_score);
    let improvement_percentage = if previous.total_score > 0 {
        improvement as f64 / f64::from(previous.total_score) * 100.0
    } else {
        0.0
    };
    ScoreComparison {
        previous_score: previous.total_score,
        current_score: current.total_score,
        improvement,
        improvement_percentage,
        is_improvement: improvement > 0,
    }
}
