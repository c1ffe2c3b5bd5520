//! Derives per-item `SkillScore` / `ProjectScore` / `PoapScore` records from an
//! extraction and its verification result.

use crate::extraction::extractor::ExtractedData;
use crate::scoring::models::{PoapScore, ProjectScore, SkillScore, VerificationSource};
use crate::verification::github::find_matching_repo;
use crate::verification::models::VerificationResult;
use crate::verification::pipeline::ACTIVE_WALLET_THRESHOLD;

/// Broader than the scoring list: any skill mentioning these counts as on-chain for tagging.
const ON_CHAIN_SKILL_MARKERS: &[&str] = &[
    "blockchain",
    "web3",
    "ethereum",
    "solidity",
    "defi",
    "nft",
    "crypto",
    "smart contract",
];

pub fn tag_skills(extracted: &ExtractedData, result: &VerificationResult) -> Vec<SkillScore> {
    extracted
        .skills
        .iter()
        .map(|skill| SkillScore {
            skill: skill.clone(),
            is_verified: result.verified_skills.contains(skill),
            source: skill_source(skill, result),
        })
        .collect()
}

fn skill_source(skill: &str, result: &VerificationResult) -> VerificationSource {
    let lower = skill.to_lowercase();
    if result
        .github
        .languages_used
        .iter()
        .any(|l| l.to_lowercase() == lower)
    {
        VerificationSource::GitHub
    } else if is_on_chain_skill(&lower) && result.blockchain.transactions > ACTIVE_WALLET_THRESHOLD
    {
        VerificationSource::OnChain
    } else if result
        .poap
        .tech_events
        .iter()
        .any(|e| e.name.to_lowercase().contains(&lower))
    {
        VerificationSource::Poap
    } else {
        VerificationSource::Manual
    }
}

fn is_on_chain_skill(lower: &str) -> bool {
    ON_CHAIN_SKILL_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn tag_projects(extracted: &ExtractedData, result: &VerificationResult) -> Vec<ProjectScore> {
    let github = &result.github;
    extracted
        .projects
        .iter()
        .map(|project| {
            let repo = find_matching_repo(project, &github.repositories);
            let technologies = repo
                .map(|r| r.language.iter().chain(r.topics.iter()).cloned().collect())
                .unwrap_or_default();
            let github_url = match (repo, github.username.as_deref()) {
                (Some(r), Some(user)) => Some(format!("https://github.com/{user}/{}", r.name)),
                _ => None,
            };
            ProjectScore {
                name: project.clone(),
                is_verified: result.verified_projects.contains(project),
                github_url,
                technologies,
            }
        })
        .collect()
}

pub fn tag_poaps(result: &VerificationResult) -> Vec<PoapScore> {
    result
        .poap
        .poaps
        .iter()
        .map(|p| PoapScore {
            name: p.name.clone(),
            event_id: p.event_id.clone(),
            date: p.event_date,
            image_url: p.image_url.clone(),
        })
        .collect()
}
