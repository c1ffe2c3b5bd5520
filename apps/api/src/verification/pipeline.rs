//! Verification pipeline: fans out to the three verifiers concurrently and folds
//! their results into a single `VerificationResult`.
//!
//! Verifier failures never reach this level (each degrades to a zeroed result). Only a
//! verifier task that panics or is cancelled surfaces as `AppError::Verification`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedData;
use crate::verification::blockchain::{verify_blockchain, ChainDataSource, BLOCKCHAIN_SKILLS};
use crate::verification::github::{verify_github, verify_projects_with_repos, RepositorySource};
use crate::verification::models::{BlockchainVerification, VerificationResult};
use crate::verification::poap::{verify_poaps, PoapSource};

pub const FINAL_SCORE_CAP: u32 = 2000;
pub const CONSISTENCY_BONUS_CAP: u32 = 200;
const LANGUAGE_MATCH_BONUS: u32 = 30;
const ON_CHAIN_MATCH_BONUS: u32 = 100;
/// Transactions needed before on-chain activity corroborates a claimed skill.
pub const ACTIVE_WALLET_THRESHOLD: u64 = 10;

/// Skills whose presence, backed by on-chain activity, earns the flat consistency bonus.
const CONSISTENCY_CHAIN_SKILLS: &[&str] = &["blockchain", "web3", "ethereum", "solidity"];

#[derive(Clone)]
pub struct ProofVerifier {
    repos: Arc<dyn RepositorySource>,
    chain: Arc<dyn ChainDataSource>,
    poaps: Arc<dyn PoapSource>,
    timeout: Duration,
}

impl ProofVerifier {
    pub fn new(
        repos: Arc<dyn RepositorySource>,
        chain: Arc<dyn ChainDataSource>,
        poaps: Arc<dyn PoapSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            repos,
            chain,
            poaps,
            timeout,
        }
    }

    pub async fn verify(
        &self,
        extracted: &ExtractedData,
        wallet_address: &str,
        github_username: Option<&str>,
    ) -> Result<VerificationResult, AppError> {
        info!("Verifying proofs for {wallet_address}");
        let timeout = self.timeout;

        let github_task = {
            let repos = Arc::clone(&self.repos);
            let username = github_username.map(str::to_owned);
            let projects = extracted.projects.clone();
            tokio::spawn(async move {
                verify_github(repos.as_ref(), username.as_deref(), &projects, timeout).await
            })
        };
        let chain_task = {
            let chain = Arc::clone(&self.chain);
            let wallet = wallet_address.to_owned();
            let skills = extracted.skills.clone();
            tokio::spawn(async move {
                verify_blockchain(chain.as_ref(), &wallet, &skills, timeout).await
            })
        };
        let poap_task = {
            let poaps = Arc::clone(&self.poaps);
            let wallet = wallet_address.to_owned();
            tokio::spawn(async move { verify_poaps(poaps.as_ref(), &wallet, timeout).await })
        };

        let (github, blockchain, poap) = tokio::try_join!(github_task, chain_task, poap_task)
            .map_err(|e| AppError::Verification(format!("Verification failed: {e}")))?;

        let bonus = consistency_bonus(&extracted.skills, &github.languages_used, &blockchain);
        let final_score = final_score(
            extracted,
            github.score,
            blockchain.score,
            poap.score,
            bonus,
        );
        let verified_skills =
            verified_skills(&extracted.skills, &github.languages_used, &blockchain);
        let verified_projects = verify_projects_with_repos(&extracted.projects, &github.repositories);

        info!(
            "Verification complete for {wallet_address}: final score {final_score}, {} verified skills, {} verified projects",
            verified_skills.len(),
            verified_projects.len()
        );

        Ok(VerificationResult {
            github,
            blockchain,
            poap,
            final_score,
            verified_skills,
            verified_projects,
            verification_date: Utc::now(),
        })
    }
}

/// `5×skills + 10×projects + source scores + consistency bonus`, capped at 2000.
pub fn final_score(
    extracted: &ExtractedData,
    github_score: u32,
    blockchain_score: u32,
    poap_score: u32,
    consistency_bonus: u32,
) -> u32 {
    let base = 5 * extracted.skills.len() as u64 + 10 * extracted.projects.len() as u64;
    let total = base
        + u64::from(github_score)
        + u64::from(blockchain_score)
        + u64::from(poap_score)
        + u64::from(consistency_bonus);
    total.min(u64::from(FINAL_SCORE_CAP)) as u32
}

fn has_language(languages: &[String], skill: &str) -> bool {
    let skill = skill.to_lowercase();
    languages.iter().any(|l| *l == skill)
}

fn wallet_is_active(chain: &BlockchainVerification) -> bool {
    chain.transactions > ACTIVE_WALLET_THRESHOLD
}

/// +30 per skill matching a GitHub language, +100 once when chain skills are claimed and
/// the wallet shows activity. Capped at 200.
pub fn consistency_bonus(
    skills: &[String],
    github_languages: &[String],
    chain: &BlockchainVerification,
) -> u32 {
    let language_matches = skills
        .iter()
        .filter(|s| has_language(github_languages, s))
        .count() as u64;
    let mut bonus = u64::from(LANGUAGE_MATCH_BONUS) * language_matches;

    let claims_chain_skills = skills
        .iter()
        .any(|s| CONSISTENCY_CHAIN_SKILLS.contains(&s.to_lowercase().as_str()));
    if claims_chain_skills && (wallet_is_active(chain) || !chain.defi_protocols.is_empty()) {
        bonus += u64::from(ON_CHAIN_MATCH_BONUS);
    }

    bonus.min(u64::from(CONSISTENCY_BONUS_CAP)) as u32
}

/// Skills matching a GitHub language, then (for active wallets) blockchain skills,
/// in first-seen order without duplicates.
pub fn verified_skills(
    skills: &[String],
    github_languages: &[String],
    chain: &BlockchainVerification,
) -> Vec<String> {
    let mut verified: Vec<String> = Vec::new();
    for skill in skills {
        if has_language(github_languages, skill) && !verified.contains(skill) {
            verified.push(skill.clone());
        }
    }
    if wallet_is_active(chain) {
        for skill in skills {
            let lower = skill.to_lowercase();
            if BLOCKCHAIN_SKILLS.contains(&lower.as_str()) && !verified.contains(skill) {
                verified.push(skill.clone());
            }
        }
    }
    verified
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::verification::blockchain::tests::FailingChain;
    use crate::verification::blockchain::FixtureChainData;
    use crate::verification::github::tests::{repo, FailingRepos, StaticRepos};
    use crate::verification::poap::FixturePoapSource;
    use std::sync::atomic::AtomicUsize;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn chain(transactions: u64, defi: &[&str]) -> BlockchainVerification {
        BlockchainVerification {
            transactions,
            defi_protocols: strings(defi),
            ..Default::default()
        }
    }

    pub(crate) fn fixture_verifier() -> ProofVerifier {
        ProofVerifier::new(
            Arc::new(StaticRepos {
                repos: vec![
                    repo("defi-protocol-app", Some("Lending pool"), Some("Solidity")),
                    repo("ios-wallet", None, Some("Swift")),
                ],
                calls: AtomicUsize::new(0),
            }),
            Arc::new(FixtureChainData::default()),
            Arc::new(FixturePoapSource),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_single_language_match_adds_30() {
        let bonus = consistency_bonus(
            &strings(&["Swift", "Python"]),
            &strings(&["swift"]),
            &BlockchainVerification::default(),
        );
        assert_eq!(bonus, 30);
    }

    #[test]
    fn test_chain_bonus_requires_activity() {
        let skills = strings(&["Ethereum"]);
        assert_eq!(consistency_bonus(&skills, &[], &chain(5, &[])), 0);
        assert_eq!(consistency_bonus(&skills, &[], &chain(11, &[])), 100);
        assert_eq!(consistency_bonus(&skills, &[], &chain(0, &["Uniswap"])), 100);
    }

    #[test]
    fn test_consistency_bonus_capped_at_200() {
        let skills = strings(&["Swift", "Rust", "Go", "Kotlin", "Solidity"]);
        let langs = strings(&["swift", "rust", "go", "kotlin", "solidity"]);
        assert_eq!(consistency_bonus(&skills, &langs, &chain(500, &["Aave"])), 200);
    }

    #[test]
    fn test_final_score_capped_at_2000() {
        let extracted = ExtractedData {
            skills: strings(&["A"; 80]),
            projects: strings(&["P"; 10]),
            ..Default::default()
        };
        assert_eq!(final_score(&extracted, 500, 600, 300, 200), 2000);
        assert_eq!(final_score(&ExtractedData::default(), 10, 20, 30, 0), 60);
    }

    #[test]
    fn test_verified_skills_order_and_dedup() {
        let skills = strings(&["Solidity", "Swift", "Web3", "Figma"]);
        let langs = strings(&["solidity", "swift"]);
        assert_eq!(
            verified_skills(&skills, &langs, &chain(50, &[])),
            strings(&["Solidity", "Swift", "Web3"])
        );
        assert_eq!(
            verified_skills(&skills, &langs, &chain(10, &[])),
            strings(&["Solidity", "Swift"])
        );
    }

    #[tokio::test]
    async fn test_pipeline_with_fixtures() {
        let extracted = ExtractedData {
            skills: strings(&["Solidity", "Swift", "Web3"]),
            projects: strings(&["DeFi Protocol", "Ios Wallet"]),
            ..Default::default()
        };
        let result = fixture_verifier()
            .verify(&extracted, "0xabc", Some("octocat"))
            .await
            .unwrap();

        // 2 repos ×10 + 2 languages ×15 + 2 projects ×25
        assert_eq!(result.github.score, 100);
        // 150 + 60 + 60 + 80 + 2 chain skills ×50
        assert_eq!(result.blockchain.score, 450);
        assert_eq!(result.poap.score, 120);
        assert_eq!(result.verified_skills, strings(&["Solidity", "Swift", "Web3"]));
        assert_eq!(result.verified_projects, strings(&["DeFi Protocol", "Ios Wallet"]));
        // base 15 + 20, sources 670, bonus 60 + 100
        assert_eq!(result.final_score, 865);
    }

    #[tokio::test]
    async fn test_failing_sources_degrade_to_zero() {
        let verifier = ProofVerifier::new(
            Arc::new(FailingRepos),
            Arc::new(FailingChain),
            Arc::new(FixturePoapSource),
            Duration::from_secs(1),
        );
        let extracted = ExtractedData {
            skills: strings(&["Swift"]),
            ..Default::default()
        };
        let result = verifier
            .verify(&extracted, "0xabc", Some("octocat"))
            .await
            .unwrap();
        assert_eq!(result.github.score, 0);
        assert_eq!(result.blockchain.score, 0);
        assert_eq!(result.poap.score, 120);
        assert!(result.verified_skills.is_empty());
        assert_eq!(result.final_score, 5 + 120);
    }
}
