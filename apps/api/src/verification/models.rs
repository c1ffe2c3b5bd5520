use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub last_updated: DateTime<Utc>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubVerification {
    pub username: Option<String>,
    pub repositories: Vec<GitHubRepo>,
    /// Lower-cased, deduplicated, sorted.
    pub languages_used: Vec<String>,
    pub verified_projects: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub balance: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftInfo {
    pub name: String,
    pub collection: String,
    pub token_id: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainVerification {
    pub transactions: u64,
    pub tokens_held: Vec<TokenInfo>,
    pub nfts_owned: Vec<NftInfo>,
    pub defi_protocols: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoapBadge {
    pub event_id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoapVerification {
    pub poaps: Vec<PoapBadge>,
    pub tech_events: Vec<PoapBadge>,
    pub score: u32,
}

/// Output of one verification run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub github: GitHubVerification,
    pub blockchain: BlockchainVerification,
    pub poap: PoapVerification,
    pub final_score: u32,
    pub verified_skills: Vec<String>,
    pub verified_projects: Vec<String>,
    pub verification_date: DateTime<Utc>,
}
