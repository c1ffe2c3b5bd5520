//! POAP verifier: attendance badges, with extra credit for technical events.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::provider_client::{ProviderClient, ProviderError};
use crate::verification::bounded;
use crate::verification::models::{PoapBadge, PoapVerification};

pub const POAP_SCORE_CAP: u32 = 300;

pub const TECH_EVENT_KEYWORDS: &[&str] = &[
    "eth", "blockchain", "developer", "hackathon", "web3", "defi", "nft", "crypto",
];

const POAP_API_BASE: &str = "https://api.poap.tech";

#[async_trait]
pub trait PoapSource: Send + Sync {
    async fn badges(&self, address: &str) -> Result<Vec<PoapBadge>, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// POAP API client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScanEntry {
    event: ScanEvent,
}

#[derive(Debug, Deserialize)]
struct ScanEvent {
    id: u64,
    name: String,
    #[serde(default)]
    description: String,
    image_url: Option<String>,
    start_date: Option<String>,
}

impl From<ScanEntry> for PoapBadge {
    fn from(entry: ScanEntry) -> Self {
        let e = entry.event;
        PoapBadge {
            event_id: e.id.to_string(),
            name: e.name,
            description: e.description,
            image_url: e.image_url,
            event_date: e.start_date.as_deref().and_then(parse_event_date),
        }
    }
}

/// POAP dates come as `15-Jun-2024`; ISO dates are accepted too.
fn parse_event_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d-%b-%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

pub struct PoapClient {
    http: ProviderClient,
    api_key: String,
}

impl PoapClient {
    pub fn new(http: ProviderClient, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl PoapSource for PoapClient {
    async fn badges(&self, address: &str) -> Result<Vec<PoapBadge>, ProviderError> {
        let url = format!("{POAP_API_BASE}/actions/scan/{address}");
        let entries: Vec<ScanEntry> = self
            .http
            .get_json(&url, &[("x-api-key", self.api_key.as_str())])
            .await?;
        Ok(entries.into_iter().map(PoapBadge::from).collect())
    }
}

/// Canned badges used when no POAP API key is configured.
pub struct FixturePoapSource;

#[async_trait]
impl PoapSource for FixturePoapSource {
    async fn badges(&self, _address: &str) -> Result<Vec<PoapBadge>, ProviderError> {
        Ok(vec![
            PoapBadge {
                event_id: "1".to_string(),
                name: "ETHGlobal Hackathon 2024".to_string(),
                description: "Participated in ETHGlobal hackathon".to_string(),
                image_url: None,
                event_date: NaiveDate::from_ymd_opt(2024, 5, 3),
            },
            PoapBadge {
                event_id: "2".to_string(),
                name: "Polygon Developer Conference".to_string(),
                description: "Attended Polygon developer conference".to_string(),
                image_url: None,
                event_date: NaiveDate::from_ymd_opt(2024, 9, 12),
            },
        ])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Verification
// ────────────────────────────────────────────────────────────────────────────

pub async fn verify_poaps(
    source: &dyn PoapSource,
    wallet_address: &str,
    timeout: Duration,
) -> PoapVerification {
    let Some(poaps) = bounded(timeout, "POAP", source.badges(wallet_address)).await else {
        return PoapVerification::default();
    };

    let tech_events = filter_tech_events(&poaps);
    let score = poap_score(poaps.len(), tech_events.len());
    info!(
        "POAP verification for {wallet_address}: {} badges, {} tech events, score {score}",
        poaps.len(),
        tech_events.len()
    );

    PoapVerification {
        poaps,
        tech_events,
        score,
    }
}

pub fn is_tech_event(badge: &PoapBadge) -> bool {
    let name = badge.name.to_lowercase();
    TECH_EVENT_KEYWORDS.iter().any(|kw| name.contains(kw))
}

pub fn filter_tech_events(poaps: &[PoapBadge]) -> Vec<PoapBadge> {
    poaps.iter().filter(|p| is_tech_event(p)).cloned().collect()
}

/// `20×badges + 40×tech events`, capped at 300.
pub fn poap_score(poap_count: usize, tech_event_count: usize) -> u32 {
    let raw = 20 * poap_count as u64 + 40 * tech_event_count as u64;
    raw.min(u64::from(POAP_SCORE_CAP)) as u32
}
