//! Score store: append-only history of `TotalScore` records keyed by wallet address.
//!
//! Reading the previous record and appending the new one are separate calls, so two
//! concurrent calculations for the same wallet can both compare against the same
//! "previous" score. Both records are still appended.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::score::ScoreRecordRow;
use crate::scoring::models::{ScoreBreakdown, TotalScore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Appends a record and returns its id.
    async fn save(&self, wallet_address: &str, score: &TotalScore) -> Result<Uuid>;

    /// Most recently dated record for the wallet.
    async fn latest(&self, wallet_address: &str) -> Result<Option<TotalScore>>;

    /// Up to `limit` records, newest first.
    async fn history(&self, wallet_address: &str, limit: i64) -> Result<Vec<TotalScore>>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `apps/api/migrations`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Score store migrations applied");
        Ok(())
    }
}

fn to_score(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

impl TryFrom<ScoreRecordRow> for TotalScore {
    type Error = StoreError;

    fn try_from(row: ScoreRecordRow) -> Result<Self> {
        let breakdown: ScoreBreakdown = serde_json::from_value(row.breakdown)?;
        Ok(TotalScore {
            skills_score: to_score(row.skills_score),
            projects_score: to_score(row.projects_score),
            poaps_score: to_score(row.poaps_score),
            bonus_score: to_score(row.bonus_score),
            total_score: to_score(row.total_score),
            verification_date: row.verification_date,
            breakdown,
        })
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn save(&self, wallet_address: &str, score: &TotalScore) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let breakdown = serde_json::to_value(&score.breakdown)?;

        sqlx::query(
            r#"
            INSERT INTO score_records
                (id, wallet_address, skills_score, projects_score, poaps_score,
                 bonus_score, total_score, breakdown, verification_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(wallet_address)
        .bind(i64::from(score.skills_score))
        .bind(i64::from(score.projects_score))
        .bind(i64::from(score.poaps_score))
        .bind(i64::from(score.bonus_score))
        .bind(i64::from(score.total_score))
        .bind(breakdown)
        .bind(score.verification_date)
        .execute(&self.pool)
        .await?;

        info!(
            "Saved score {} ({}) for {wallet_address}",
            id, score.total_score
        );
        Ok(id)
    }

    async fn latest(&self, wallet_address: &str) -> Result<Option<TotalScore>> {
        let row: Option<ScoreRecordRow> = sqlx::query_as(
            r#"
            SELECT * FROM score_records
            WHERE wallet_address = $1
            ORDER BY verification_date DESC
            LIMIT 1
            "#,
        )
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TotalScore::try_from).transpose()
    }

    async fn history(&self, wallet_address: &str, limit: i64) -> Result<Vec<TotalScore>> {
        let rows: Vec<ScoreRecordRow> = sqlx::query_as(
            r#"
            SELECT * FROM score_records
            WHERE wallet_address = $1
            ORDER BY verification_date DESC
            LIMIT $2
            "#,
        )
        .bind(wallet_address)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TotalScore::try_from).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process store (no DATABASE_URL, tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryScoreStore {
    records: RwLock<HashMap<String, Vec<TotalScore>>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn save(&self, wallet_address: &str, score: &TotalScore) -> Result<Uuid> {
        self.records
            .write()
            .await
            .entry(wallet_address.to_string())
            .or_default()
            .push(score.clone());
        Ok(Uuid::new_v4())
    }

    async fn latest(&self, wallet_address: &str) -> Result<Option<TotalScore>> {
        Ok(self
            .records
            .read()
            .await
            .get(wallet_address)
            .and_then(|scores| scores.iter().max_by_key(|s| s.verification_date))
            .cloned())
    }

    async fn history(&self, wallet_address: &str, limit: i64) -> Result<Vec<TotalScore>> {
        let records = self.records.read().await;
        let mut scores = records.get(wallet_address).cloned().unwrap_or_default();
        scores.sort_by(|a, b| b.verification_date.cmp(&a.verification_date));
        scores.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::calculator::calculate_total_score;
    use chrono::{Duration, Utc};

    fn dated(total: u32, days_ago: i64) -> TotalScore {
        let mut s = calculate_total_score(&[], &[], &[]);
        s.total_score = total;
        s.verification_date = Utc::now() - Duration::days(days_ago);
        s
    }

    #[tokio::test]
    async fn test_latest_picks_most_recent_date_not_insert_order() {
        let store = MemoryScoreStore::new();
        store.save("0xa", &dated(300, 0)).await.unwrap();
        store.save("0xa", &dated(100, 5)).await.unwrap();
        store.save("0xb", &dated(999, 0)).await.unwrap();

        let latest = store.latest("0xa").await.unwrap().unwrap();
        assert_eq!(latest.total_score, 300);
    }

    #[tokio::test]
    async fn test_latest_none_for_unknown_wallet() {
        let store = MemoryScoreStore::new();
        assert!(store.latest("0xnone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_newest_first_and_limited() {
        let store = MemoryScoreStore::new();
        for (total, days_ago) in [(10, 3), (30, 1), (20, 2), (40, 0)] {
            store.save("0xa", &dated(total, days_ago)).await.unwrap();
        }
        let history = store.history("0xa", 3).await.unwrap();
        let totals: Vec<u32> = history.iter().map(|s| s.total_score).collect();
        assert_eq!(totals, vec![40, 30, 20]);
    }

    #[test]
    fn test_row_conversion_round_trips_breakdown() {
        let score = dated(42, 0);
        let row = ScoreRecordRow {
            id: Uuid::new_v4(),
            wallet_address: "0xa".to_string(),
            skills_score: 0,
            projects_score: 0,
            poaps_score: 0,
            bonus_score: 0,
            total_score: 42,
            breakdown: serde_json::to_value(&score.breakdown).unwrap(),
            verification_date: score.verification_date,
            created_at: Utc::now(),
        };
        let restored = TotalScore::try_from(row).unwrap();
        assert_eq!(restored, score);
    }

    #[test]
    fn test_row_with_corrupt_breakdown_is_an_error() {
        let row = ScoreRecordRow {
            id: Uuid::new_v4(),
            wallet_address: "0xa".to_string(),
            skills_score: -3,
            projects_score: 0,
            poaps_score: 0,
            bonus_score: 0,
            total_score: 0,
            breakdown: serde_json::json!({"unexpected": true}),
            verification_date: Utc::now(),
            created_at: Utc::now(),
        };
        assert!(matches!(
            TotalScore::try_from(row),
            Err(StoreError::Serialization(_))
        ));
        assert_eq!(to_score(-3), 0);
    }
}
