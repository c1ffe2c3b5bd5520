use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of `score_records`. Append-only; never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreRecordRow {
    pub id: Uuid,
    pub wallet_address: String,
    pub skills_score: i64,
    pub projects_score: i64,
    pub poaps_score: i64,
    pub bonus_score: i64,
    pub total_score: i64,
    pub breakdown: Value,
    pub verification_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
