//! Axum route handlers for the Scores API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::wallet::normalize_wallet_address;
use crate::scoring::models::{PoapScore, ProjectScore, SkillScore, TotalScore};
use crate::scoring::service::{calculate_and_record, ScoreOutcome};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub wallet_address: String,
    #[serde(default)]
    pub skills: Vec<SkillScore>,
    #[serde(default)]
    pub projects: Vec<ProjectScore>,
    #[serde(default)]
    pub poaps: Vec<PoapScore>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/scores
pub async fn handle_calculate_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreOutcome>, AppError> {
    let wallet = normalize_wallet_address(&req.wallet_address)?;
    let outcome = calculate_and_record(
        state.store.as_ref(),
        &wallet,
        &req.skills,
        &req.projects,
        &req.poaps,
    )
    .await;
    Ok(Json(outcome))
}

/// GET /api/v1/scores/:wallet_address/latest
pub async fn handle_latest_score(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<TotalScore>, AppError> {
    let wallet = normalize_wallet_address(&wallet_address)?;
    let score = state
        .store
        .latest(&wallet)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No score recorded for {wallet}")))?;
    Ok(Json(score))
}

/// GET /api/v1/scores/:wallet_address/history
pub async fn handle_score_history(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<TotalScore>>, AppError> {
    let wallet = normalize_wallet_address(&wallet_address)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    Ok(Json(state.store.history(&wallet, limit).await?))
}
