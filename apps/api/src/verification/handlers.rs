//! Axum route handlers for the Verification API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedData;
use crate::models::wallet::normalize_wallet_address;
use crate::scoring::models::{PoapScore, ProjectScore, SkillScore};
use crate::scoring::tagging::{tag_poaps, tag_projects, tag_skills};
use crate::state::AppState;
use crate::verification::github::is_valid_github_username;
use crate::verification::models::VerificationResult;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub wallet_address: String,
    pub github_username: Option<String>,
    pub extracted: ExtractedData,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub result: VerificationResult,
    pub skills: Vec<SkillScore>,
    pub projects: Vec<ProjectScore>,
    pub poaps: Vec<PoapScore>,
}

/// POST /api/v1/verify
///
/// Runs the three verifiers and returns the pipeline result plus the tagged per-item
/// records a client submits to `/api/v1/scores`.
pub async fn handle_verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let wallet = normalize_wallet_address(&req.wallet_address)?;
    let username = req
        .github_username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    if let Some(username) = username {
        if !is_valid_github_username(username) {
            return Err(AppError::Validation(format!(
                "github_username '{username}' is not a valid GitHub username"
            )));
        }
    }

    let result = state.verifier.verify(&req.extracted, &wallet, username).await?;

    Ok(Json(VerifyResponse {
        skills: tag_skills(&req.extracted, &result),
        projects: tag_projects(&req.extracted, &result),
        poaps: tag_poaps(&result),
        result,
    }))
}
