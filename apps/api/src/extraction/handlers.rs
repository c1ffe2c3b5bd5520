use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extractor::{
    extract_resume, preliminary_score, skills_by_category, ExtractedData,
};
use crate::extraction::keywords::KEYWORD_TABLE_VERSION;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub extracted: ExtractedData,
    pub preliminary_score: u32,
    pub skills_by_category: BTreeMap<&'static str, Vec<String>>,
    pub keyword_table_version: u32,
}

/// POST /api/v1/extract
pub async fn handle_extract(
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let extracted = extract_resume(&req.resume_text);
    tracing::info!(
        "Extracted {} skills, {} projects from resume",
        extracted.skills.len(),
        extracted.projects.len()
    );

    Ok(Json(ExtractResponse {
        preliminary_score: preliminary_score(&extracted),
        skills_by_category: skills_by_category(&extracted.skills),
        keyword_table_version: KEYWORD_TABLE_VERSION,
        extracted,
    }))
}
