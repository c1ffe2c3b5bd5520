use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::scoring::calculator::{calculate_total_score, compare_scores};
use crate::scoring::models::{PoapScore, ProjectScore, ScoreComparison, SkillScore, TotalScore};
use crate::scoring::store::ScoreStore;

#[derive(Debug, Serialize)]
pub struct ScoreOutcome {
    pub score: TotalScore,
    pub comparison: Option<ScoreComparison>,
    pub change_description: Option<String>,
    /// Id of the appended record; `None` when the append failed.
    pub record_id: Option<Uuid>,
    pub persisted: bool,
}

/// Calculate → compare with the wallet's previous record → append.
///
/// A failed read is treated as "no previous score"; a failed append is logged and
/// reported through `persisted: false` rather than discarding the calculation.
pub async fn calculate_and_record(
    store: &dyn ScoreStore,
    wallet_address: &str,
    skills: &[SkillScore],
    projects: &[ProjectScore],
    poaps: &[PoapScore],
) -> ScoreOutcome {
    let score = calculate_total_score(skills, projects, poaps);

    let previous = match store.latest(wallet_address).await {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Could not load previous score for {wallet_address}: {e}");
            None
        }
    };
    let comparison = previous.as_ref().map(|p| compare_scores(p, &score));

    let record_id = match store.save(wallet_address, &score).await {
        Ok(id) => Some(id),
        Err(e) => {
            error!("Error saving score for {wallet_address}: {e}");
            None
        }
    };

    ScoreOutcome {
        change_description: comparison.as_ref().map(ScoreComparison::change_description),
        comparison,
        persisted: record_id.is_some(),
        record_id,
        score,
    }
}
