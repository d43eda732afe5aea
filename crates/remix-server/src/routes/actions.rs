use axum::extract::{Query, State};
use axum::Json;
use remix_core::record::ActionRecord;
use remix_core::selector::{self, DifficultyFilter};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActionsQuery {
    #[serde(default)]
    difficulty: Option<String>,
}

#[derive(Serialize)]
pub struct ActionList {
    difficulty: DifficultyFilter,
    total: usize,
    count: usize,
    records: Vec<ActionRecord>,
}

/// GET /api/actions?difficulty=: cached rows, optionally filtered by tier.
pub async fn list_actions(
    State(app): State<AppState>,
    Query(query): Query<ActionsQuery>,
) -> Result<Json<ActionList>, AppError> {
    let table = app.remixer.table().await?;
    let filter = query
        .difficulty
        .as_deref()
        .map(DifficultyFilter::parse)
        .unwrap_or_default();

    let records: Vec<ActionRecord> = selector::filter_records(&table, &filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ActionList {
        difficulty: filter,
        total: table.len(),
        count: records.len(),
        records,
    }))
}

/// POST /api/actions/refresh: drop the cached table and fetch it again.
pub async fn refresh_actions(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let table = app.remixer.refresh().await?;
    tracing::info!(records = table.len(), "action table refreshed");
    Ok(Json(serde_json::json!({
        "status": "ok",
        "count": table.len(),
        "tiers": selector::tiers(&table),
    })))
}
