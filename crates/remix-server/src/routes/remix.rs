use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use remix_core::pipeline::RemixRequest;
use remix_core::prompt::Style;
use remix_core::script::ScriptOutcome;
use remix_core::selector::DifficultyFilter;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RemixBody {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    /// Fixes the draw, for reproducible results.
    #[serde(default)]
    seed: Option<u64>,
}

impl RemixBody {
    fn into_request(self) -> Result<RemixRequest, AppError> {
        let style = match self.style.as_deref().map(str::trim) {
            None | Some("") => Style::default(),
            Some(s) => s.parse::<Style>()?,
        };
        let difficulty = self
            .difficulty
            .as_deref()
            .map(DifficultyFilter::parse)
            .unwrap_or_default();
        Ok(RemixRequest::new(self.topic)
            .with_style(style)
            .with_difficulty(difficulty))
    }
}

/// POST /api/remix: draw a record and generate a script for it.
///
/// A completion failure answers 502 with the drawn record and
/// `retryable: true`, so the page can show the error next to the card.
pub async fn create_remix(
    State(app): State<AppState>,
    Json(body): Json<RemixBody>,
) -> Result<Response, AppError> {
    let mut rng = match body.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let request = body.into_request()?;

    let remix = app.remixer.remix(&request, &mut rng).await?;

    let response = match &remix.script {
        ScriptOutcome::Written { text } => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "id": remix.id,
                "created_at": remix.created_at,
                "style": request.style,
                "record": remix.record,
                "script": text,
            })),
        ),
        ScriptOutcome::Failed { message } => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "status": "error",
                "id": remix.id,
                "created_at": remix.created_at,
                "style": request.style,
                "record": remix.record,
                "error": message,
                "retryable": true,
            })),
        ),
    };
    Ok(response.into_response())
}
