use axum::extract::State;
use axum::Json;
use remix_core::prompt::Style;
use remix_core::selector::{self, DifficultyFilter};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StyleOption {
    id: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
pub struct Options {
    variant: &'static str,
    model: String,
    styles: Vec<StyleOption>,
    /// `All` first, then the tiers present in the table.
    difficulties: Vec<String>,
    show_difficulty: bool,
    default_topic: String,
    max_topic_chars: usize,
}

/// GET /api/options: everything the page needs to render its controls.
pub async fn get_options(State(app): State<AppState>) -> Result<Json<Options>, AppError> {
    let remixer = &app.remixer;
    let table = remixer.table().await?;

    let mut difficulties = vec![DifficultyFilter::All.label().to_string()];
    difficulties.extend(selector::tiers(&table));

    Ok(Json(Options {
        variant: remixer.variant().as_str(),
        model: remixer.model().to_string(),
        styles: Style::ALL
            .into_iter()
            .map(|s| StyleOption {
                id: s.as_str(),
                label: s.label(),
            })
            .collect(),
        difficulties,
        show_difficulty: remixer.variant().has_difficulty_filter(),
        default_topic: app.default_topic.clone(),
        max_topic_chars: remixer.max_topic_chars(),
    }))
}
