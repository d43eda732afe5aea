use remix_core::pipeline::Remixer;

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub remixer: Remixer,
    /// Pre-filled topic for the page's input.
    pub default_topic: String,
}

impl AppState {
    pub fn new(remixer: Remixer, default_topic: impl Into<String>) -> Self {
        Self {
            remixer,
            default_topic: default_topic.into(),
        }
    }
}
