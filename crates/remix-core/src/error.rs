use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemixError {
    #[error("missing required secret: set the {0} environment variable")]
    MissingSecret(String),

    #[error("topic is required")]
    TopicRequired,

    #[error("topic is too long: {len} characters (max {max})")]
    TopicTooLong { len: usize, max: usize },

    #[error("invalid style '{0}'")]
    InvalidStyle(String),

    #[error("the action store has no records")]
    EmptyStore,

    #[error("no action records with difficulty '{tier}'")]
    NoMatchingRecords { tier: String },

    #[error("record store request failed{}: {message}", status_suffix(.status))]
    Store { status: Option<u16>, message: String },

    #[error("completion request failed: {0}")]
    Completion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<chat_completion::ChatError> for RemixError {
    fn from(err: chat_completion::ChatError) -> Self {
        RemixError::Completion(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, RemixError>;
