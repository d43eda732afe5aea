use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use remix_core::RemixError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<RemixError>() {
            Some(e) => match e {
                RemixError::TopicRequired
                | RemixError::TopicTooLong { .. }
                | RemixError::InvalidStyle(_) => StatusCode::BAD_REQUEST,
                RemixError::EmptyStore | RemixError::NoMatchingRecords { .. } => {
                    StatusCode::NOT_FOUND
                }
                RemixError::Store { .. } | RemixError::Completion(_) => StatusCode::BAD_GATEWAY,
                RemixError::MissingSecret(_)
                | RemixError::Io(_)
                | RemixError::Yaml(_)
                | RemixError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: RemixError) -> StatusCode {
        AppError(err.into()).into_response().status()
    }

    #[test]
    fn invalid_input_maps_to_400() {
        assert_eq!(status_of(RemixError::TopicRequired), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(RemixError::TopicTooLong { len: 600, max: 500 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RemixError::InvalidStyle("gothic".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn empty_selection_maps_to_404() {
        assert_eq!(status_of(RemixError::EmptyStore), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(RemixError::NoMatchingRecords { tier: "High".into() }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upstream_failure_maps_to_502() {
        let err = RemixError::Store {
            status: Some(401),
            message: "Authentication required".into(),
        };
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(RemixError::Completion("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn io_and_foreign_errors_map_to_500() {
        let io_err = std::io::Error::other("disk full");
        assert_eq!(
            status_of(RemixError::Io(io_err)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let response = AppError(anyhow::anyhow!("something unexpected")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json() {
        let response = AppError(RemixError::EmptyStore.into()).into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
