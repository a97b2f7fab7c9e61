use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use completion_agent::CompletionError;
use devflow_core::error::DevflowError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Wraps `anyhow::Error` and maps
/// known error types to statuses; everything else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<DevflowError>() {
            match e {
                DevflowError::NotInitialized => StatusCode::BAD_REQUEST,
                DevflowError::ProjectNotFound(_)
                | DevflowError::SpecificationNotFound(_)
                | DevflowError::RequirementNotFound(_)
                | DevflowError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
                DevflowError::ProjectExists(_) => StatusCode::CONFLICT,
                DevflowError::InvalidSlug(_)
                | DevflowError::InvalidStage(_)
                | DevflowError::InvalidSection(_)
                | DevflowError::InvalidPriority(_)
                | DevflowError::InvalidDesignKind(_)
                | DevflowError::InvalidTestKind(_)
                | DevflowError::InvalidDocKind(_) => StatusCode::BAD_REQUEST,
                DevflowError::InvalidStageTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DevflowError::Io(_) | DevflowError::Yaml(_) | DevflowError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if self.0.downcast_ref::<CompletionError>().is_some() {
            // The upstream completion provider failed or misbehaved.
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

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
