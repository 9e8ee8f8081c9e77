use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Variants are `Clone` so a single failure can be handed to every request
/// waiting on the same cache key.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Completion provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Completion provider returned no usable reply")]
    EmptyCompletion,

    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("No movies found for mood '{0}'")]
    NoMoviesFound(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind, included in error bodies and log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MalformedInput(_) => "malformed_input",
            AppError::Configuration(_) => "configuration_error",
            AppError::ProviderUnavailable(_) => "provider_unavailable",
            AppError::EmptyCompletion => "empty_completion",
            AppError::MovieNotFound(_) => "movie_not_found",
            AppError::NoMoviesFound(_) => "no_movies_found",
            AppError::ExternalApi(_) => "external_api",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::MovieNotFound(_) | AppError::NoMoviesFound(_) => StatusCode::NOT_FOUND,
            AppError::ProviderUnavailable(_)
            | AppError::EmptyCompletion
            | AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::MalformedInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MovieNotFound("Heat".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert!(AppError::EmptyCompletion.status_code().is_server_error());
        assert!(AppError::ProviderUnavailable("down".into())
            .status_code()
            .is_server_error());
    }

    #[test]
    fn test_movie_not_found_names_title() {
        let err = AppError::MovieNotFound("Groundhog Day".to_string());
        assert_eq!(err.to_string(), "Movie not found: Groundhog Day");
        assert_eq!(err.kind(), "movie_not_found");
    }
}
