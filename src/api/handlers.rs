use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieRecord, MovieSummary, PreferenceInput},
    services::{discovery, title_search},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub answers: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub movies: Vec<MovieSummary>,
}

/// Unwraps a JSON body, turning any rejection into malformed input
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::MalformedInput(rejection.body_text()))
}

/// Logs a failed request with the stage it reached, passing the error through
///
/// Server-side failures log at error level, client mistakes at warn.
fn log_failure<'a>(
    request_id: RequestId,
    stage: &'static str,
    context: &'a str,
) -> impl FnOnce(AppError) -> AppError + 'a {
    move |error| {
        if error.status_code().is_server_error() {
            tracing::error!(
                request_id = %request_id,
                stage,
                context = %context,
                kind = error.kind(),
                error = %error,
                "Request failed"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                stage,
                context = %context,
                kind = error.kind(),
                error = %error,
                "Request rejected"
            );
        }
        error
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Language-model backed recommendation from the full questionnaire
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AnswersRequest>, JsonRejection>,
) -> AppResult<Json<MovieRecord>> {
    state
        .config
        .require_recommendation_keys()
        .map_err(log_failure(request_id, "config", "get-movie"))?;

    let request = json_body(payload).map_err(log_failure(request_id, "validate", "get-movie"))?;
    let answer_count = format!("answers={}", request.answers.len());
    let input = PreferenceInput::from_answers(&request.answers)
        .map_err(log_failure(request_id, "validate", &answer_count))?;

    let summary = input.summary();
    tracing::info!(
        request_id = %request_id,
        input = %summary,
        "Processing recommendation request"
    );

    let record = state
        .recommendations
        .recommend(&input)
        .await
        .map_err(log_failure(request_id, "recommend", &summary))?;

    Ok(Json(record))
}

/// Mood-driven pick straight from the metadata service
pub async fn recommend_by_mood(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AnswersRequest>, JsonRejection>,
) -> AppResult<Json<MovieRecord>> {
    state
        .config
        .require_metadata_key()
        .map_err(log_failure(request_id, "config", "api/recommend"))?;

    let request =
        json_body(payload).map_err(log_failure(request_id, "validate", "api/recommend"))?;
    let mood = match request.answers.first() {
        Some(Value::String(mood)) => mood.clone(),
        _ => {
            return Err(log_failure(request_id, "validate", "api/recommend")(
                AppError::MalformedInput("answers must start with a mood string".to_string()),
            ))
        }
    };

    let context = format!("mood={}", mood);
    tracing::info!(request_id = %request_id, mood = %mood, "Processing discovery request");

    let mut rng = StdRng::from_entropy();
    let record = discovery::discover_by_mood(
        state.metadata.as_ref(),
        state.image_base_url(),
        &mood,
        &mut rng,
    )
    .await
    .map_err(log_failure(request_id, "discover", &context))?;

    Ok(Json(record))
}

/// Free-text movie search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    state
        .config
        .require_metadata_key()
        .map_err(log_failure(request_id, "config", "api/search"))?;

    let request = json_body(payload).map_err(log_failure(request_id, "validate", "api/search"))?;
    let query = format!("query={}", request.query);

    tracing::info!(request_id = %request_id, query = %request.query, "Processing search request");

    let movies =
        title_search::search_titles(state.metadata.as_ref(), state.image_base_url(), &request.query)
            .await
            .map_err(log_failure(request_id, "search", &query))?;

    Ok(Json(SearchResponse { movies }))
}
