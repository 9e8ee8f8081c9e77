use crate::{
    error::{AppError, AppResult},
    models::MovieSummary,
    services::providers::MetadataProvider,
};

/// Number of results returned by the search endpoint
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Service function for title search
///
/// Passes the query straight to the metadata provider and reshapes the
/// first few results in the provider's order.
pub async fn search_titles(
    provider: &dyn MetadataProvider,
    image_base_url: &str,
    query: &str,
) -> AppResult<Vec<MovieSummary>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::MalformedInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let results = provider.search_movies(query, None).await?;

    Ok(results
        .into_iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(|movie| movie.into_summary(image_base_url))
        .collect())
}
