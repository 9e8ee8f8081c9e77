use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, ParsedTitleYear},
    services::providers::MetadataProvider,
};

/// Resolves a parsed title/year to a movie record
///
/// Searches with the year first. If that finds nothing and a year was given,
/// searches again by title alone. The provider's first result wins.
pub async fn lookup_movie(
    provider: &dyn MetadataProvider,
    image_base_url: &str,
    parsed: &ParsedTitleYear,
) -> AppResult<MovieRecord> {
    let mut results = provider
        .search_movies(&parsed.title, parsed.year.clone())
        .await?;

    if results.is_empty() && parsed.year.is_some() {
        tracing::info!(
            title = %parsed.title,
            year = ?parsed.year,
            "No match for title and year, retrying without year"
        );
        results = provider.search_movies(&parsed.title, None).await?;
    }

    let movie = results
        .into_iter()
        .next()
        .ok_or_else(|| AppError::MovieNotFound(parsed.title.clone()))?;

    Ok(movie.into_record(image_base_url, parsed.year.as_deref()))
}
