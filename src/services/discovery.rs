use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, TmdbGenre},
    services::providers::MetadataProvider,
};

/// Genre used for any mood not in the table
pub const DEFAULT_GENRE: &str = "action";

/// Genre names associated with each supported mood
pub fn genres_for_mood(mood: &str) -> &'static [&'static str] {
    match mood.trim().to_lowercase().as_str() {
        "happy" => &["comedy", "family", "adventure"],
        "sad" => &["drama", "romance"],
        "excited" => &["action", "adventure", "science fiction"],
        "relaxed" => &["animation", "family", "fantasy"],
        "thoughtful" => &["documentary", "drama", "history"],
        _ => &[DEFAULT_GENRE],
    }
}

/// Maps genre names to catalog IDs, dropping names the catalog lacks
pub fn resolve_genre_ids(names: &[&str], catalog: &[TmdbGenre]) -> Vec<u32> {
    let by_name: HashMap<String, u32> = catalog
        .iter()
        .map(|genre| (genre.name.to_lowercase(), genre.id))
        .collect();

    names
        .iter()
        .filter_map(|name| by_name.get(*name).copied())
        .collect()
}

/// Picks a random movie matching the genres associated with `mood`
///
/// The genre catalog is fetched on every call.
pub async fn discover_by_mood<R: Rng + Send>(
    provider: &dyn MetadataProvider,
    image_base_url: &str,
    mood: &str,
    rng: &mut R,
) -> AppResult<MovieRecord> {
    let genre_names = genres_for_mood(mood);
    let catalog = provider.genre_list().await?;
    let genre_ids = resolve_genre_ids(genre_names, &catalog);

    tracing::debug!(
        mood = %mood,
        genres = ?genre_names,
        genre_ids = ?genre_ids,
        "Resolved mood to genres"
    );

    let candidates = provider.discover_movies(&genre_ids).await?;

    let movie = candidates
        .choose(rng)
        .cloned()
        .ok_or_else(|| AppError::NoMoviesFound(mood.to_string()))?;

    tracing::info!(
        mood = %mood,
        candidates = candidates.len(),
        title = %movie.title,
        "Discovery pick made"
    );

    Ok(movie.into_record(image_base_url, None))
}
