/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Search: /search/movie?query=...&year=... → ranked movie summaries
/// 2. Genres: /genre/movie/list → id/name catalog
/// 3. Discover: /discover/movie?with_genres=28,12 → movie summaries
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{TmdbGenre, TmdbGenreList, TmdbMovie, TmdbPage},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issues a GET against a TMDB endpoint with the API key attached
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("TMDB_API_KEY is not set".to_string()))?;

        let url = format!("{}{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, and with it the api_key, in its message
                AppError::ExternalApi(format!(
                    "TMDB request to {} failed: {}",
                    endpoint,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalApi(format!(
                "Failed to parse TMDB response from {}: {}",
                endpoint,
                e.without_url()
            ))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn search_movies(&self, query: &str, year: Option<String>) -> AppResult<Vec<TmdbMovie>> {
        let mut params = vec![("query", query)];
        if let Some(year) = year.as_deref() {
            params.push(("year", year));
        }

        let page: TmdbPage = self.get_json("/search/movie", &params).await?;

        tracing::info!(
            query = %query,
            year = ?year,
            results = page.results.len(),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(page.results)
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn genre_list(&self) -> AppResult<Vec<TmdbGenre>> {
        let list: TmdbGenreList = self.get_json("/genre/movie/list", &[]).await?;

        tracing::debug!(genres = list.genres.len(), "Genre catalog fetched");

        Ok(list.genres)
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn discover_movies(&self, genre_ids: &[u32]) -> AppResult<Vec<TmdbMovie>> {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let page: TmdbPage = self
            .get_json("/discover/movie", &[("with_genres", with_genres.as_str())])
            .await?;

        tracing::info!(
            with_genres = %with_genres,
            results = page.results.len(),
            provider = self.name(),
            "Movie discovery completed"
        );

        Ok(page.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
