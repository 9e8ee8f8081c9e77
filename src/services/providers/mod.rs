/// Upstream service abstraction
///
/// The recommendation flow talks to two black-box services: a language-model
/// completion API and a movie metadata API. Each sits behind a trait so the
/// pipelines can run against mocks in tests.
use crate::{
    error::AppResult,
    models::{TmdbGenre, TmdbMovie},
};

pub mod openai;
pub mod tmdb;

pub use openai::OpenAiProvider;
pub use tmdb::TmdbProvider;

/// Trait for language-model completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the prompt and returns the raw text of the first choice
    ///
    /// Fails with `ProviderUnavailable` when the service cannot be reached or
    /// rejects the call, and `EmptyCompletion` when it answers with nothing.
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Searches movies by title, optionally constrained to a release year
    ///
    /// Results are in the provider's relevance order.
    async fn search_movies(&self, query: &str, year: Option<String>) -> AppResult<Vec<TmdbMovie>>;

    /// Fetches the full movie genre catalog
    async fn genre_list(&self) -> AppResult<Vec<TmdbGenre>>;

    /// Fetches the first page of movies matching all given genre IDs
    async fn discover_movies(&self, genre_ids: &[u32]) -> AppResult<Vec<TmdbMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
