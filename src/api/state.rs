use std::sync::Arc;

use crate::{
    cache::RecommendationCache,
    config::Config,
    error::AppResult,
    services::{
        providers::{CompletionProvider, MetadataProvider, OpenAiProvider, TmdbProvider},
        RecommendationPipeline,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub recommendations: Arc<RecommendationPipeline>,
}

impl AppState {
    /// Builds state backed by the real upstream providers
    pub fn from_config(config: Config) -> AppResult<Self> {
        let completion: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(&config)?);
        let metadata: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(&config)?);
        Ok(Self::with_providers(config, completion, metadata))
    }

    /// Builds state around the given providers
    pub fn with_providers(
        config: Config,
        completion: Arc<dyn CompletionProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        let recommendations = RecommendationPipeline::new(
            completion,
            metadata.clone(),
            RecommendationCache::from_config(&config),
            config.tmdb_image_base_url.clone(),
        );

        Self {
            config: Arc::new(config),
            metadata,
            recommendations: Arc::new(recommendations),
        }
    }

    pub fn image_base_url(&self) -> &str {
        &self.config.tmdb_image_base_url
    }
}
