use std::sync::Arc;

use crate::{
    cache::{CacheKey, RecommendationCache},
    error::{AppError, AppResult},
    models::{MovieRecord, PreferenceInput},
    services::{
        metadata_lookup::lookup_movie,
        prompt::build_prompt,
        providers::{CompletionProvider, MetadataProvider},
        title_parser::parse_title_year,
    },
};

/// Generates a single movie recommendation from questionnaire answers
///
/// Flow: cache → prompt → completion → title/year parse → metadata lookup →
/// cache store. Any failure aborts the run and nothing is cached.
pub struct RecommendationPipeline {
    completion: Arc<dyn CompletionProvider>,
    metadata: Arc<dyn MetadataProvider>,
    cache: RecommendationCache,
    image_base_url: String,
}

impl RecommendationPipeline {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        metadata: Arc<dyn MetadataProvider>,
        cache: RecommendationCache,
        image_base_url: String,
    ) -> Self {
        Self {
            completion,
            metadata,
            cache,
            image_base_url,
        }
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub async fn recommend(&self, input: &PreferenceInput) -> AppResult<MovieRecord> {
        let key = CacheKey::from_preferences(input)?;

        let (record, hit) = self
            .cache
            .get_or_compute(key, self.run_uncached(input))
            .await?;

        tracing::info!(
            input = %input.summary(),
            title = %record.title,
            year = %record.year,
            cache_hit = hit,
            "Recommendation ready"
        );

        Ok(record)
    }

    async fn run_uncached(&self, input: &PreferenceInput) -> AppResult<MovieRecord> {
        let prompt = build_prompt(input);

        let raw = self.completion.complete(&prompt).await.map_err(|e| {
            log_failure(input, "completion", &e);
            e
        })?;

        let parsed = parse_title_year(&raw).map_err(|e| {
            log_failure(input, "parse", &e);
            e
        })?;

        tracing::debug!(
            raw = %raw,
            title = %parsed.title,
            year = ?parsed.year,
            provider = self.completion.name(),
            "Completion parsed"
        );

        lookup_movie(self.metadata.as_ref(), &self.image_base_url, &parsed)
            .await
            .map_err(|e| {
                log_failure(input, "lookup", &e);
                e
            })
    }
}

fn log_failure(input: &PreferenceInput, stage: &'static str, error: &AppError) {
    tracing::error!(
        input = %input.summary(),
        stage,
        kind = error.kind(),
        error = %error,
        "Recommendation pipeline failed"
    );
}
