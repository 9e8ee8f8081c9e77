use moka::future::Cache;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{MovieRecord, PreferenceInput};

/// Canonical identity of a questionnaire submission
///
/// JSON of the trimmed answers in declaration order. Case and list order are
/// kept since both shape the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_preferences(input: &PreferenceInput) -> AppResult<Self> {
        serde_json::to_string(&input.normalized())
            .map(CacheKey)
            .map_err(|e| AppError::Internal(format!("Cache key serialization error: {}", e)))
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rec:{}", self.0)
    }
}

/// In-process store of finished recommendations
///
/// Bounded by entry count with an optional time-to-live; moka evicts the
/// least valuable entries once the bound is reached. Only successful
/// pipeline runs are stored.
#[derive(Clone)]
pub struct RecommendationCache {
    inner: Cache<CacheKey, MovieRecord>,
}

impl RecommendationCache {
    pub fn new(max_entries: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        tracing::info!(max_entries, ttl = ?ttl, "Recommendation cache initialised");

        Self {
            inner: builder.build(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_entries, config.cache_ttl())
    }

    /// Retrieves a cached recommendation
    pub async fn lookup(&self, key: &CacheKey) -> Option<MovieRecord> {
        self.inner.get(key).await
    }

    /// Stores a recommendation, replacing any previous value for the key
    pub async fn store(&self, key: CacheKey, record: MovieRecord) {
        self.inner.insert(key, record).await;
    }

    /// Returns the cached record for `key`, or runs `compute` and caches its result
    ///
    /// Concurrent callers with the same key share a single `compute` run and
    /// all receive its outcome. Errors are returned to every waiter and nothing
    /// is stored. The flag is `true` when the record came from the cache.
    pub async fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> AppResult<(MovieRecord, bool)>
    where
        F: Future<Output = AppResult<MovieRecord>>,
    {
        let entry = self
            .inner
            .entry(key)
            .or_try_insert_with(compute)
            .await
            .map_err(|e| (*e).clone())?;

        let hit = !entry.is_fresh();
        Ok((entry.into_value(), hit))
    }

    /// Approximate number of cached entries
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Applies pending evictions and expirations
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn input(mood: &str, genres: &[&str]) -> PreferenceInput {
        PreferenceInput {
            mood: mood.to_string(),
            occasion: "alone".to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            age_preference: "any".to_string(),
            rating_importance: "low".to_string(),
            acceptable_ratings: vec!["PG".to_string()],
        }
    }

    fn record(title: &str) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            year: "1993".to_string(),
            poster_path: None,
            overview: String::new(),
            vote_average: 7.5,
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_cache_key_ignores_padding() {
        let a = CacheKey::from_preferences(&input("happy", &["comedy"])).unwrap();
        let b = CacheKey::from_preferences(&input(" happy ", &["comedy "])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_respects_case() {
        let a = CacheKey::from_preferences(&input("Happy", &["Comedy"])).unwrap();
        let b = CacheKey::from_preferences(&input("happy", &["comedy"])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_respects_list_order() {
        let a = CacheKey::from_preferences(&input("happy", &["comedy", "drama"])).unwrap();
        let b = CacheKey::from_preferences(&input("happy", &["drama", "comedy"])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::from_preferences(&input("happy", &["comedy"])).unwrap();
        let shown = format!("{}", key);
        assert!(shown.starts_with("rec:{\"mood\":\"happy\""));
    }

    #[tokio::test]
    async fn test_lookup_and_store() {
        let cache = RecommendationCache::new(10, None);
        let key = CacheKey::from_preferences(&input("sad", &["drama"])).unwrap();

        assert_eq!(cache.lookup(&key).await, None);

        cache.store(key.clone(), record("Up")).await;
        assert_eq!(cache.lookup(&key).await, Some(record("Up")));
    }

    #[tokio::test]
    async fn test_get_or_compute_runs_once() {
        let cache = RecommendationCache::new(10, None);
        let key = CacheKey::from_preferences(&input("happy", &["comedy"])).unwrap();
        let calls = AtomicUsize::new(0);

        let (first, hit) = cache
            .get_or_compute(key.clone(), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record("Groundhog Day"))
            })
            .await
            .unwrap();
        assert!(!hit);

        let (second, hit) = cache
            .get_or_compute(key, async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record("Something Else"))
            })
            .await
            .unwrap();
        assert!(hit);

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_compute_does_not_cache_errors() {
        let cache = RecommendationCache::new(10, None);
        let key = CacheKey::from_preferences(&input("happy", &["comedy"])).unwrap();

        let err = cache
            .get_or_compute(key.clone(), async {
                Err(AppError::MovieNotFound("Nothing".to_string()))
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "movie_not_found");
        assert_eq!(cache.lookup(&key).await, None);

        let (value, hit) = cache
            .get_or_compute(key, async { Ok(record("Second Try")) })
            .await
            .unwrap();
        assert!(!hit);
        assert_eq!(value.title, "Second Try");
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_share_one_computation() {
        let cache = RecommendationCache::new(10, None);
        let key = CacheKey::from_preferences(&input("excited", &["action"])).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let compute = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, AppError>(record("Speed"))
        };

        let (a, b) = tokio::join!(
            cache.get_or_compute(key.clone(), compute(calls.clone())),
            cache.get_or_compute(key.clone(), compute(calls.clone())),
        );

        assert_eq!(a.unwrap().0, b.unwrap().0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let cache = RecommendationCache::new(2, None);

        for i in 0..10 {
            let key = CacheKey::from_preferences(&input(&format!("mood-{}", i), &["comedy"])).unwrap();
            cache.store(key, record("Filler")).await;
        }
        cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 2);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = RecommendationCache::new(10, Some(Duration::from_millis(50)));
        let key = CacheKey::from_preferences(&input("sad", &["drama"])).unwrap();

        cache.store(key.clone(), record("Up")).await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.lookup(&key).await, None);
    }
}
