use serde::{Deserialize, Serialize};

pub mod preferences;

pub use preferences::PreferenceInput;

/// Year value used when neither the metadata service nor the completion knows it
pub const UNKNOWN_YEAR: &str = "N/A";

/// Movie returned to the client by the recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    /// Four-digit year or "N/A"
    pub year: String,
    /// Absolute poster URL
    pub poster_path: Option<String>,
    pub overview: String,
    pub vote_average: f64,
    pub original_language: String,
}

/// Movie entry returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub title: String,
    pub year: Option<String>,
    pub poster_path: Option<String>,
    pub overview: String,
    pub vote_average: f64,
}

/// Title and year pulled out of a completion reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitleYear {
    pub title: String,
    pub year: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Movie entry as returned by TMDB search and discover endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl TmdbMovie {
    /// Year taken from the first four characters of the release date
    pub fn release_year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }

    /// Absolute poster URL, if TMDB supplied a poster path
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url, path))
    }

    /// Shapes the entry into a `MovieRecord`
    ///
    /// `fallback_year` is used when TMDB has no usable release date.
    pub fn into_record(self, image_base_url: &str, fallback_year: Option<&str>) -> MovieRecord {
        let year = self
            .release_year()
            .or_else(|| fallback_year.map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        let poster_path = self.poster_url(image_base_url);

        MovieRecord {
            title: self.title,
            year,
            poster_path,
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            original_language: self
                .original_language
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| "en".to_string()),
        }
    }

    /// Shapes the entry into a search result
    pub fn into_summary(self, image_base_url: &str) -> MovieSummary {
        let year = self.release_year();
        let poster_path = self.poster_url(image_base_url);

        MovieSummary {
            title: self.title,
            year,
            poster_path,
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
        }
    }
}

/// Paginated movie list from TMDB
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Genre catalog entry
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

/// Response from GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn groundhog_day() -> TmdbMovie {
        TmdbMovie {
            id: 137,
            title: "Groundhog Day".to_string(),
            overview: Some("A weatherman relives the same day.".to_string()),
            release_date: Some("1993-02-12".to_string()),
            poster_path: Some("/gCgt1WARPZaXnq523ySQEUKinCs.jpg".to_string()),
            vote_average: Some(7.6),
            original_language: Some("en".to_string()),
        }
    }

    #[test]
    fn test_into_record_uses_release_date() {
        let record = groundhog_day().into_record(IMAGE_BASE, Some("1994"));
        assert_eq!(record.title, "Groundhog Day");
        assert_eq!(record.year, "1993");
        assert_eq!(
            record.poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/gCgt1WARPZaXnq523ySQEUKinCs.jpg")
        );
        assert_eq!(record.vote_average, 7.6);
        assert_eq!(record.original_language, "en");
    }

    #[test]
    fn test_into_record_defaults_missing_fields() {
        let movie = TmdbMovie {
            title: "Obscure Film".to_string(),
            release_date: Some(String::new()),
            ..Default::default()
        };

        let record = movie.clone().into_record(IMAGE_BASE, Some("2001"));
        assert_eq!(record.year, "2001");
        assert_eq!(record.poster_path, None);
        assert_eq!(record.overview, "");
        assert_eq!(record.vote_average, 0.0);
        assert_eq!(record.original_language, "en");

        let record = movie.into_record(IMAGE_BASE, None);
        assert_eq!(record.year, UNKNOWN_YEAR);
    }

    #[test]
    fn test_into_summary() {
        let summary = groundhog_day().into_summary(IMAGE_BASE);
        assert_eq!(summary.year.as_deref(), Some("1993"));
        assert!(summary.poster_path.unwrap().starts_with(IMAGE_BASE));
    }

    #[test]
    fn test_tmdb_page_deserialization_with_nulls() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "overview": "Set in the 22nd century...",
                "release_date": "1999-03-30",
                "poster_path": null,
                "vote_average": 8.2,
                "original_language": "en"
            }],
            "total_results": 1
        }"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 603);
        assert_eq!(page.results[0].poster_path, None);
        assert_eq!(page.results[0].release_year().as_deref(), Some("1999"));
    }

    #[test]
    fn test_genre_list_deserialization() {
        let json = r#"{"genres":[{"id":28,"name":"Action"},{"id":35,"name":"Comedy"}]}"#;
        let list: TmdbGenreList = serde_json::from_str(json).unwrap();
        assert_eq!(
            list.genres[1],
            TmdbGenre {
                id: 35,
                name: "Comedy".to_string()
            }
        );
    }
}
