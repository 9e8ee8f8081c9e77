pub mod discovery;
pub mod metadata_lookup;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod title_parser;
pub mod title_search;

pub use recommendations::RecommendationPipeline;
