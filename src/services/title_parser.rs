use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::{AppError, AppResult},
    models::ParsedTitleYear,
};

fn trailing_year() -> &'static Regex {
    static TRAILING_YEAR: OnceLock<Regex> = OnceLock::new();
    TRAILING_YEAR.get_or_init(|| Regex::new(r"\(([0-9]{4})\)$").expect("valid year pattern"))
}

/// Splits a completion reply into title and optional year
///
/// A reply ending in `(YYYY)` yields that year and everything before the last
/// `(` as the title. Any other reply is taken whole as the title. Only a reply
/// with no title text at all is an error.
pub fn parse_title_year(raw: &str) -> AppResult<ParsedTitleYear> {
    let text = raw.trim();

    let (title, year) = match trailing_year().captures(text) {
        Some(caps) => {
            let year = caps.get(1).map(|m| m.as_str().to_string());
            let cut = text.rfind('(').unwrap_or(text.len());
            (text[..cut].trim(), year)
        }
        None => (text, None),
    };

    if title.is_empty() {
        return Err(AppError::EmptyCompletion);
    }

    Ok(ParsedTitleYear {
        title: title.to_string(),
        year,
    })
}
