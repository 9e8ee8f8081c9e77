use crate::models::PreferenceInput;

/// Final line of every prompt, constraining the reply format
pub const REPLY_INSTRUCTION: &str =
    "Reply with only the movie title followed by its release year in parentheses, \
in the form Title (Year), and nothing else.";

/// Builds the natural-language recommendation request
///
/// Every answer is embedded verbatim; list answers are comma-joined.
pub fn build_prompt(input: &PreferenceInput) -> String {
    format!(
        "Recommend one movie for me based on these preferences.\n\
         Mood: {}\n\
         Occasion: {}\n\
         Preferred genres: {}\n\
         Movie age preference: {}\n\
         Importance of critic and audience ratings: {}\n\
         Acceptable MPAA ratings: {}\n\
         {}",
        input.mood,
        input.occasion,
        input.genres.join(", "),
        input.age_preference,
        input.rating_importance,
        input.acceptable_ratings.join(", "),
        REPLY_INSTRUCTION,
    )
}
