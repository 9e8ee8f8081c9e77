use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Number of answers the questionnaire produces
pub const ANSWER_COUNT: usize = 6;

const ANSWER_NAMES: [&str; ANSWER_COUNT] = [
    "mood",
    "occasion",
    "genres",
    "age_preference",
    "rating_importance",
    "acceptable_ratings",
];

/// Validated questionnaire answers
///
/// Built from the loosely typed `answers` array sent by the client. Field
/// order here is the order answers appear on the wire and in the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceInput {
    pub mood: String,
    pub occasion: String,
    pub genres: Vec<String>,
    pub age_preference: String,
    pub rating_importance: String,
    pub acceptable_ratings: Vec<String>,
}

impl PreferenceInput {
    /// Validates the raw answers array
    ///
    /// Exactly six answers are required. Positions 2 and 5 are lists; a bare string there is accepted as a
    /// one-element list. Anything else at any position is malformed input.
    pub fn from_answers(answers: &[Value]) -> AppResult<Self> {
        if answers.len() != ANSWER_COUNT {
            return Err(AppError::MalformedInput(format!(
                "expected {} answers, got {}",
                ANSWER_COUNT,
                answers.len()
            )));
        }

        Ok(Self {
            mood: scalar(answers, 0)?,
            occasion: scalar(answers, 1)?,
            genres: list(answers, 2)?,
            age_preference: scalar(answers, 3)?,
            rating_importance: scalar(answers, 4)?,
            acceptable_ratings: list(answers, 5)?,
        })
    }

    /// Short description used in log lines
    pub fn summary(&self) -> String {
        format!("mood={} occasion={}", self.mood, self.occasion)
    }

    /// Copy with every value trimmed, case and list order untouched
    ///
    /// Case reaches the prompt verbatim, so it stays part of the identity.
    pub fn normalized(&self) -> Self {
        fn norm(value: &str) -> String {
            value.trim().to_string()
        }

        Self {
            mood: norm(&self.mood),
            occasion: norm(&self.occasion),
            genres: self.genres.iter().map(|g| norm(g)).collect(),
            age_preference: norm(&self.age_preference),
            rating_importance: norm(&self.rating_importance),
            acceptable_ratings: self.acceptable_ratings.iter().map(|r| norm(r)).collect(),
        }
    }
}

fn scalar(answers: &[Value], index: usize) -> AppResult<String> {
    match &answers[index] {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_error(index, "a string", other)),
    }
}

fn list(answers: &[Value], index: usize) -> AppResult<Vec<String>> {
    match &answers[index] {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(type_error(index, "a list of strings", other)),
            })
            .collect(),
        other => Err(type_error(index, "a list of strings", other)),
    }
}

fn type_error(index: usize, expected: &str, found: &Value) -> AppError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    AppError::MalformedInput(format!(
        "answer {} ({}) must be {}, found {}",
        index, ANSWER_NAMES[index], expected, found
    ))
}
