use std::error::Error;
use std::fmt;

use regex::Regex;

use crate::models::trip::TripPlan;

/// The model's completion could not be parsed as JSON. Kept separate from
/// transport failures so the HTTP layer can tell the user a retry is
/// likely to succeed.
#[derive(Debug)]
pub struct MalformedOutputError(pub serde_json::Error);

impl fmt::Display for MalformedOutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model output is not valid JSON: {}", self.0)
    }
}

impl Error for MalformedOutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Models routinely wrap the requested JSON in markdown fencing even when
/// told not to. Drop every ``` / ```json marker and surrounding
/// whitespace; the text in between is returned untouched.
pub fn strip_code_fences(raw: &str) -> String {
    let fence = Regex::new(r"```(?:json)?\n?").expect("fence pattern is valid");
    fence.replace_all(raw, "").trim().to_string()
}

/// Turn a raw completion into a trip plan. All-or-nothing: either the
/// stripped text parses as JSON and is passed through as-is, or the whole
/// response is rejected. Nested fields are not validated here.
pub fn normalize_plan(raw: &str) -> Result<TripPlan, MalformedOutputError> {
    let text = strip_code_fences(raw);
    serde_json::from_str(&text).map_err(MalformedOutputError)
}
