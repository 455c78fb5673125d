//! Parsing of raw completions into commit message candidates.
//!
//! Models are asked for a JSON array but often wrap it in prose or markdown
//! fences, or run out of tokens halfway through. Extraction therefore scans
//! for the first usable array and, when the array as a whole is malformed,
//! recovers every complete object inside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::prompt::CommitType;

/// A candidate commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiResponse {
    /// Subject line.
    pub title: String,
    /// Subject plus body, separated by a blank line when a body exists.
    pub value: String,
}

impl AiResponse {
    /// Builds a candidate from a message and optional body.
    ///
    /// Returns `None` when the message is blank.
    pub fn new(message: &str, body: Option<&str>) -> Option<Self> {
        let message = message.trim();
        let title = message.lines().next()?.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let value = match body.map(str::trim).filter(|b| !b.is_empty()) {
            Some(body) => format!("{message}\n\n{body}"),
            None => message.to_string(),
        };

        Some(Self { title, value })
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let message = object
            .get("message")
            .or_else(|| object.get("title"))
            .and_then(Value::as_str)?;
        let body = object.get("body").and_then(Value::as_str);
        Self::new(message, body)
    }
}

/// How candidates that fail the commit type's shape check are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Keep invalid candidates, ranked after valid ones.
    #[default]
    Advisory,
    /// Drop invalid candidates.
    Strict,
}

/// Error returned when a validation policy name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown validation policy '{0}'. Expected one of: advisory, strict")]
pub struct ParseValidationPolicyError(pub String);

impl ValidationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationPolicy {
    type Err = ParseValidationPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "strict" => Ok(Self::Strict),
            _ => Err(ParseValidationPolicyError(s.to_string())),
        }
    }
}

/// Result of parsing a commit message completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    /// Candidates to present, at most `generate` of them.
    pub responses: Vec<AiResponse>,
    /// Candidates dropped by [`ValidationPolicy::Strict`].
    pub rejected: usize,
}

/// Extracts every well-formed candidate from a completion, in order.
pub fn parse_candidates(text: &str) -> Vec<AiResponse> {
    extract_candidate_values(text)
        .iter()
        .filter_map(AiResponse::from_value)
        .collect()
}

/// Parses a commit message completion and applies the validation policy.
///
/// The result never holds more than `generate` entries.
pub fn parse_commit_messages(
    text: &str,
    commit_type: CommitType,
    generate: usize,
    policy: ValidationPolicy,
) -> ParseOutcome {
    let candidates = parse_candidates(text);
    let parsed = candidates.len();

    let (valid, invalid): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| commit_type.accepts(&candidate.title));

    let (mut responses, rejected) = match policy {
        ValidationPolicy::Advisory => {
            let mut ranked = valid;
            ranked.extend(invalid);
            (ranked, 0)
        }
        ValidationPolicy::Strict => {
            let rejected = invalid.len();
            (valid, rejected)
        }
    };
    responses.truncate(generate);

    debug!(
        parsed,
        kept = responses.len(),
        rejected,
        commit_type = %commit_type,
        policy = %policy,
        "Parsed commit message candidates"
    );

    ParseOutcome {
        responses,
        rejected,
    }
}

/// Turns a code review completion into a single entry.
///
/// The title is the first non-empty line without markdown heading markers.
pub fn sanitize_review(text: &str) -> Vec<AiResponse> {
    let review = text.trim();
    let Some(first_line) = review.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return Vec::new();
    };

    let title = first_line.trim_start_matches('#').trim();
    let title = if title.is_empty() { first_line } else { title };

    vec![AiResponse {
        title: title.to_string(),
        value: review.to_string(),
    }]
}

// ── Lenient JSON array extraction ───────────────────────────────────

/// Finds the first JSON array holding at least one object.
///
/// Tries each `[` in turn: a full `serde_json` parse first, then recovery of
/// the complete `{...}` objects inside the bracketed region.
fn extract_candidate_values(text: &str) -> Vec<Value> {
    for (start, _) in text.match_indices('[') {
        let candidate = &text[start..];

        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
        if let Some(Ok(Value::Array(items))) = stream.next() {
            if items.iter().any(Value::is_object) {
                return items;
            }
            continue;
        }

        let region = balanced_slice(candidate, '[', ']').unwrap_or(candidate);
        let objects: Vec<Value> = balanced_objects(region)
            .into_iter()
            .filter_map(|object| serde_json::from_str(object).ok())
            .collect();
        if !objects.is_empty() {
            debug!(
                recovered = objects.len(),
                "Recovered candidates from malformed JSON array"
            );
            return objects;
        }
    }

    Vec::new()
}

/// Returns the prefix of `text` up to the delimiter closing its first
/// character, skipping delimiters inside string literals.
fn balanced_slice(text: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Returns every outermost, balanced `{...}` region in `text`.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        match balanced_slice(candidate, '{', '}') {
            Some(object) => {
                objects.push(object);
                rest = &candidate[object.len()..];
            }
            None => break,
        }
    }

    objects
}
