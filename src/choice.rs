//! Selectable list items built from candidates or provider errors.

use std::sync::LazyLock;

use crossterm::style::{Color, Stylize};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::ai::{ProviderError, TIMEOUT_MESSAGE};
use crate::prompt::CommitType;
use crate::response::AiResponse;

/// Cohere brand color.
const COHERE_PRIMARY: Color = Color::Rgb {
    r: 0xD1,
    g: 0x8E,
    b: 0xE2,
};

/// One entry of the interactive selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListChoice {
    /// Text shown in the list.
    pub name: String,
    /// Text shown once selected.
    pub short: String,
    /// Value returned on selection.
    pub value: String,
    /// Detail shown under the list.
    pub description: String,
    pub is_error: bool,
    pub disabled: bool,
}

impl ListChoice {
    /// Returns true if the entry can be picked.
    pub fn is_selectable(&self) -> bool {
        !self.is_error && !self.disabled
    }
}

/// Provider tag prefixed to every list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLabel {
    name: String,
    primary: Color,
    styled: bool,
}

impl ProviderLabel {
    /// Label for the Cohere provider.
    pub fn cohere() -> Self {
        Self {
            name: "Cohere".to_string(),
            primary: COHERE_PRIMARY,
            styled: true,
        }
    }

    /// Disables ANSI styling.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.styled = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `[Name]` on the brand color, for candidate entries.
    pub fn service(&self) -> String {
        let tag = format!("[{}]", self.name);
        if self.styled {
            tag.with(Color::White).on(self.primary).bold().to_string()
        } else {
            tag
        }
    }

    /// `[Name]` in bold red, for error entries.
    pub fn error_prefix(&self) -> String {
        let tag = format!("[{}]", self.name);
        if self.styled {
            tag.red().bold().to_string()
        } else {
            tag
        }
    }
}

/// Builds the entry for a commit message candidate.
pub fn commit_choice(label: &ProviderLabel, response: &AiResponse, include_body: bool) -> ListChoice {
    let value = if include_body {
        response.value.clone()
    } else {
        response.title.clone()
    };
    let description = if include_body {
        response.value.clone()
    } else {
        String::new()
    };

    ListChoice {
        name: format!("{} {}", label.service(), response.title),
        short: response.title.clone(),
        value,
        description,
        is_error: false,
        disabled: false,
    }
}

/// Builds the entry for a code review.
pub fn review_choice(label: &ProviderLabel, response: &AiResponse) -> ListChoice {
    ListChoice {
        name: format!("{} {}", label.service(), response.title),
        short: response.title.clone(),
        value: response.value.clone(),
        description: response.value.clone(),
        is_error: false,
        disabled: false,
    }
}

/// Builds the single disabled entry describing a provider failure.
pub fn error_choice(label: &ProviderLabel, error: &ProviderError) -> ListChoice {
    let message = extract_error_message(error);
    let name = match error.status() {
        Some(status) => format!("{} {status} {message}", label.error_prefix()),
        None => format!("{} {message}", label.error_prefix()),
    };
    disabled_error(name, message)
}

/// Builds the entry reported when strict validation dropped every candidate.
pub fn validation_error_choice(
    label: &ProviderLabel,
    commit_type: CommitType,
    rejected: usize,
) -> ListChoice {
    let message =
        format!("No generated message matched the {commit_type} format ({rejected} rejected)");
    disabled_error(format!("{} {message}", label.error_prefix()), message)
}

fn disabled_error(name: String, message: String) -> ListChoice {
    ListChoice {
        name,
        short: String::new(),
        value: message,
        description: String::new(),
        is_error: true,
        disabled: true,
    }
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static MESSAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""message":\s*"([^"]*)""#).unwrap());

/// Picks the most readable message out of a provider error.
///
/// Order: the `message` field of a JSON body, then a `"message": "..."`
/// match in the raw text, then the raw text itself.
pub fn extract_error_message(error: &ProviderError) -> String {
    match error {
        ProviderError::Timeout => TIMEOUT_MESSAGE.to_string(),
        ProviderError::Api { status, body } => structured_message(body)
            .or_else(|| regex_message(body))
            .unwrap_or_else(|| raw_api_message(*status, body)),
        other => {
            let raw = other.to_string();
            regex_message(&raw).unwrap_or(raw)
        }
    }
}

fn structured_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn regex_message(text: &str) -> Option<String> {
    MESSAGE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|m| !m.is_empty())
}

fn raw_api_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> ProviderLabel {
        ProviderLabel::cohere().plain()
    }

    fn response() -> AiResponse {
        AiResponse::new("feat: add parser", Some("Adds json parsing")).unwrap()
    }

    #[test]
    fn commit_choice_with_body() {
        let choice = commit_choice(&label(), &response(), true);
        assert_eq!(choice.name, "[Cohere] feat: add parser");
        assert_eq!(choice.short, "feat: add parser");
        assert_eq!(choice.value, "feat: add parser\n\nAdds json parsing");
        assert_eq!(choice.description, choice.value);
        assert!(choice.is_selectable());
    }

    #[test]
    fn commit_choice_without_body() {
        let choice = commit_choice(&label(), &response(), false);
        assert_eq!(choice.value, "feat: add parser");
        assert!(choice.description.is_empty());
    }

    #[test]
    fn review_choice_keeps_full_text() {
        let review = AiResponse {
            title: "Looks good".to_string(),
            value: "Looks good\n\n- nit".to_string(),
        };
        let choice = review_choice(&label(), &review);
        assert_eq!(choice.value, "Looks good\n\n- nit");
        assert_eq!(choice.description, choice.value);
    }

    #[test]
    fn timeout_error_choice() {
        let choice = error_choice(&label(), &ProviderError::Timeout);
        assert_eq!(choice.value, "Request timed out error!");
        assert_eq!(choice.name, "[Cohere] Request timed out error!");
        assert!(choice.is_error);
        assert!(choice.disabled);
        assert!(!choice.is_selectable());
    }

    #[test]
    fn structured_message_wins() {
        let err = ProviderError::Api {
            status: 401,
            body: r#"{"message":"invalid api token"}"#.to_string(),
        };
        let choice = error_choice(&label(), &err);
        assert_eq!(choice.value, "invalid api token");
        assert_eq!(choice.name, "[Cohere] 401 invalid api token");
    }

    #[test]
    fn regex_fallback_on_non_json_body() {
        let err = ProviderError::Api {
            status: 429,
            body: r#"upstream said {"message": "rate limited", "code": 4"#.to_string(),
        };
        assert_eq!(extract_error_message(&err), "rate limited");
    }

    #[test]
    fn raw_fallback() {
        let err = ProviderError::Api {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(extract_error_message(&err), "<html>Bad Gateway</html>");
        let choice = error_choice(&label(), &err);
        assert_eq!(choice.name, "[Cohere] 502 <html>Bad Gateway</html>");

        let empty = ProviderError::Api {
            status: 503,
            body: String::new(),
        };
        assert_eq!(extract_error_message(&empty), "Service Unavailable");
    }

    #[test]
    fn network_error_uses_display() {
        let err = ProviderError::Network("connection refused".to_string());
        assert_eq!(extract_error_message(&err), "Network error: connection refused");
        assert_eq!(
            error_choice(&label(), &err).name,
            "[Cohere] Network error: connection refused"
        );
    }

    #[test]
    fn validation_error_choice_is_disabled() {
        let choice = validation_error_choice(&label(), CommitType::Conventional, 3);
        assert!(choice.is_error && choice.disabled);
        assert!(choice.value.contains("conventional format"));
        assert!(choice.value.contains("3 rejected"));
    }

    #[test]
    fn styled_label_contains_ansi() {
        let styled = ProviderLabel::cohere().service();
        assert!(styled.contains("[Cohere]"));
        assert!(styled.contains('\u{1b}'));
    }
}
