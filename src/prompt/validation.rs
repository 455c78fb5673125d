//! Shape checks for generated commit subjects.

use std::sync::LazyLock;

use regex::Regex;

use super::CommitType;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(build|chore|ci|docs|feat|fix|perf|refactor|revert|style|test)(\(.*\))?: .*$")
        .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static GITMOJI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\w*:").unwrap());

/// Returns true if the message contains a `type(scope): description` header.
///
/// The pattern is unanchored, so a header preceded by stray characters
/// still matches.
pub fn is_valid_conventional_message(message: &str) -> bool {
    CONVENTIONAL_RE.is_match(message)
}

/// Returns true if the message contains a `:shortcode:` token.
pub fn is_valid_gitmoji_message(message: &str) -> bool {
    GITMOJI_RE.is_match(message)
}

impl CommitType {
    /// Checks a subject line against this commit type's shape.
    ///
    /// Freeform messages are always accepted.
    pub fn accepts(self, message: &str) -> bool {
        match self {
            Self::Freeform => true,
            Self::Conventional => is_valid_conventional_message(message),
            Self::Gitmoji => is_valid_gitmoji_message(message),
        }
    }
}
