//! Commit message styles and the vocabulary each one offers the model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gitmoji::GITMOJI_CATALOG;

/// Conventional commit types, as defined by commitlint's
/// `config-conventional` and the conventional-changelog writer.
pub const CONVENTIONAL_TYPES: &[(&str, &str)] = &[
    ("docs", "Documentation only changes"),
    (
        "style",
        "Changes that do not affect the meaning of the code (white-space, formatting, missing semi-colons, etc)",
    ),
    (
        "refactor",
        "A code change that neither fixes a bug nor adds a feature",
    ),
    ("perf", "A code change that improves performance"),
    ("test", "Adding missing tests or correcting existing tests"),
    (
        "build",
        "Changes that affect the build system or external dependencies",
    ),
    ("ci", "Changes to CI configuration files, scripts"),
    ("chore", "Other changes that don't modify src or test files"),
    ("revert", "Reverts a previous commit"),
    ("feat", "A new feature"),
    ("fix", "A bug fix"),
];

const FREEFORM_FORMAT: &str = "<commit message>";

const CONVENTIONAL_FORMAT: &str = "<type>(<optional scope>): <description>

[optional body]

[optional footer(s)]";

const GITMOJI_FORMAT: &str = ":<emoji>:(<optional scope>): <description>

[optional body]

[optional footer(s)]";

/// Commit message style requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    /// No prescribed format or vocabulary.
    #[serde(rename = "", alias = "freeform")]
    Freeform,
    /// `type(scope): description`.
    #[default]
    Conventional,
    /// `:emoji: description`.
    Gitmoji,
}

/// Error returned when a commit type name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown commit type '{0}'. Expected one of: conventional, gitmoji, freeform")]
pub struct ParseCommitTypeError(pub String);

impl CommitType {
    /// Every supported commit type.
    pub const ALL: [Self; 3] = [Self::Freeform, Self::Conventional, Self::Gitmoji];

    /// Configuration value for this type (`""` for freeform).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freeform => "",
            Self::Conventional => "conventional",
            Self::Gitmoji => "gitmoji",
        }
    }

    /// Type name as written in the prompt intro; `None` for freeform.
    pub fn specification_name(self) -> Option<&'static str> {
        match self {
            Self::Freeform => None,
            Self::Conventional => Some("conventional"),
            Self::Gitmoji => Some("gitmoji"),
        }
    }

    /// Message layout shown to the model.
    pub fn format_template(self) -> &'static str {
        match self {
            Self::Freeform => FREEFORM_FORMAT,
            Self::Conventional => CONVENTIONAL_FORMAT,
            Self::Gitmoji => GITMOJI_FORMAT,
        }
    }

    /// Subject placeholder used in the JSON answer example.
    pub fn example_subject(self) -> &'static str {
        match self {
            Self::Freeform => FREEFORM_FORMAT,
            Self::Conventional => "<type>(<optional scope>): <description>",
            Self::Gitmoji => ":<emoji>: <description>",
        }
    }

    /// Code → description pairs the model chooses a type from.
    pub fn vocabulary(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Freeform => &[],
            Self::Conventional => CONVENTIONAL_TYPES,
            Self::Gitmoji => GITMOJI_CATALOG,
        }
    }

    /// Vocabulary as a two-space indented JSON object, in declaration order.
    ///
    /// Empty for [`CommitType::Freeform`].
    pub fn vocabulary_json(self) -> String {
        let entries = self.vocabulary();
        if entries.is_empty() {
            return String::new();
        }

        let body = entries
            .iter()
            .map(|(code, description)| {
                format!("  {}: {}", json_string(code), json_string(description))
            })
            .collect::<Vec<_>>()
            .join(",\n");

        format!("{{\n{body}\n}}")
    }
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Freeform => f.write_str("freeform"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for CommitType {
    type Err = ParseCommitTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "freeform" => Ok(Self::Freeform),
            "conventional" => Ok(Self::Conventional),
            "gitmoji" => Ok(Self::Gitmoji),
            _ => Err(ParseCommitTypeError(s.to_string())),
        }
    }
}
