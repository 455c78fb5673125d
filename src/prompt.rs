//! Prompt templates for commit message generation and code review.

pub mod commit_type;
pub mod gitmoji;
pub mod validation;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

pub use commit_type::{CommitType, ParseCommitTypeError, CONVENTIONAL_TYPES};
pub use gitmoji::GITMOJI_CATALOG;
pub use validation::{is_valid_conventional_message, is_valid_gitmoji_message};

/// Default maximum subject line length.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Inputs for building the system prompt of a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOptions {
    /// Language the commit message is written in.
    pub locale: String,
    /// Maximum subject line length in characters.
    pub max_length: usize,
    /// Commit message style.
    pub commit_type: CommitType,
    /// Number of candidates requested.
    pub generate: usize,
    /// Inline replacement for the default instructions.
    pub system_prompt: Option<String>,
    /// Template file replacing the default instructions.
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            commit_type: CommitType::Conventional,
            generate: 1,
            system_prompt: None,
            system_prompt_path: None,
        }
    }
}

/// Builds the default commit message instructions.
///
/// Format and type sections are left out for [`CommitType::Freeform`].
pub fn generate_default_prompt(
    locale: &str,
    max_length: usize,
    commit_type: CommitType,
    additional_prompts: &str,
) -> String {
    let intro = match commit_type.specification_name() {
        Some(spec) => format!(
            "You are an expert programmer trained to write professional git commit messages following the {spec} Commits specification. Generate concise and meaningful git commit messages based on the guidelines below:"
        ),
        None => "You are an expert programmer trained to write professional git commit messages. Generate concise and meaningful git commit messages based on the guidelines below:".to_string(),
    };

    let mut rules = vec![format!("Message language: {locale}")];

    if commit_type != CommitType::Freeform {
        rules.push(format!("Format: {}", commit_type.format_template()));
        rules.push(format!(
            "Type: Choose the most appropriate type from the following list: \n{}",
            commit_type.vocabulary_json()
        ));
    }

    rules.push(format!(
        "Subject line(first line):
     - Maximum {max_length} characters
     - Written in imperative mood, present tense
     - No capitalization of first letter
     - No period at the end"
    ));
    rules.push(
        "Body(if needed):
     - Separated from subject by a blank line
     - Explain what and why, not how
     - Wrap at 72 characters
     - Use bullet points for multiple changes"
            .to_string(),
    );
    rules.push(
        "Footer: Optional, for indicating breaking changes or referencing issues".to_string(),
    );
    if commit_type != CommitType::Freeform {
        rules.push(
            "Scope: Optional, can be anything specifying the place of the commit change"
                .to_string(),
        );
    }
    rules.push("Description: A short summary of the code changes".to_string());

    let mut lines = vec![intro];
    lines.extend(
        rules
            .iter()
            .enumerate()
            .map(|(i, rule)| format!("{}. {rule}", i + 1)),
    );
    if !additional_prompts.trim().is_empty() {
        lines.push(additional_prompts.trim().to_string());
    }
    lines.push(
        "Avoid unnecessary explanations or translations. Your response will be used directly in git commit messages, so ensure it follows the specified format precisely.".to_string(),
    );

    lines.join("\n")
}

/// Builds the instruction asking for `generate` candidates as a JSON array.
pub fn extra_prompt(generate: usize, commit_type: CommitType) -> String {
    let another = match commit_type.specification_name() {
        Some(name) => format!("Another {name} commit message"),
        None => "Another commit message".to_string(),
    };
    let style = match commit_type.specification_name() {
        Some(name) => format!("{name} "),
        None => String::new(),
    };

    format!(
        r#"Provide {generate} commit messages in the following JSON array format:
[
  {{
    "message": "{example}",
    "body": "Detailed explanation if necessary"
  }},
  {{
    "message": "{another}",
    "body": "Another detailed explanation if necessary"
  }}
]

Note: Your task is to create well-formatted, {style}commit messages for each requested commit. Ensure that the messages are diverse and showcase different types and formats."#,
        example = commit_type.example_subject(),
    )
}

/// Substitutes `{locale}`, `{maxLength}`, `{commitType}` and `{generate}`
/// in a user supplied template.
pub fn render_template(template: &str, options: &PromptOptions) -> String {
    template
        .replace("{locale}", &options.locale)
        .replace("{maxLength}", &options.max_length.to_string())
        .replace("{commitType}", options.commit_type.as_str())
        .replace("{generate}", &options.generate.to_string())
}

/// Resolves the full system prompt for a commit message request.
///
/// Precedence: inline override, then template file, then the default
/// instructions. An unreadable template falls back to the default. The JSON
/// answer instruction is always appended.
pub fn generate_prompt(options: &PromptOptions) -> String {
    let instructions = if let Some(custom) = options
        .system_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        debug!("Using inline system prompt override");
        render_template(custom, options)
    } else if let Some(path) = &options.system_prompt_path {
        match fs::read_to_string(path) {
            Ok(template) => {
                debug!(path = %path.display(), "Using system prompt template");
                render_template(&template, options)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read system prompt template, using default prompt"
                );
                default_instructions(options)
            }
        }
    } else {
        default_instructions(options)
    };

    format!(
        "{instructions}\n{}",
        extra_prompt(options.generate, options.commit_type)
    )
}

fn default_instructions(options: &PromptOptions) -> String {
    generate_default_prompt(
        &options.locale,
        options.max_length,
        options.commit_type,
        "",
    )
}

/// System prompt for reviewing a staged diff.
pub const CODE_REVIEW_PROMPT: &str = r"You are an experienced senior software engineer performing a code review of a staged git diff.
Review the changes and report, in order of importance:
1. Bugs, logic errors and unhandled edge cases
2. Security issues such as injection, leaked secrets or unsafe input handling
3. Performance problems
4. Readability and maintainability concerns, including naming and duplication
5. Missing or insufficient tests

Guidelines:
- Start with a one line summary of the overall quality of the change
- Reference files and lines from the diff when pointing at a problem
- Suggest a concrete fix for every problem you report
- Keep the review concise; skip sections with nothing to report
- If the change looks good, say so briefly instead of inventing issues";
