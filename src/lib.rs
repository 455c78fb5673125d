//! # aicommit
//!
//! Generates git commit messages and code reviews from staged diffs using
//! the Cohere chat API.
//!
//! A request flows through four stages:
//!
//! - [`prompt`] builds the system prompt from locale, commit type and length
//! - [`ai`] sends the prompt and diff to the provider
//! - [`response`] extracts candidate messages from the completion
//! - [`choice`] turns candidates (or a failure) into list items
//!
//! [`service::CommitService`] wires them together for one invocation.
//!
//! ## Quick Start
//!
//! ```rust
//! use aicommit::prompt::{generate_prompt, CommitType, PromptOptions};
//!
//! let options = PromptOptions {
//!     commit_type: CommitType::Gitmoji,
//!     generate: 3,
//!     ..PromptOptions::default()
//! };
//! assert!(generate_prompt(&options).contains("Provide 3 commit messages"));
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ai;
pub mod choice;
pub mod cli;
pub mod config;
pub mod git;
pub mod prompt;
pub mod response;
pub mod service;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of aicommit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
