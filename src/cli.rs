//! CLI interface for aicommit.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::ai::create_default_client;
use crate::config::{CommitConfig, ConfigOverrides};
use crate::git::{ExcludeMatcher, GitRepository, StagedDiff};
use crate::response::ValidationPolicy;
use crate::service::CommitService;
use crate::utils::exchange_log::FileExchangeLogger;

pub mod commit;
pub mod config;
pub mod review;

/// aicommit: AI generated commit messages and code reviews.
#[derive(Parser)]
#[command(name = "aicommit")]
#[command(about = "Generate git commit messages and code reviews with Cohere", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generates a commit message for the staged changes and commits it.
    Commit(commit::CommitCommand),
    /// Reviews the staged changes.
    Review(review::ReviewCommand),
    /// Configuration inspection.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Commit(cmd) => cmd.execute().await,
            Commands::Review(cmd) => cmd.execute().await,
            Commands::Config(cmd) => cmd.execute(),
        }
    }
}

/// Flags overriding configured generation settings.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Cohere model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Language of the generated message.
    #[arg(long, short = 'l')]
    pub locale: Option<String>,
}

impl GenerationArgs {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.clone(),
            locale: self.locale.clone(),
            ..ConfigOverrides::default()
        }
    }
}

pub(crate) fn strict_override(strict: bool) -> Option<ValidationPolicy> {
    strict.then_some(ValidationPolicy::Strict)
}

/// Opens the repository and collects the staged diff, failing when empty.
pub(crate) fn load_staged_diff(config: &CommitConfig) -> Result<(GitRepository, StagedDiff)> {
    let repo = GitRepository::open()?;
    let excludes = ExcludeMatcher::new(&config.exclude).context("Invalid exclude pattern")?;
    let staged = repo.staged_diff(&excludes)?.context(
        "No staged changes found. Stage your changes with `git add` and try again",
    )?;
    Ok((repo, staged))
}

/// Builds the service for a resolved configuration.
pub(crate) fn build_service(config: CommitConfig) -> Result<CommitService> {
    let client = create_default_client(&config)?;
    let logging = config.logging;
    let mut service = CommitService::new(client, config);

    if logging {
        match FileExchangeLogger::from_env() {
            Ok(logger) => service = service.with_logger(Arc::new(logger)),
            Err(e) => warn!(error = %e, "Exchange logging disabled"),
        }
    }

    Ok(service)
}
