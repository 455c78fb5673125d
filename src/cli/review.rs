//! Code review command.

use anyhow::{bail, Result};
use clap::Parser;

use super::{build_service, load_staged_diff, GenerationArgs};
use crate::config::CommitConfig;

/// Reviews the staged changes.
#[derive(Parser)]
pub struct ReviewCommand {
    #[command(flatten)]
    pub generation: GenerationArgs,
}

impl ReviewCommand {
    /// Executes the review command.
    pub async fn execute(self) -> Result<()> {
        let config = CommitConfig::load(&self.generation.overrides())?;
        let (_repo, staged) = load_staged_diff(&config)?;

        let service = build_service(config)?;
        eprintln!(
            "Reviewing {} staged file(s) with Cohere...",
            staged.files.len()
        );
        let choices = service.review_choices(&staged.diff).await;

        if choices.is_empty() {
            bail!("The model returned an empty review");
        }

        for choice in &choices {
            if choice.is_error {
                bail!("{}", choice.value);
            }
            println!("{}\n", choice.name);
            println!("{}", choice.value);
        }
        Ok(())
    }
}
