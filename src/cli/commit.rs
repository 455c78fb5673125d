//! Commit message generation command.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Select;

use super::{build_service, load_staged_diff, strict_override, GenerationArgs};
use crate::choice::ListChoice;
use crate::config::CommitConfig;
use crate::git::SHORT_HASH_LEN;

/// Generates commit messages for the staged changes.
#[derive(Parser)]
pub struct CommitCommand {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Number of messages to generate (1-5).
    #[arg(long, short = 'g')]
    pub generate: Option<usize>,

    /// Commit message style: conventional, gitmoji, or "" for freeform.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub commit_type: Option<String>,

    /// Include the message body in the commit.
    #[arg(long)]
    pub include_body: bool,

    /// Drop messages that do not match the commit type.
    #[arg(long)]
    pub strict: bool,

    /// Print the selected message instead of committing.
    #[arg(long)]
    pub dry_run: bool,

    /// Use the first generated message without prompting.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl CommitCommand {
    /// Executes the commit command.
    pub async fn execute(self) -> Result<()> {
        let mut overrides = self.generation.overrides();
        overrides.generate = self.generate;
        overrides.commit_type = self.commit_type.clone();
        overrides.include_body = self.include_body.then_some(true);
        overrides.validation = strict_override(self.strict);

        let config = CommitConfig::load(&overrides)?;
        let (repo, staged) = load_staged_diff(&config)?;

        eprintln!(
            "Detected {} staged file{}:",
            staged.files.len(),
            if staged.files.len() == 1 { "" } else { "s" }
        );
        for file in &staged.files {
            eprintln!("  {file}");
        }

        let service = build_service(config)?;
        eprintln!("Generating commit messages with Cohere...");
        let choices = service.commit_choices(&staged.diff).await;

        let Some(message) = self.pick(&choices)? else {
            eprintln!("Commit cancelled.");
            return Ok(());
        };

        if self.dry_run {
            println!("{message}");
            return Ok(());
        }

        let oid = repo.commit_staged(&message)?;
        let hash = oid.to_string();
        println!(
            "✅ Committed {}: {}",
            &hash[..SHORT_HASH_LEN],
            message.lines().next().unwrap_or_default()
        );
        Ok(())
    }

    /// Reports error items and returns the chosen message, if any.
    fn pick(&self, choices: &[ListChoice]) -> Result<Option<String>> {
        for choice in choices.iter().filter(|c| c.is_error) {
            eprintln!("{}", choice.name);
        }

        let selectable: Vec<&ListChoice> =
            choices.iter().filter(|c| c.is_selectable()).collect();
        if selectable.is_empty() {
            bail!("No commit message could be generated");
        }

        if self.yes {
            return Ok(Some(selectable[0].value.clone()));
        }

        let labels: Vec<String> = selectable.iter().map(|c| display_label(c)).collect();
        let selection = Select::new()
            .with_prompt("Pick a commit message")
            .items(&labels[..])
            .default(0)
            .interact_opt()
            .context("Failed to read selection")?;

        Ok(selection.map(|index| selectable[index].value.clone()))
    }
}

fn display_label(choice: &ListChoice) -> String {
    let body: Vec<String> = choice
        .description
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("    {line}"))
        .collect();
    if body.is_empty() {
        choice.name.clone()
    } else {
        format!("{}\n{}", choice.name, body.join("\n"))
    }
}
