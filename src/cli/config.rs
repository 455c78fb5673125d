//! Configuration-related CLI commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::GenerationArgs;
use crate::config::CommitConfig;
use crate::utils::settings::Settings;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Prints the effective configuration as YAML, API key masked.
    Show(ShowCommand),
    /// Prints the settings file location.
    Path,
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    #[command(flatten)]
    pub generation: GenerationArgs,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
            ConfigSubcommands::Path => {
                println!("{}", Settings::get_settings_path()?.display());
                Ok(())
            }
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let config = CommitConfig::load(&self.generation.overrides())?;
        let yaml = config.to_yaml().context("Failed to render configuration")?;
        print!("{yaml}");
        Ok(())
    }
}
