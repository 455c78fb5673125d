//! Exchange log files recording what was sent to and received from the model.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, warn};

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "AICOMMIT_LOG_DIR";

const MAX_NAME_ATTEMPTS: usize = 100;

/// Sink for (label, diff, prompt, response) records.
pub trait ExchangeLogger: Send + Sync {
    /// Records one exchange. Failures are reported but never propagated.
    fn log_exchange(&self, label: &str, diff: &str, prompt: &str, response: &str);
}

/// Writes one file per exchange into a directory.
#[derive(Debug, Clone)]
pub struct FileExchangeLogger {
    dir: PathBuf,
}

impl FileExchangeLogger {
    /// Logger writing into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Logger writing into the configured log directory.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(get_log_dir()?))
    }

    /// Writes the exchange and returns the created file.
    pub fn write_exchange(
        &self,
        label: &str,
        diff: &str,
        prompt: &str,
        response: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory: {}", self.dir.display()))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        let stem = format!("{timestamp}_{}", file_label(label));
        let (mut file, path) = create_unique(&self.dir, &stem)?;

        let content = format!(
            "[Label]\n{label}\n\n[System Prompt]\n{prompt}\n\n[Diff]\n{diff}\n\n[Response]\n{response}\n"
        );
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write log file: {}", path.display()))?;

        debug!(path = %path.display(), "Wrote exchange log");
        Ok(path)
    }
}

impl ExchangeLogger for FileExchangeLogger {
    fn log_exchange(&self, label: &str, diff: &str, prompt: &str, response: &str) {
        if let Err(e) = self.write_exchange(label, diff, prompt, response) {
            warn!(error = %format!("{e:#}"), "Failed to write exchange log");
        }
    }
}

/// Returns the log directory: `AICOMMIT_LOG_DIR`, else `$HOME/.aicommit/logs`.
pub fn get_log_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(LOG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home_dir.join(".aicommit").join("logs"))
}

/// Creates `{stem}.log`, or `{stem}_{n}.log` for the first free `n`.
fn create_unique(dir: &Path, stem: &str) -> Result<(File, PathBuf)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{stem}.log")
        } else {
            format!("{stem}_{attempt}.log")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create log file: {}", path.display()))
            }
        }
    }
    anyhow::bail!("No free log file name for {stem} in {}", dir.display())
}

fn file_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
