//! Configuration resolution.
//!
//! Layers, lowest to highest: built-in defaults, the settings file,
//! environment variables (falling back to the settings `env` map), and CLI
//! flags. The result is validated once into an immutable [`CommitConfig`].

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::ai::cohere::DEFAULT_BASE_URL;
use crate::prompt::{CommitType, ParseCommitTypeError, PromptOptions, DEFAULT_MAX_LENGTH};
use crate::response::{ParseValidationPolicyError, ValidationPolicy};
use crate::utils::settings::Settings;

pub const DEFAULT_MODEL: &str = "command";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_GENERATE: usize = 1;
pub const MAX_GENERATE: usize = 5;
pub const MIN_MAX_LENGTH: usize = 20;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.75;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Staged files left out of the diff unless configured otherwise.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/package-lock.json", "**/pnpm-lock.yaml", "**/*.lock"];

/// Environment variable names.
pub mod env_keys {
    pub const API_KEY: &str = "COHERE_API_KEY";
    pub const BASE_URL: &str = "COHERE_BASE_URL";
    pub const MODEL: &str = "AICOMMIT_MODEL";
    pub const LOCALE: &str = "AICOMMIT_LOCALE";
    pub const TYPE: &str = "AICOMMIT_TYPE";
    pub const GENERATE: &str = "AICOMMIT_GENERATE";
    pub const MAX_LENGTH: &str = "AICOMMIT_MAX_LENGTH";
    pub const TEMPERATURE: &str = "AICOMMIT_TEMPERATURE";
    pub const TOP_P: &str = "AICOMMIT_TOP_P";
    pub const MAX_TOKENS: &str = "AICOMMIT_MAX_TOKENS";
    pub const TIMEOUT: &str = "AICOMMIT_TIMEOUT";
    pub const INCLUDE_BODY: &str = "AICOMMIT_INCLUDE_BODY";
    pub const LOGGING: &str = "AICOMMIT_LOGGING";
    pub const VALIDATION: &str = "AICOMMIT_VALIDATION";
    pub const SYSTEM_PROMPT: &str = "AICOMMIT_SYSTEM_PROMPT";
    pub const SYSTEM_PROMPT_PATH: &str = "AICOMMIT_SYSTEM_PROMPT_PATH";
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key in settings or environment.
    #[error("Cohere API key not found. Set COHERE_API_KEY or apiKey in the settings file")]
    MissingApiKey,

    /// A value could not be parsed.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("temperature must be between 0 and 2, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("topP must be between 0 and 1, got {0}")]
    TopPOutOfRange(f32),

    #[error("generate must be between 1 and 5, got {0}")]
    GenerateOutOfRange(usize),

    #[error("maxLength must be at least 20, got {0}")]
    MaxLengthTooSmall(usize),

    #[error("maxTokens must be greater than 0")]
    ZeroMaxTokens,

    #[error("timeout must be greater than 0 milliseconds")]
    ZeroTimeout,

    #[error(transparent)]
    CommitType(#[from] ParseCommitTypeError),

    #[error(transparent)]
    ValidationPolicy(#[from] ParseValidationPolicyError),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub locale: Option<String>,
    pub commit_type: Option<String>,
    pub generate: Option<usize>,
    pub include_body: Option<bool>,
    pub validation: Option<ValidationPolicy>,
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitConfig {
    pub api_key: String,
    pub model: String,
    pub locale: String,
    pub commit_type: CommitType,
    pub generate: usize,
    pub max_length: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub include_body: bool,
    pub logging: bool,
    pub validation: ValidationPolicy,
    pub system_prompt: Option<String>,
    pub system_prompt_path: Option<PathBuf>,
    pub base_url: Url,
    pub exclude: Vec<String>,
}

impl CommitConfig {
    /// Loads settings from the default location and resolves against the
    /// process environment.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let settings = Settings::load()?;
        Ok(Self::resolve(&settings, |k| env::var(k).ok(), overrides)?)
    }

    /// Resolves every layer into a validated configuration.
    pub fn resolve<F>(
        settings: &Settings,
        env: F,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            settings
                .lookup_env(key, &env)
                .filter(|v| !v.trim().is_empty())
        };

        let api_key = lookup(env_keys::API_KEY)
            .or_else(|| settings.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = overrides
            .model
            .clone()
            .or_else(|| lookup(env_keys::MODEL))
            .or_else(|| settings.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let locale = overrides
            .locale
            .clone()
            .or_else(|| lookup(env_keys::LOCALE))
            .or_else(|| settings.locale.clone())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        // An empty type is meaningful (freeform), so it bypasses the blank filter
        let commit_type = match overrides
            .commit_type
            .clone()
            .or_else(|| settings.lookup_env(env_keys::TYPE, &env))
            .or_else(|| settings.commit_type.clone())
        {
            Some(name) => name.parse::<CommitType>()?,
            None => CommitType::default(),
        };

        let generate = match overrides.generate {
            Some(n) => n,
            None => parse_layer(lookup(env_keys::GENERATE), env_keys::GENERATE)?
                .or(settings.generate)
                .unwrap_or(DEFAULT_GENERATE),
        };
        if !(1..=MAX_GENERATE).contains(&generate) {
            return Err(ConfigError::GenerateOutOfRange(generate));
        }

        let max_length = parse_layer(lookup(env_keys::MAX_LENGTH), env_keys::MAX_LENGTH)?
            .or(settings.max_length)
            .unwrap_or(DEFAULT_MAX_LENGTH);
        if max_length < MIN_MAX_LENGTH {
            return Err(ConfigError::MaxLengthTooSmall(max_length));
        }

        let temperature = parse_layer(lookup(env_keys::TEMPERATURE), env_keys::TEMPERATURE)?
            .or(settings.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::TemperatureOutOfRange(temperature));
        }

        let top_p = parse_layer(lookup(env_keys::TOP_P), env_keys::TOP_P)?
            .or(settings.top_p)
            .unwrap_or(DEFAULT_TOP_P);
        if !(0.0..=1.0).contains(&top_p) {
            return Err(ConfigError::TopPOutOfRange(top_p));
        }

        let max_tokens = parse_layer(lookup(env_keys::MAX_TOKENS), env_keys::MAX_TOKENS)?
            .or(settings.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }

        let timeout_ms = parse_layer(lookup(env_keys::TIMEOUT), env_keys::TIMEOUT)?
            .or(settings.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let include_body = match overrides.include_body {
            Some(flag) => flag,
            None => parse_bool_layer(lookup(env_keys::INCLUDE_BODY), env_keys::INCLUDE_BODY)?
                .or(settings.include_body)
                .unwrap_or(false),
        };

        let logging = parse_bool_layer(lookup(env_keys::LOGGING), env_keys::LOGGING)?
            .or(settings.logging)
            .unwrap_or(true);

        let validation = match overrides.validation {
            Some(policy) => policy,
            None => match lookup(env_keys::VALIDATION).or_else(|| settings.validation.clone()) {
                Some(name) => name.parse::<ValidationPolicy>()?,
                None => ValidationPolicy::default(),
            },
        };

        let system_prompt = lookup(env_keys::SYSTEM_PROMPT)
            .or_else(|| settings.system_prompt.clone())
            .filter(|p| !p.trim().is_empty());

        let system_prompt_path = lookup(env_keys::SYSTEM_PROMPT_PATH)
            .map(PathBuf::from)
            .or_else(|| settings.system_prompt_path.clone());

        let base_url_raw = lookup(env_keys::BASE_URL)
            .or_else(|| settings.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url_raw.clone(),
            source,
        })?;

        let exclude = settings.exclude.clone().unwrap_or_else(|| {
            DEFAULT_EXCLUDES
                .iter()
                .map(|pattern| (*pattern).to_string())
                .collect()
        });
        for pattern in &exclude {
            globset::Glob::new(pattern).map_err(|source| ConfigError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })?;
        }

        Ok(Self {
            api_key,
            model,
            locale,
            commit_type,
            generate,
            max_length,
            temperature,
            top_p,
            max_tokens,
            timeout: Duration::from_millis(timeout_ms),
            include_body,
            logging,
            validation,
            system_prompt,
            system_prompt_path,
            base_url,
            exclude,
        })
    }

    /// Prompt inputs derived from this configuration.
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            locale: self.locale.clone(),
            max_length: self.max_length,
            commit_type: self.commit_type,
            generate: self.generate,
            system_prompt: self.system_prompt.clone(),
            system_prompt_path: self.system_prompt_path.clone(),
        }
    }

    /// YAML rendering with the API key masked.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&ConfigView::from(self))
    }
}

/// Serializable view of [`CommitConfig`] for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView<'a> {
    api_key: String,
    model: &'a str,
    locale: &'a str,
    #[serde(rename = "type")]
    commit_type: CommitType,
    generate: usize,
    max_length: usize,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    timeout: u64,
    include_body: bool,
    logging: bool,
    validation: ValidationPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt_path: Option<String>,
    base_url: &'a str,
    exclude: &'a [String],
}

impl<'a> From<&'a CommitConfig> for ConfigView<'a> {
    fn from(config: &'a CommitConfig) -> Self {
        Self {
            api_key: mask_secret(&config.api_key),
            model: &config.model,
            locale: &config.locale,
            commit_type: config.commit_type,
            generate: config.generate,
            max_length: config.max_length,
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            timeout: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
            include_body: config.include_body,
            logging: config.logging,
            validation: config.validation,
            system_prompt: config.system_prompt.as_deref(),
            system_prompt_path: config
                .system_prompt_path
                .as_ref()
                .map(|p| p.display().to_string()),
            base_url: config.base_url.as_str(),
            exclude: &config.exclude,
        }
    }
}

/// Keeps the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

fn parse_layer<T: FromStr>(value: Option<String>, key: &str) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: v.clone(),
            })
        })
        .transpose()
}

fn parse_bool_layer(value: Option<String>, key: &str) -> Result<Option<bool>, ConfigError> {
    value
        .map(|v| match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: v.clone(),
            }),
        })
        .transpose()
}
