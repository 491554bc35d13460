mod file_config;

pub use file_config::{FileConfig, LlmConfig, LyricsConfig, RetryConfig};

use crate::llm::OPENAI_API_BASE;
use crate::lyrics::MUSIXMATCH_API_BASE;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_LLM_MODEL: &str = "gpt-4";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub musixmatch_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    // Credentials, never read from the TOML file
    pub musixmatch_api_key: String,
    pub openai_api_key: String,

    // Upstream services (with defaults)
    pub lyrics: LyricsSettings,
    pub llm: LlmSettings,
    pub retry: RetrySettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let musixmatch_api_key = required_key(&cli.musixmatch_api_key, "MUSIXMATCH_API_KEY")?;
        let openai_api_key = required_key(&cli.openai_api_key, "OPENAI_API_KEY")?;

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(level) => match parse_logging_level(&level) {
                Some(parsed) => parsed,
                None => bail!(
                    "Invalid logging_level {:?}, expected one of none, path, headers, body",
                    level
                ),
            },
            None => cli.logging_level.clone(),
        };

        let lyrics_file = file.lyrics.unwrap_or_default();
        let lyrics_defaults = LyricsSettings::default();
        let lyrics = LyricsSettings {
            base_url: lyrics_file.base_url.unwrap_or(lyrics_defaults.base_url),
            timeout_sec: lyrics_file.timeout_sec.unwrap_or(lyrics_defaults.timeout_sec),
        };

        let llm_file = file.llm.unwrap_or_default();
        let llm_defaults = LlmSettings::default();
        let llm = LlmSettings {
            base_url: llm_file.base_url.unwrap_or(llm_defaults.base_url),
            model: llm_file.model.unwrap_or(llm_defaults.model),
            timeout_sec: llm_file.timeout_sec.unwrap_or(llm_defaults.timeout_sec),
            temperature: llm_file.temperature.unwrap_or(llm_defaults.temperature),
        };

        let retry_file = file.retry.unwrap_or_default();
        let retry_defaults = RetrySettings::default();
        let retry = RetrySettings {
            max_attempts: retry_file.max_attempts.unwrap_or(retry_defaults.max_attempts),
            initial_backoff_secs: retry_file
                .initial_backoff_secs
                .unwrap_or(retry_defaults.initial_backoff_secs),
            max_backoff_secs: retry_file
                .max_backoff_secs
                .unwrap_or(retry_defaults.max_backoff_secs),
            backoff_multiplier: retry_file
                .backoff_multiplier
                .unwrap_or(retry_defaults.backoff_multiplier),
        };
        retry.validate()?;

        if lyrics.timeout_sec == 0 || llm.timeout_sec == 0 {
            bail!("Upstream timeouts must be greater than zero");
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            musixmatch_api_key,
            openai_api_key,
            lyrics,
            llm,
            retry,
        })
    }

    pub fn song_db_path(&self) -> PathBuf {
        self.db_dir.join("songs.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

#[derive(Debug, Clone)]
pub struct LyricsSettings {
    pub base_url: String,
    pub timeout_sec: u64,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            base_url: MUSIXMATCH_API_BASE.to_string(),
            timeout_sec: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_sec: u64,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: OPENAI_API_BASE.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_sec: 30,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_secs: 2,
            max_backoff_secs: 10,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetrySettings {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.initial_backoff_secs > self.max_backoff_secs {
            bail!(
                "retry.initial_backoff_secs ({}) exceeds retry.max_backoff_secs ({})",
                self.initial_backoff_secs,
                self.max_backoff_secs
            );
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            bail!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            );
        }
        Ok(())
    }
}

/// Credentials of the administrative account created at startup.
#[derive(Clone)]
pub struct AdminSettings {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSettings")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminSettings {
    /// Reads `ADMIN_USERNAME`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        )
    }

    /// Some only when all three values are present and non-empty.
    pub fn from_values(
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Option<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(Self {
            username: non_empty(username)?,
            email: non_empty(email)?,
            password: non_empty(password)?,
        })
    }
}

fn required_key(value: &Option<String>, env_name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => bail!("{} must be set (environment, .env file or CLI flag)", env_name),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
