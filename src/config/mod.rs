//! Application configuration loaded from CLI, environment, and files.
//!
//! [`PrChatConfig`] merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach.
//! [`PrChatConfig::settings`] then validates the merged values into an
//! immutable [`ReviewSettings`] that is passed to the fetcher and the
//! session loop.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prchat.toml` in the current directory or
//!    home directory, or `prchat.toml` in the XDG config directory
//! 3. **Environment variables** – `PRCHAT_USER`, `PRCHAT_MODEL_ENGINE`, ...
//! 4. **Command-line arguments** – `--user`/`-u`, `--model-engine`/`-m`, ...
//!
//! Credentials additionally fall back to `GITHUB_TOKEN` and `OPENAI_API_KEY`.
//!
//! # Configuration File
//!
//! ```toml
//! user = "acme"
//! repositories = ["svc-a", "svc-b"]
//! model_engine = "gpt-4o-mini"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ai::openai::DEFAULT_BASE_URL;
use crate::github::error::IntakeError;
use crate::github::gateway::DEFAULT_FETCH_TIMEOUT;
use crate::github::locator::{
    DEFAULT_API_BASE, PersonalAccessToken, RepositoryName, RepositoryOwner, parse_api_base,
};
use crate::prompts::DEFAULT_MAX_PROMPT_LENGTH;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prchat::PrChatConfig;
///
/// let config = PrChatConfig::load().expect("failed to load configuration");
/// let settings = config.settings().expect("configuration incomplete");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRCHAT",
    discovery(
        dotfile_name = ".prchat.toml",
        config_file_name = "prchat.toml",
        app_name = "prchat"
    )
)]
pub struct PrChatConfig {
    /// Account (user or organisation) owning the repositories.
    ///
    /// Can be provided via:
    /// - CLI: `--user <NAME>` or `-u <NAME>`
    /// - Environment: `PRCHAT_USER`
    /// - Config file: `user = "..."`
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,

    /// Repository names offered by the selection prompt, in display order.
    ///
    /// Can be provided via:
    /// - CLI: `--repositories <NAME>` (repeatable) or `-r <NAME>`
    /// - Config file: `repositories = ["...", "..."]`
    #[ortho_config(cli_short = 'r')]
    pub repositories: Vec<String>,

    /// Chat model identifier sent with every completion request.
    ///
    /// Can be provided via:
    /// - CLI: `--model-engine <MODEL>` or `-m <MODEL>`
    /// - Environment: `PRCHAT_MODEL_ENGINE`
    /// - Config file: `model_engine = "..."`
    #[ortho_config(cli_short = 'm')]
    pub model_engine: Option<String>,

    /// GitHub access token. Falls back to `GITHUB_TOKEN`.
    #[ortho_config()]
    pub github_token: Option<String>,

    /// Chat API key. Falls back to `OPENAI_API_KEY`.
    #[ortho_config()]
    pub openai_api_key: Option<String>,

    /// GitHub REST API base, for GitHub Enterprise hosts.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub github_api_base: String,

    /// Base URL of an OpenAI-compatible chat-completions API.
    ///
    /// Defaults to `https://api.openai.com/v1`.
    #[ortho_config()]
    pub openai_base_url: String,

    /// Character budget for the wrapped diff sent by the `r` command.
    ///
    /// Defaults to 4096.
    #[ortho_config()]
    pub max_prompt_length: usize,

    /// Connect/read timeout for GitHub requests, in seconds.
    ///
    /// Defaults to 10. Chat requests have no timeout.
    #[ortho_config()]
    pub fetch_timeout_seconds: u64,

    /// Skips the start-up request that sends the system prompt alone.
    ///
    /// Can be provided via:
    /// - CLI: `--no-warm-up` / `-W`
    /// - Config file: `no_warm_up = true`
    #[ortho_config(cli_short = 'W')]
    pub no_warm_up: bool,

    /// Raises the log level to debug.
    ///
    /// Can be provided via:
    /// - CLI: `--verbose` / `-v`
    /// - Config file: `verbose = true`
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl Default for PrChatConfig {
    fn default() -> Self {
        Self {
            user: None,
            repositories: Vec::new(),
            model_engine: None,
            github_token: None,
            openai_api_key: None,
            github_api_base: DEFAULT_API_BASE.to_owned(),
            openai_base_url: DEFAULT_BASE_URL.to_owned(),
            max_prompt_length: DEFAULT_MAX_PROMPT_LENGTH,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT.as_secs(),
            no_warm_up: false,
            verbose: false,
        }
    }
}

/// Validated, immutable settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    /// Owner segment of every repository path.
    pub owner: RepositoryOwner,
    /// Selectable repositories, in display order. Never empty.
    pub repositories: Vec<RepositoryName>,
    /// Chat model identifier.
    pub model: String,
    /// GitHub REST API base.
    pub github_api_base: Url,
    /// Character budget for wrapped diffs.
    pub max_prompt_length: usize,
    /// GitHub request timeout.
    pub fetch_timeout: Duration,
    /// Whether to send the system prompt alone before the first turn.
    pub warm_up: bool,
}

impl PrChatConfig {
    /// Validates the merged configuration into [`ReviewSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when `user`, `repositories` or
    /// `model_engine` is missing or blank, when a repository name is blank,
    /// when the GitHub API base is not a URL, or when the fetch timeout is
    /// zero.
    pub fn settings(&self) -> Result<ReviewSettings, IntakeError> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| missing("user", "--user or -u"))?;
        let owner = RepositoryOwner::new(user)?;

        if self.repositories.is_empty() {
            return Err(missing("repositories", "--repositories or -r"));
        }
        let repositories = self
            .repositories
            .iter()
            .map(|name| RepositoryName::new(name))
            .collect::<Result<Vec<_>, _>>()?;

        let model = self
            .model_engine
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .ok_or_else(|| missing("model_engine", "--model-engine or -m"))?
            .to_owned();

        if self.fetch_timeout_seconds == 0 {
            return Err(IntakeError::Configuration {
                message: "fetch_timeout_seconds must be greater than zero".to_owned(),
            });
        }

        Ok(ReviewSettings {
            owner,
            repositories,
            model,
            github_api_base: parse_api_base(&self.github_api_base)?,
            max_prompt_length: self.max_prompt_length,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_seconds),
            warm_up: !self.no_warm_up,
        })
    }

    /// Resolves the GitHub token from configuration or `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_github_token(&self) -> Result<PersonalAccessToken, IntakeError> {
        let value = self
            .github_token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(IntakeError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Resolves the chat API key from configuration or `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingApiKey`] when no source provides a
    /// non-blank value.
    pub fn resolve_openai_api_key(&self) -> Result<String, IntakeError> {
        self.openai_api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(IntakeError::MissingApiKey)
    }
}

fn missing(field: &str, flag: &str) -> IntakeError {
    IntakeError::Configuration {
        message: format!("{field} is required (set it in .prchat.toml or use {flag})"),
    }
}
