//! Prchat CLI entrypoint.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prchat::telemetry::init_logging;
use prchat::{
    HttpPullRequestGateway, IntakeError, MarkdownRenderer, OpenAiChatConfig, OpenAiChatService,
    PrChatConfig, ReviewSession, Terminal,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    init_logging(config.verbose);

    let settings = config.settings()?;
    let token = config.resolve_github_token()?;
    let api_key = config.resolve_openai_api_key()?;

    let gateway = HttpPullRequestGateway::new(&token, settings.fetch_timeout)?;
    let chat = OpenAiChatService::new(OpenAiChatConfig::new(
        config.openai_base_url.clone(),
        settings.model.clone(),
        Some(api_key),
    ));

    let stdout = io::stdout();
    let renderer = if stdout.is_terminal() {
        MarkdownRenderer::styled()
    } else {
        MarkdownRenderer::plain()
    };
    let terminal = Terminal::new(io::stdin().lock(), stdout.lock(), renderer);

    let mut session = ReviewSession::start(&settings, &gateway, &chat, terminal)?;
    session.run()
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrChatConfig, IntakeError> {
    PrChatConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}
