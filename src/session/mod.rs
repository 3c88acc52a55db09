//! Interactive review session.
//!
//! A session owns the transcript and a [`Terminal`]. Each operator line is
//! parsed into a [`Command`]; every command except `q` and `h` ends with the
//! whole transcript being sent to the chat model and the reply appended as an
//! assistant message.

mod command;
mod selection;
mod terminal;

pub use command::Command;
pub use selection::{Selection, parse_choice, select_pull_request};
pub use terminal::Terminal;

use std::io::{BufRead, Write};

use crate::ai::{ChatCompletionService, Transcript};
use crate::config::ReviewSettings;
use crate::github::{IntakeError, PullRequestGateway, PullRequestLocator};
use crate::prompts::PromptTemplates;

const OPERATOR_PROMPT: &str = "👨: ";
const ASSISTANT_HEADER: &str = "🤖: ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop the session.
    Quit,
}

/// A running conversation about one selected pull request.
pub struct ReviewSession<'env, G, C, R, W> {
    settings: &'env ReviewSettings,
    gateway: &'env G,
    chat: &'env C,
    templates: PromptTemplates,
    terminal: Terminal<R, W>,
    transcript: Transcript,
    selection: Selection,
}

impl<'env, G, C, R, W> ReviewSession<'env, G, C, R, W>
where
    G: PullRequestGateway,
    C: ChatCompletionService,
    R: BufRead,
    W: Write,
{
    /// Runs the selection prompt, optionally warms the model up with the
    /// system prompt alone, then fetches the pull request metadata and seeds
    /// the transcript with its body and title.
    ///
    /// # Errors
    ///
    /// Propagates selection, fetch, chat and terminal failures.
    pub fn start(
        settings: &'env ReviewSettings,
        gateway: &'env G,
        chat: &'env C,
        mut terminal: Terminal<R, W>,
    ) -> Result<Self, IntakeError> {
        let templates = PromptTemplates::new()?;
        let selection = select_pull_request(&mut terminal, &settings.repositories)?;
        terminal.say_markdown(&templates.options_banner(
            selection.repository.as_str(),
            selection.change_set.as_str(),
        )?)?;

        let mut transcript = Transcript::new(templates.system_prompt()?);

        if settings.warm_up {
            terminal.say("Loading assistant...")?;
            chat.complete(transcript.messages())?;
            terminal.say("Assistant loaded!")?;
        }

        let locator = selection.locator(&settings.github_api_base, &settings.owner);
        let metadata = gateway.pull_request(&locator)?;
        transcript.seed(&metadata);
        tracing::info!(
            repository = selection.repository.as_str(),
            change_set = selection.change_set.as_str(),
            "review session started"
        );

        Ok(Self {
            settings,
            gateway,
            chat,
            templates,
            terminal,
            transcript,
            selection,
        })
    }

    /// Reads and handles lines until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns the first failure from any command; nothing is retried.
    pub fn run(&mut self) -> Result<(), IntakeError> {
        loop {
            let Some(line) = self.terminal.prompt(OPERATOR_PROMPT)? else {
                return Ok(());
            };

            if self.handle(Command::parse(&line))? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Applies one command to the transcript and, unless it is `q` or `h`,
    /// exchanges the transcript with the chat model.
    ///
    /// # Errors
    ///
    /// Propagates fetch, chat and terminal failures.
    pub fn handle(&mut self, command: Command) -> Result<Flow, IntakeError> {
        let sends = command.sends_transcript();

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                let help = self.templates.help_text()?;
                self.terminal.say_markdown(&help)?;
            }
            Command::SwitchPullRequest => self.switch_pull_request()?,
            Command::Review => self.inject_diff()?,
            Command::Say(text) => {
                self.terminal.say("Thinking...")?;
                self.transcript.push_user(text);
            }
            Command::Empty => {}
        }

        if sends {
            self.exchange()?;
        }
        Ok(Flow::Continue)
    }

    fn locator(&self) -> PullRequestLocator {
        self.selection
            .locator(&self.settings.github_api_base, &self.settings.owner)
    }

    fn switch_pull_request(&mut self) -> Result<(), IntakeError> {
        self.transcript.reset();
        self.selection = select_pull_request(&mut self.terminal, &self.settings.repositories)?;

        let metadata = self.gateway.pull_request(&self.locator())?;
        self.transcript.seed(&metadata);
        tracing::info!(
            repository = self.selection.repository.as_str(),
            change_set = self.selection.change_set.as_str(),
            "switched pull request"
        );

        let banner = self.templates.options_banner(
            self.selection.repository.as_str(),
            self.selection.change_set.as_str(),
        )?;
        self.terminal.say_markdown(&banner)
    }

    fn inject_diff(&mut self) -> Result<(), IntakeError> {
        let diff = self.gateway.pull_request_diff(&self.locator())?;
        let prompt = self
            .templates
            .review_prompt(&diff, self.settings.max_prompt_length)?;
        tracing::debug!(
            diff_chars = diff.chars().count(),
            prompt_chars = prompt.chars().count(),
            "injecting pull request diff"
        );
        self.transcript.push_user(prompt);
        Ok(())
    }

    fn exchange(&mut self) -> Result<(), IntakeError> {
        tracing::debug!(messages = self.transcript.len(), "sending transcript");
        let reply = self.chat.complete(self.transcript.messages())?;

        self.terminal.say_markdown(ASSISTANT_HEADER)?;
        self.terminal.say_markdown(&reply)?;
        self.transcript.push_assistant(reply);
        Ok(())
    }

    /// Conversation so far.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Pull request currently under discussion.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Ends the session, returning the terminal's reader and writer.
    pub fn into_terminal(self) -> Terminal<R, W> {
        self.terminal
    }
}
