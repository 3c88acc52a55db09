//! Repository and pull request selection prompt.

use std::io::{BufRead, Write};

use url::Url;

use crate::github::{
    ChangeSetId, IntakeError, PullRequestLocator, RepositoryName, RepositoryOwner,
};

use super::terminal::Terminal;

const REPOSITORY_PROMPT: &str = "Enter the number of the repository: ";
const CHANGE_SET_PROMPT: &str = "Enter the number of the pull request: ";

/// The repository and pull request currently under discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen repository.
    pub repository: RepositoryName,
    /// Operator-supplied pull request identifier.
    pub change_set: ChangeSetId,
}

impl Selection {
    /// Addresses the selected pull request under `owner` at `api_base`.
    #[must_use]
    pub fn locator(&self, api_base: &Url, owner: &RepositoryOwner) -> PullRequestLocator {
        PullRequestLocator::new(
            api_base.clone(),
            owner.clone(),
            self.repository.clone(),
            self.change_set.clone(),
        )
    }
}

/// Maps a 1-based menu choice to a 0-based index, or `None` when the input
/// is not a number in `[1, count]`.
#[must_use]
pub fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let choice = input.trim().parse::<usize>().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}

/// Asks for a repository until a valid number is entered, then for a pull
/// request identifier, which is accepted as typed (trimmed, possibly empty).
///
/// # Errors
///
/// Returns [`IntakeError::InputClosed`] if input ends before both answers
/// are read, or [`IntakeError::Io`] on terminal failures.
pub fn select_pull_request<R, W>(
    terminal: &mut Terminal<R, W>,
    repositories: &[RepositoryName],
) -> Result<Selection, IntakeError>
where
    R: BufRead,
    W: Write,
{
    let repository = loop {
        terminal.say("Select a repository:")?;
        for (index, name) in repositories.iter().enumerate() {
            terminal.say(&format!("{}. {name}", index + 1))?;
        }

        let answer = terminal
            .prompt(REPOSITORY_PROMPT)?
            .ok_or(IntakeError::InputClosed)?;
        if let Some(name) = parse_choice(&answer, repositories.len())
            .and_then(|index| repositories.get(index))
        {
            break name.clone();
        }

        terminal.say(&format!(
            "Invalid input. Please enter a number between 1 and {}",
            repositories.len()
        ))?;
    };

    let change_set = terminal
        .prompt(CHANGE_SET_PROMPT)?
        .ok_or(IntakeError::InputClosed)?;

    Ok(Selection {
        repository,
        change_set: ChangeSetId::new(change_set.trim()),
    })
}
