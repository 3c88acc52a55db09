//! Operator commands accepted at the `👨:` prompt.

/// One parsed line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `q`: end the session.
    Quit,
    /// `h`: show the help text.
    Help,
    /// `n`: pick another pull request and start a fresh transcript.
    SwitchPullRequest,
    /// `r`: inject the pull request diff as a review request.
    Review,
    /// Any other non-empty text, forwarded verbatim.
    Say(String),
    /// An empty line. Nothing is appended but the transcript is still sent.
    Empty,
}

impl Command {
    /// Interprets a line exactly as typed; `" q"` is text, not a command.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line {
            "q" => Self::Quit,
            "h" => Self::Help,
            "n" => Self::SwitchPullRequest,
            "r" => Self::Review,
            "" => Self::Empty,
            text => Self::Say(text.to_owned()),
        }
    }

    /// Whether handling this command ends with a completion request.
    #[must_use]
    pub const fn sends_transcript(&self) -> bool {
        !matches!(self, Self::Quit | Self::Help)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Command;

    #[rstest]
    #[case("q", Command::Quit)]
    #[case("h", Command::Help)]
    #[case("n", Command::SwitchPullRequest)]
    #[case("r", Command::Review)]
    #[case("", Command::Empty)]
    #[case("Q", Command::Say("Q".to_owned()))]
    #[case(" r", Command::Say(" r".to_owned()))]
    #[case("   ", Command::Say("   ".to_owned()))]
    #[case("why does this leak?", Command::Say("why does this leak?".to_owned()))]
    fn parses_exact_input(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(line), expected);
    }

    #[rstest]
    #[case(Command::Quit, false)]
    #[case(Command::Help, false)]
    #[case(Command::SwitchPullRequest, true)]
    #[case(Command::Review, true)]
    #[case(Command::Empty, true)]
    #[case(Command::Say("hi".to_owned()), true)]
    fn only_quit_and_help_skip_the_send(#[case] command: Command, #[case] expected: bool) {
        assert_eq!(command.sends_transcript(), expected);
    }
}
